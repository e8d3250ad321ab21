//! Embedding providers
//!
//! The sinks treat the provider as a pure function from text to a
//! fixed-length vector (384 dimensions in the shipped configuration).
//! `HttpEmbedder` talks to an OpenAI-style `/embeddings` endpoint;
//! `HashEmbedder` is a deterministic offline fallback used in tests and
//! when no endpoint is configured.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::time::Duration;
use thiserror::Error;

/// Vector length expected by the pgvector column and the collection.
pub const EMBEDDING_DIMENSIONS: usize = 384;

/// Errors from an embedding provider
#[derive(Debug, Error)]
pub enum EmbedError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("embedding endpoint returned status {status}: {message}")]
    Api { status: u16, message: String },
    #[error("expected {expected}-dimension embeddings, got {got}")]
    Dimensions { expected: usize, got: usize },
    #[error("embedding count mismatch: sent {sent} texts, got {got} vectors")]
    CountMismatch { sent: usize, got: usize },
}

/// A function from texts to fixed-length vectors
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbedError>;

    fn dimensions(&self) -> usize {
        EMBEDDING_DIMENSIONS
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [&'a str],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

/// Client for an OpenAI-style embeddings endpoint
pub struct HttpEmbedder {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl HttpEmbedder {
    pub fn new(
        endpoint: String,
        model: String,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, EmbedError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            model,
            api_key,
        })
    }
}

#[async_trait]
impl Embedder for HttpEmbedder {
    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbedError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut request = self.client.post(&self.endpoint).json(&EmbeddingRequest {
            model: &self.model,
            input: texts,
        });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(EmbedError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: EmbeddingResponse = response.json().await?;
        if parsed.data.len() != texts.len() {
            return Err(EmbedError::CountMismatch {
                sent: texts.len(),
                got: parsed.data.len(),
            });
        }

        let mut vectors = Vec::with_capacity(parsed.data.len());
        for item in parsed.data {
            if item.embedding.len() != EMBEDDING_DIMENSIONS {
                return Err(EmbedError::Dimensions {
                    expected: EMBEDDING_DIMENSIONS,
                    got: item.embedding.len(),
                });
            }
            vectors.push(item.embedding);
        }
        Ok(vectors)
    }
}

/// Deterministic offline embedder: a normalized vector derived from the
/// SHA-256 of the text. Not semantically meaningful, but stable, which is
/// all the smoke tests and the idempotency guarantees need.
pub struct HashEmbedder {
    dimensions: usize,
}

impl HashEmbedder {
    pub fn new() -> Self {
        Self {
            dimensions: EMBEDDING_DIMENSIONS,
        }
    }

    fn embed_one(&self, text: &str) -> Vec<f32> {
        let mut hasher = Sha256::new();
        hasher.update(text.as_bytes());
        let hash = hasher.finalize();

        let mut embedding = Vec::with_capacity(self.dimensions);
        for i in 0..self.dimensions {
            let byte = hash[i % hash.len()];
            // Mix the position in so the vector is not 32 repeated bytes
            let mixed = byte.wrapping_add((i / hash.len()) as u8);
            embedding.push((mixed as f32 / 255.0) * 2.0 - 1.0);
        }

        let magnitude: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if magnitude > 0.0 {
            for v in embedding.iter_mut() {
                *v /= magnitude;
            }
        }
        embedding
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Embedder for HashEmbedder {
    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbedError> {
        Ok(texts.iter().map(|t| self.embed_one(t)).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}
