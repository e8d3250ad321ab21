//! Persistence: relational metadata sink plus vector collection sink
//!
//! The two sinks are independent; a batch is pushed to both and each
//! reports its own outcome. There is deliberately no atomicity across
//! sinks: a document can land in one store and not the other on partial
//! failure, and no reconciliation pass exists.

pub mod chroma;
pub mod postgres;

pub use chroma::{ChromaConfig, ChromaStore, QueryHit};
pub use postgres::PostgresStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::document::Document;

/// Errors from either sink
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Postgres(#[from] tokio_postgres::Error),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("vector store returned status {status}: {message}")]
    Api { status: u16, message: String },
    #[error("unexpected response from vector store: {0}")]
    InvalidResponse(String),
}

/// Relational metadata store: per-document upsert keyed by id.
#[async_trait]
pub trait MetadataSink: Send {
    async fn upsert(
        &mut self,
        doc: &Document,
        embedding: Option<&[f32]>,
    ) -> Result<(), StoreError>;
}

/// Vector collection: whole-batch upsert of ids, raw text, and a flat
/// metadata projection. Embeddings are attached when computed locally,
/// otherwise the collection service generates them.
#[async_trait]
pub trait VectorSink: Send {
    async fn upsert_batch(
        &mut self,
        docs: &[Document],
        embeddings: Option<&[Vec<f32>]>,
    ) -> Result<usize, StoreError>;

    async fn count(&mut self) -> Result<u64, StoreError>;
}

/// Per-batch persistence outcome
#[derive(Debug, Default)]
pub struct BatchResult {
    /// Documents upserted into the relational sink
    pub relational_ok: usize,
    /// Per-document relational failures: (document id, error)
    pub relational_failures: Vec<(String, String)>,
    /// Documents accepted by the vector sink (whole batch or nothing)
    pub vector_ok: usize,
    /// Error from the vector sink's single batch submission, if any
    pub vector_error: Option<String>,
}

impl BatchResult {
    pub fn fully_successful(&self) -> bool {
        self.relational_failures.is_empty() && self.vector_error.is_none()
    }

    /// One-line human-readable summary for progress output.
    pub fn summary(&self) -> String {
        format!(
            "relational: {} ok, {} failed; vector: {}",
            self.relational_ok,
            self.relational_failures.len(),
            match &self.vector_error {
                None => format!("{} ok", self.vector_ok),
                Some(err) => format!("failed ({})", err),
            }
        )
    }
}

/// Writes each batch to both sinks.
///
/// Relational writes are per-document: a failure is recorded and the batch
/// continues. The vector submission is one call for the whole batch and
/// succeeds or fails as a unit, with no partial retry.
pub struct DualSinkWriter<'a> {
    metadata: &'a mut dyn MetadataSink,
    vector: &'a mut dyn VectorSink,
}

impl<'a> DualSinkWriter<'a> {
    pub fn new(metadata: &'a mut dyn MetadataSink, vector: &'a mut dyn VectorSink) -> Self {
        Self { metadata, vector }
    }

    pub async fn persist(
        &mut self,
        docs: &[Document],
        embeddings: Option<&[Vec<f32>]>,
    ) -> BatchResult {
        let mut result = BatchResult::default();

        for (i, doc) in docs.iter().enumerate() {
            let embedding = embeddings.and_then(|e| e.get(i)).map(|v| v.as_slice());
            match self.metadata.upsert(doc, embedding).await {
                Ok(()) => {
                    result.relational_ok += 1;
                    tracing::debug!("upserted {} into metadata store", doc.id);
                }
                Err(err) => {
                    tracing::warn!("metadata upsert failed for {}: {}", doc.id, err);
                    result
                        .relational_failures
                        .push((doc.id.clone(), err.to_string()));
                }
            }
        }

        if !docs.is_empty() {
            match self.vector.upsert_batch(docs, embeddings).await {
                Ok(count) => {
                    result.vector_ok = count;
                    tracing::info!("vector sink accepted {} documents", count);
                }
                Err(err) => {
                    tracing::warn!("vector sink batch failed: {}", err);
                    result.vector_error = Some(err.to_string());
                }
            }
        }

        result
    }
}
