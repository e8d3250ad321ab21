//! Chroma vector collection client
//!
//! Speaks the v2 HTTP API: a collection is resolved (or created) once at
//! connect time under a tenant/database pair, then upserts and queries go
//! to the collection endpoint by its server-side id. When no embeddings
//! are attached to an upsert the service computes them from the raw text.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::Deserialize;
use serde_json::{json, Value};

use super::{StoreError, VectorSink};
use crate::document::Document;

const DEFAULT_COLLECTION: &str = "lexharvest_documents";

#[derive(Debug, Clone)]
pub struct ChromaConfig {
    pub url: String,
    pub api_key: Option<String>,
    pub tenant: String,
    pub database: String,
    pub collection: String,
    pub timeout: Duration,
}

impl ChromaConfig {
    pub fn new(url: String, api_key: Option<String>, tenant: String, database: String) -> Self {
        Self {
            url,
            api_key,
            tenant,
            database,
            collection: DEFAULT_COLLECTION.to_string(),
            timeout: Duration::from_secs(60),
        }
    }
}

/// A single nearest-neighbour match.
#[derive(Debug, Clone)]
pub struct QueryHit {
    pub id: String,
    pub title: Option<String>,
    pub category: Option<String>,
    pub preview: Option<String>,
    pub distance: Option<f32>,
}

pub struct ChromaStore {
    client: reqwest::Client,
    collection_url: String,
    collection_name: String,
}

#[derive(Deserialize)]
struct CollectionResponse {
    id: String,
}

#[derive(Deserialize)]
struct QueryResponse {
    ids: Vec<Vec<String>>,
    #[serde(default)]
    documents: Option<Vec<Vec<Option<String>>>>,
    #[serde(default)]
    metadatas: Option<Vec<Vec<Option<HashMap<String, Value>>>>>,
    #[serde(default)]
    distances: Option<Vec<Vec<f32>>>,
}

impl ChromaStore {
    /// Resolve the collection, creating it on first use.
    pub async fn connect(config: &ChromaConfig) -> Result<Self, StoreError> {
        let mut headers = HeaderMap::new();
        if let Some(key) = &config.api_key {
            let value = HeaderValue::from_str(key)
                .map_err(|_| StoreError::InvalidResponse("API key is not a valid header value".into()))?;
            headers.insert("x-chroma-token", value);
        }
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        let base = format!(
            "{}/api/v2/tenants/{}/databases/{}",
            config.url.trim_end_matches('/'),
            config.tenant,
            config.database
        );

        let response = client
            .post(format!("{base}/collections"))
            .json(&json!({
                "name": config.collection,
                "get_or_create": true,
                "metadata": { "description": "Documents juridiques - Cote d'Ivoire" },
            }))
            .send()
            .await?;
        let response = check_status(response).await?;
        let collection: CollectionResponse = response.json().await?;

        tracing::info!(
            collection = %config.collection,
            id = %collection.id,
            "connected to vector collection"
        );

        Ok(Self {
            client,
            collection_url: format!("{base}/collections/{}", collection.id),
            collection_name: config.collection.clone(),
        })
    }

    pub fn collection_name(&self) -> &str {
        &self.collection_name
    }

    /// Nearest neighbours of one query embedding.
    pub async fn query(
        &self,
        embedding: &[f32],
        n_results: usize,
    ) -> Result<Vec<QueryHit>, StoreError> {
        let response = self
            .client
            .post(format!("{}/query", self.collection_url))
            .json(&json!({
                "query_embeddings": [embedding],
                "n_results": n_results,
                "include": ["documents", "metadatas", "distances"],
            }))
            .send()
            .await?;
        let response = check_status(response).await?;
        let body: QueryResponse = response.json().await?;

        let ids = body
            .ids
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::InvalidResponse("query returned no result rows".into()))?;
        let documents = body.documents.and_then(|d| d.into_iter().next());
        let metadatas = body.metadatas.and_then(|m| m.into_iter().next());
        let distances = body.distances.and_then(|d| d.into_iter().next());

        let hits = ids
            .into_iter()
            .enumerate()
            .map(|(i, id)| {
                let metadata = metadatas
                    .as_ref()
                    .and_then(|m| m.get(i))
                    .and_then(|m| m.as_ref());
                let field = |name: &str| {
                    metadata
                        .and_then(|m| m.get(name))
                        .and_then(Value::as_str)
                        .map(str::to_string)
                };
                QueryHit {
                    id,
                    title: field("title"),
                    category: field("category"),
                    preview: documents
                        .as_ref()
                        .and_then(|d| d.get(i))
                        .and_then(|d| d.clone()),
                    distance: distances.as_ref().and_then(|d| d.get(i)).copied(),
                }
            })
            .collect();
        Ok(hits)
    }
}

#[async_trait]
impl VectorSink for ChromaStore {
    async fn upsert_batch(
        &mut self,
        docs: &[Document],
        embeddings: Option<&[Vec<f32>]>,
    ) -> Result<usize, StoreError> {
        if docs.is_empty() {
            return Ok(0);
        }

        let ids: Vec<&str> = docs.iter().map(|d| d.id.as_str()).collect();
        let texts: Vec<&str> = docs.iter().map(|d| d.content.as_str()).collect();
        let metadatas: Vec<Value> = docs
            .iter()
            .map(|d| {
                json!({
                    "title": d.title,
                    "category": d.category,
                    "source_url": d.source_url,
                    "scraped_at": d.scraped_at.to_rfc3339(),
                })
            })
            .collect();

        let mut payload = json!({
            "ids": ids,
            "documents": texts,
            "metadatas": metadatas,
        });
        if let Some(vectors) = embeddings {
            payload["embeddings"] = json!(vectors);
        }

        let response = self
            .client
            .post(format!("{}/upsert", self.collection_url))
            .json(&payload)
            .send()
            .await?;
        check_status(response).await?;
        Ok(docs.len())
    }

    async fn count(&mut self) -> Result<u64, StoreError> {
        let response = self
            .client
            .get(format!("{}/count", self.collection_url))
            .send()
            .await?;
        let response = check_status(response).await?;
        let count: u64 = response.json().await?;
        Ok(count)
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        let message = response.text().await.unwrap_or_default();
        Err(StoreError::Api {
            status: status.as_u16(),
            message,
        })
    }
}
