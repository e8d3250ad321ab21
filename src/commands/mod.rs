//! CLI command implementations

mod check;
mod harvest;
mod init_db;
mod scrape;
mod seed;

pub use check::check_stores;
pub use harvest::harvest_sites;
pub use init_db::init_db;
pub use scrape::scrape_portals;
pub use seed::seed_corpus;

use std::time::Duration;

use anyhow::{Context, Result};
use lexharvest::document::Document;
use lexharvest::embedding::{Embedder, HashEmbedder, HttpEmbedder};
use lexharvest::store::{ChromaConfig, ChromaStore, DualSinkWriter, PostgresStore};
use tracing::{info, warn};

/// Connection settings for both sinks, resolved from flags and
/// environment by the CLI layer.
#[derive(Debug, Clone)]
pub struct StoreParams {
    pub database_url: String,
    pub chroma_url: String,
    pub chroma_api_key: Option<String>,
    pub chroma_tenant: String,
    pub chroma_database: String,
    pub embedding_endpoint: Option<String>,
    pub embedding_api_key: Option<String>,
    pub embedding_model: String,
}

impl StoreParams {
    fn chroma_config(&self) -> ChromaConfig {
        ChromaConfig::new(
            self.chroma_url.clone(),
            self.chroma_api_key.clone(),
            self.chroma_tenant.clone(),
            self.chroma_database.clone(),
        )
    }
}

async fn open_sinks(params: &StoreParams) -> Result<(PostgresStore, ChromaStore)> {
    let postgres = PostgresStore::connect(&params.database_url)
        .await
        .context("connecting to PostgreSQL")?;
    let chroma = ChromaStore::connect(&params.chroma_config())
        .await
        .context("connecting to the vector store")?;
    Ok((postgres, chroma))
}

/// Local embedding provider: the configured HTTP endpoint when present,
/// otherwise a deterministic hashing fallback.
fn local_embedder(params: &StoreParams) -> Result<Box<dyn Embedder>> {
    match &params.embedding_endpoint {
        Some(endpoint) => {
            let embedder = HttpEmbedder::new(
                endpoint.clone(),
                params.embedding_model.clone(),
                params.embedding_api_key.clone(),
                Duration::from_secs(60),
            )
            .context("building embedding client")?;
            Ok(Box::new(embedder))
        }
        None => {
            info!("no embedding endpoint configured, using hashing embedder");
            Ok(Box::new(HashEmbedder::new()))
        }
    }
}

/// Persist a batch to both sinks, optionally attaching locally computed
/// embeddings. Without local embeddings the vector store computes its own
/// and the relational rows carry none.
async fn persist_batch(
    params: &StoreParams,
    docs: &[Document],
    embed_local: bool,
) -> Result<()> {
    let (mut postgres, mut chroma) = open_sinks(params).await?;

    let embeddings = if embed_local {
        let embedder = local_embedder(params)?;
        let texts: Vec<&str> = docs.iter().map(|d| d.content.as_str()).collect();
        Some(
            embedder
                .embed(&texts)
                .await
                .context("computing embeddings")?,
        )
    } else {
        None
    };

    let mut writer = DualSinkWriter::new(&mut postgres, &mut chroma);
    let result = writer.persist(docs, embeddings.as_deref()).await;
    println!("Persisted batch: {}", result.summary());

    if !docs.is_empty() && result.relational_ok == 0 && result.vector_error.is_some() {
        anyhow::bail!("both sinks rejected the batch");
    }
    if !result.fully_successful() {
        warn!("batch persisted with partial failures");
    }
    Ok(())
}
