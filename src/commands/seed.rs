use anyhow::Result;
use lexharvest::seed::seed_documents;

use super::{persist_batch, StoreParams};

/// Load the built-in starter corpus into both sinks. Ids are fixed, so
/// running this twice upserts rather than duplicating.
pub async fn seed_corpus(params: StoreParams, embed_local: bool) -> Result<()> {
    let docs = seed_documents();
    println!("Seeding {} starter documents", docs.len());
    for doc in &docs {
        println!("  {} - {}", doc.id, doc.title);
    }
    persist_batch(&params, &docs, embed_local).await
}
