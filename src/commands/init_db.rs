use anyhow::{Context, Result};
use lexharvest::store::{ChromaStore, PostgresStore};

use super::StoreParams;

/// Create the relational schema and the vector collection. Idempotent:
/// existing tables and collections are left in place.
pub async fn init_db(params: StoreParams, with_embeddings: bool) -> Result<()> {
    let postgres = PostgresStore::connect(&params.database_url)
        .await
        .context("connecting to PostgreSQL")?;
    postgres
        .init_schema(with_embeddings)
        .await
        .context("creating relational schema")?;
    println!(
        "Relational schema ready{}",
        if with_embeddings {
            " (with pgvector embedding column)"
        } else {
            ""
        }
    );

    let chroma = ChromaStore::connect(&params.chroma_config())
        .await
        .context("connecting to the vector store")?;
    println!("Vector collection '{}' ready", chroma.collection_name());
    Ok(())
}
