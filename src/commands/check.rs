use anyhow::{Context, Result};
use lexharvest::store::VectorSink;
use lexharvest::util::truncate_for_display;

use super::{local_embedder, open_sinks, StoreParams};

/// Report document counts in both stores and, with a query, run a
/// similarity search against the vector collection.
pub async fn check_stores(params: StoreParams, query: Option<String>) -> Result<()> {
    let (postgres, mut chroma) = open_sinks(&params).await?;

    let relational_count = postgres.count().await.context("counting relational rows")?;
    let vector_count = chroma.count().await.context("counting vector entries")?;
    println!("Relational store: {} documents", relational_count);
    println!(
        "Vector collection '{}': {} documents",
        chroma.collection_name(),
        vector_count
    );

    if let Some(text) = query {
        let embedder = local_embedder(&params)?;
        let vectors = embedder
            .embed(&[text.as_str()])
            .await
            .context("embedding the query")?;
        let embedding = vectors
            .first()
            .ok_or_else(|| anyhow::anyhow!("embedding provider returned no vector"))?;

        let hits = chroma
            .query(embedding, 5)
            .await
            .context("querying the vector store")?;
        println!("\nTop matches for \"{}\":", text);
        if hits.is_empty() {
            println!("  (no results)");
        }
        for (rank, hit) in hits.iter().enumerate() {
            let title = hit.title.as_deref().unwrap_or("(untitled)");
            let category = hit.category.as_deref().unwrap_or("-");
            match hit.distance {
                Some(d) => println!("  {}. {} [{}] (distance {:.4})", rank + 1, title, category, d),
                None => println!("  {}. {} [{}]", rank + 1, title, category),
            }
            if let Some(preview) = &hit.preview {
                println!("     {}", truncate_for_display(preview, 120));
            }
        }
    }

    Ok(())
}
