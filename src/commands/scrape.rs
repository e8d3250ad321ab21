use anyhow::{Context, Result};
use lexharvest::config::Config;
use lexharvest::pipeline::Pipeline;
use lexharvest::scraping::fetcher::Fetcher;
use tracing::info;

use super::{persist_batch, StoreParams};

/// Scrape the configured portals: extract article blocks directly from
/// each entry page, without following links.
pub async fn scrape_portals(
    config: Config,
    params: StoreParams,
    embed_local: bool,
) -> Result<()> {
    info!("Scraping {} portal pages", config.portal_sites.len());

    let fetcher = Fetcher::new(&config.scraping).context("building HTTP client")?;
    let mut pipeline = Pipeline::new(&fetcher, &config.scraping);
    let report = pipeline.scrape_articles(&config.portal_sites).await;

    println!(
        "Extracted {} documents from {} portals ({} blocks dropped as too short)",
        report.documents.len(),
        report.stats.sites_visited,
        report.stats.documents_dropped,
    );

    if report.documents.is_empty() {
        println!("Nothing to persist");
        return Ok(());
    }

    persist_batch(&params, &report.documents, embed_local).await
}
