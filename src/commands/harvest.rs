use anyhow::{Context, Result};
use lexharvest::config::Config;
use lexharvest::pipeline::Pipeline;
use lexharvest::scraping::fetcher::Fetcher;
use tracing::info;

use super::{persist_batch, StoreParams};

/// Harvest the configured sites: follow document links from each entry
/// page, extract one document per page, and push the batch to both sinks.
pub async fn harvest_sites(
    config: Config,
    params: StoreParams,
    embed_local: bool,
) -> Result<()> {
    info!("Starting harvest of {} sites", config.harvest_sites.len());

    let fetcher = Fetcher::new(&config.scraping).context("building HTTP client")?;
    let mut pipeline = Pipeline::new(&fetcher, &config.scraping);
    let report = pipeline.harvest(&config.harvest_sites).await;

    println!(
        "Harvested {} documents from {} sites ({} links found, {} fetch failures, {} denied by robots.txt)",
        report.documents.len(),
        report.stats.sites_visited,
        report.stats.links_discovered,
        report.stats.fetch_failures,
        report.stats.robots_denied,
    );

    if report.documents.is_empty() {
        println!("Nothing to persist");
        return Ok(());
    }

    persist_batch(&params, &report.documents, embed_local).await
}
