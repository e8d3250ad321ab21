//! Ingestion flows
//!
//! Two flows share the same fetch/extract/assemble machinery:
//!
//! - the harvest flow walks each site's entry page, collects document
//!   links via the site's selectors, and extracts one document per linked
//!   page;
//! - the article flow extracts document blocks directly from a portal's
//!   entry page without following links.
//!
//! Sites are processed sequentially by ascending priority, and every
//! request passes through the politeness gate first. Failures on one page
//! or one site never abort the run; they are counted and skipped.

use url::Url;

use crate::config::{ScrapeConfig, SiteDescriptor};
use crate::document::{Assembler, Document};
use crate::scraping::extractor::ContentExtractor;
use crate::scraping::fetcher::PageFetcher;
use crate::scraping::links::{collect_links, SelectorMode};
use crate::scraping::politeness::PolitenessGate;

/// Counters for one run, reported at the end and used by tests.
#[derive(Debug, Default, Clone)]
pub struct PipelineStats {
    pub sites_visited: usize,
    pub pages_fetched: usize,
    pub fetch_failures: usize,
    pub robots_denied: usize,
    pub links_discovered: usize,
    pub links_skipped: usize,
    pub documents_extracted: usize,
    pub documents_dropped: usize,
}

/// Documents plus counters from one run
#[derive(Debug)]
pub struct HarvestReport {
    pub documents: Vec<Document>,
    pub stats: PipelineStats,
}

pub struct Pipeline<'a> {
    fetcher: &'a dyn PageFetcher,
    gate: PolitenessGate,
    extractor: ContentExtractor,
    assembler: Assembler,
    max_links_per_site: usize,
    max_articles_per_page: usize,
}

impl<'a> Pipeline<'a> {
    pub fn new(fetcher: &'a dyn PageFetcher, config: &ScrapeConfig) -> Self {
        Self {
            fetcher,
            gate: PolitenessGate::new(config),
            extractor: ContentExtractor::new(),
            assembler: Assembler::new(config),
            max_links_per_site: config.max_links_per_site,
            max_articles_per_page: config.max_articles_per_page,
        }
    }

    /// Link-harvesting flow over a list of sites.
    pub async fn harvest(&mut self, sites: &[SiteDescriptor]) -> HarvestReport {
        let mut sites: Vec<&SiteDescriptor> = sites.iter().collect();
        sites.sort_by_key(|s| s.priority);

        let mut documents = Vec::new();
        let mut stats = PipelineStats::default();

        for (i, site) in sites.iter().enumerate() {
            if i > 0 {
                self.gate.site_pause().await;
            }
            tracing::info!(site = %site.name, "harvesting");
            self.harvest_site(site, &mut documents, &mut stats).await;
            stats.sites_visited += 1;
        }

        tracing::info!(
            sites = stats.sites_visited,
            documents = documents.len(),
            fetch_failures = stats.fetch_failures,
            "harvest run complete"
        );
        HarvestReport { documents, stats }
    }

    async fn harvest_site(
        &mut self,
        site: &SiteDescriptor,
        documents: &mut Vec<Document>,
        stats: &mut PipelineStats,
    ) {
        let base_url = match Url::parse(&site.base_url) {
            Ok(url) => url,
            Err(err) => {
                tracing::warn!(site = %site.name, "invalid base URL: {}", err);
                stats.fetch_failures += 1;
                return;
            }
        };

        let entry = match self.fetch_page(&base_url, stats).await {
            Some(page) => page,
            None => return,
        };

        let links = collect_links(&base_url, &entry, &site.selectors, SelectorMode::Union);
        let capped = links.len().min(self.max_links_per_site);
        stats.links_discovered += links.len();
        tracing::info!(
            site = %site.name,
            found = links.len(),
            following = capped,
            "document links"
        );

        for url in links.into_iter().take(self.max_links_per_site) {
            if url.path().to_ascii_lowercase().ends_with(".pdf") {
                tracing::warn!(url = %url, "skipping PDF link");
                stats.links_skipped += 1;
                continue;
            }

            let body = match self.fetch_page(&url, stats).await {
                Some(body) => body,
                None => continue,
            };

            let extracted = self.extractor.extract(&body, &url);
            match self
                .assembler
                .from_page(site, &url, &extracted.title, &extracted.text)
            {
                Some(doc) => {
                    tracing::debug!(id = %doc.id, title = %doc.title, "extracted document");
                    documents.push(doc);
                    stats.documents_extracted += 1;
                }
                None => {
                    tracing::debug!(url = %url, "content below minimum length, dropped");
                    stats.documents_dropped += 1;
                }
            }
        }
    }

    /// Article flow: extract document blocks from each portal's entry page.
    pub async fn scrape_articles(&mut self, sites: &[SiteDescriptor]) -> HarvestReport {
        let mut documents = Vec::new();
        let mut stats = PipelineStats::default();

        for (i, site) in sites.iter().enumerate() {
            if i > 0 {
                self.gate.site_pause().await;
            }
            tracing::info!(site = %site.name, "scraping entry page");

            let base_url = match Url::parse(&site.base_url) {
                Ok(url) => url,
                Err(err) => {
                    tracing::warn!(site = %site.name, "invalid base URL: {}", err);
                    stats.fetch_failures += 1;
                    continue;
                }
            };

            let body = match self.fetch_page(&base_url, &mut stats).await {
                Some(body) => body,
                None => continue,
            };

            let blocks = self
                .extractor
                .article_blocks(&body, self.max_articles_per_page);
            for (index, block) in blocks.into_iter().enumerate() {
                match self
                    .assembler
                    .from_article(site, index, block.title, &block.text)
                {
                    Some(doc) => {
                        documents.push(doc);
                        stats.documents_extracted += 1;
                    }
                    None => stats.documents_dropped += 1,
                }
            }
            stats.sites_visited += 1;
        }

        tracing::info!(
            sites = stats.sites_visited,
            documents = documents.len(),
            "article run complete"
        );
        HarvestReport { documents, stats }
    }

    /// Robots check, delay, fetch. Returns the body only for successful
    /// HTML responses; every other outcome is counted and skipped.
    async fn fetch_page(&mut self, url: &Url, stats: &mut PipelineStats) -> Option<String> {
        if !self.gate.is_allowed(self.fetcher, url).await {
            tracing::info!(url = %url, "denied by robots.txt");
            stats.robots_denied += 1;
            return None;
        }

        self.gate.enforce_delay(url).await;

        match self.fetcher.fetch(url).await {
            Ok(page) => {
                stats.pages_fetched += 1;
                if page.is_html() {
                    Some(page.body)
                } else {
                    tracing::warn!(url = %url, content_type = %page.content_type, "not HTML, skipped");
                    stats.links_skipped += 1;
                    None
                }
            }
            Err(err) => {
                tracing::warn!(url = %url, "fetch failed: {}", err);
                stats.fetch_failures += 1;
                None
            }
        }
    }
}
