//! Document model and assembly
//!
//! A `Document` is the unit of ingestion: constructed once per extraction
//! pass, immutable afterwards. Ids are derived from explicit content/URL
//! hashes so that re-scraping an unchanged page reproduces the same id and
//! the sinks upsert instead of duplicating.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha1::Sha1;
use sha2::{Digest, Sha256};
use url::Url;

use crate::config::{ScrapeConfig, SiteDescriptor};
use crate::util::truncate_chars;

/// A normalized document ready for persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Stable identifier, deterministic across runs
    pub id: String,
    /// Human-readable title, capped at the configured length
    pub title: String,
    /// Coarse classification (source name or topic)
    pub category: String,
    /// Full normalized text, used for embedding/indexing
    pub content: String,
    /// Bounded prefix of `content`, stored in the metadata sink only
    pub content_preview: String,
    /// Originating page URL
    pub source_url: String,
    /// When the content was scraped
    pub scraped_at: DateTime<Utc>,
}

/// Builds documents from extracted text, enforcing the minimum-length
/// rejection and the title/preview caps.
#[derive(Debug, Clone)]
pub struct Assembler {
    min_content_length: usize,
    title_max_chars: usize,
    preview_max_chars: usize,
}

impl Assembler {
    pub fn new(config: &ScrapeConfig) -> Self {
        Self {
            min_content_length: config.min_content_length,
            title_max_chars: config.title_max_chars,
            preview_max_chars: config.preview_max_chars,
        }
    }

    /// Assemble a document from an article block on an entry page.
    ///
    /// Returns `None` (a drop, not an error) when the text is below the
    /// minimum length. Id scheme: `{site}_{index}_{content hash mod 1e6}`.
    pub fn from_article(
        &self,
        site: &SiteDescriptor,
        index: usize,
        title: Option<String>,
        text: &str,
    ) -> Option<Document> {
        if text.chars().count() < self.min_content_length {
            return None;
        }
        let title =
            title.unwrap_or_else(|| format!("{} Document #{}", site.name, index + 1));
        Some(Document {
            id: page_id(&site.slug(), index, text),
            title: truncate_chars(&title, self.title_max_chars),
            category: site.name.clone(),
            content: text.to_string(),
            content_preview: truncate_chars(text, self.preview_max_chars),
            source_url: site.base_url.clone(),
            scraped_at: Utc::now(),
        })
    }

    /// Assemble a document from a harvested link's page.
    ///
    /// Id scheme: `{site slug}_{first 10 hex chars of SHA-1(url)}`, so the
    /// id is stable even when page content drifts.
    pub fn from_page(
        &self,
        site: &SiteDescriptor,
        url: &Url,
        title: &str,
        text: &str,
    ) -> Option<Document> {
        if text.chars().count() < self.min_content_length {
            return None;
        }
        Some(Document {
            id: link_id(&site.slug(), url),
            title: truncate_chars(title, self.title_max_chars),
            category: "legislation".to_string(),
            content: text.to_string(),
            content_preview: truncate_chars(text, self.preview_max_chars),
            source_url: url.as_str().to_string(),
            scraped_at: Utc::now(),
        })
    }

    /// Minimum accepted content length in characters.
    pub fn min_content_length(&self) -> usize {
        self.min_content_length
    }
}

/// Id for the page-harvesting flow: site slug, block index, and the first
/// 8 bytes of SHA-256(content) reduced mod 1_000_000.
pub fn page_id(site_slug: &str, index: usize, content: &str) -> String {
    let digest = Sha256::digest(content.as_bytes());
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    let n = u64::from_be_bytes(prefix) % 1_000_000;
    format!("{}_{}_{}", site_slug, index, n)
}

/// Id for the link-harvesting flow: site slug plus the first 10 hex chars
/// of SHA-1 over the URL.
pub fn link_id(site_slug: &str, url: &Url) -> String {
    let digest = Sha1::digest(url.as_str().as_bytes());
    let hex = hex::encode(digest);
    format!("{}_{}", site_slug, &hex[..10])
}
