//! Scraping configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::DEFAULT_USER_AGENT;

/// Web scraping configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeConfig {
    /// User agent string sent with every request
    pub user_agent: String,
    /// Request timeout (seconds)
    pub request_timeout_secs: u64,
    /// Minimum delay between requests to the same host (seconds)
    pub per_request_delay_secs: u64,
    /// Pause after finishing a site before moving to the next (seconds)
    pub site_pause_secs: u64,
    /// Maximum links followed per site in the link-harvesting flow
    pub max_links_per_site: usize,
    /// Maximum article blocks taken from an entry page
    pub max_articles_per_page: usize,
    /// Documents shorter than this (characters) are dropped
    pub min_content_length: usize,
    /// Stored title cap (characters)
    pub title_max_chars: usize,
    /// Stored content preview cap (characters)
    pub preview_max_chars: usize,
    /// Session robots.txt cache size (hosts)
    pub robots_cache_size: usize,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout_secs: 30,
            per_request_delay_secs: 3,
            site_pause_secs: 2,
            max_links_per_site: 10,
            max_articles_per_page: 10,
            min_content_length: 100,
            title_max_chars: 500,
            preview_max_chars: 500,
            robots_cache_size: 64,
        }
    }
}

impl ScrapeConfig {
    /// Per-host minimum request interval.
    pub fn per_request_delay(&self) -> Duration {
        Duration::from_secs(self.per_request_delay_secs)
    }

    /// Pause between sites.
    pub fn site_pause(&self) -> Duration {
        Duration::from_secs(self.site_pause_secs)
    }

    /// HTTP request timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
