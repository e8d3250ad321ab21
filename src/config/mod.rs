//! Configuration for LexHarvest

mod logging;
mod scraping;
mod sites;

pub use logging::{LogLevel, LoggingConfig};
pub use scraping::ScrapeConfig;
pub use sites::{official_sites, portal_sites, SiteDescriptor};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default user agent for all HTTP requests (pages and robots.txt alike)
pub const DEFAULT_USER_AGENT: &str = "lexharvest/0.1 (Legal Research Bot)";

/// Main configuration for the harvester
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Scraping knobs (delays, timeouts, caps)
    #[serde(default)]
    pub scraping: ScrapeConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Sites for the link-harvesting flow (`harvest`), lower priority first
    #[serde(default = "official_sites")]
    pub harvest_sites: Vec<SiteDescriptor>,
    /// Sites for the page-harvesting flow (`scrape`)
    #[serde(default = "portal_sites")]
    pub portal_sites: Vec<SiteDescriptor>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scraping: ScrapeConfig::default(),
            logging: LoggingConfig::default(),
            harvest_sites: official_sites(),
            portal_sites: portal_sites(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file and validate it.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e)
        })?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            anyhow::anyhow!("Failed to parse config file '{}': {}", path.display(), e)
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Validate all configuration fields.
    ///
    /// Collects all validation errors and reports them together so the user
    /// can fix everything in one pass.
    pub fn validate(&self) -> Result<()> {
        let mut errors: Vec<String> = Vec::new();

        if self.scraping.user_agent.trim().is_empty() {
            errors.push("user_agent must not be empty".to_string());
        }
        if self.scraping.request_timeout_secs == 0 {
            errors.push("request_timeout_secs must be positive".to_string());
        }
        if self.scraping.min_content_length == 0 {
            errors.push("min_content_length must be positive".to_string());
        }
        if self.scraping.max_links_per_site == 0 {
            errors.push("max_links_per_site must be positive".to_string());
        }
        if self.scraping.preview_max_chars == 0 {
            errors.push("preview_max_chars must be positive".to_string());
        }
        if self.scraping.title_max_chars == 0 {
            errors.push("title_max_chars must be positive".to_string());
        }

        for site in self.harvest_sites.iter().chain(self.portal_sites.iter()) {
            if site.name.trim().is_empty() {
                errors.push("site name must not be empty".to_string());
            }
            if url::Url::parse(&site.base_url).is_err() {
                errors.push(format!(
                    "site '{}' has an invalid base_url: {}",
                    site.name, site.base_url
                ));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            anyhow::bail!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            )
        }
    }
}
