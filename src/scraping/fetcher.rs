//! Page fetching
//!
//! A thin wrapper over reqwest that normalizes every network failure into a
//! typed `FetchError`. Nothing escapes this boundary as a panic or a raw
//! transport error: timeouts, connection failures, and non-2xx statuses all
//! come back as values the pipeline can skip past.

use async_trait::async_trait;
use std::time::{Duration, Instant};
use thiserror::Error;
use url::Url;

use crate::config::ScrapeConfig;

/// Errors that can occur during fetching
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("HTTP status {status} for {url}")]
    Status { url: String, status: u16 },
    #[error("Failed to parse URL: {0}")]
    InvalidUrl(String),
}

/// Result of a successful fetch
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// The fetched URL (may differ from the request due to redirects)
    pub final_url: Url,
    /// HTTP status code (always 2xx here)
    pub status: u16,
    /// Response body
    pub body: String,
    /// Content type reported by the server
    pub content_type: String,
    /// Time taken to fetch
    pub fetch_duration: Duration,
}

/// Seam for the pipeline and the politeness gate: anything that can turn a
/// URL into a page. Production uses `Fetcher`; tests substitute in-memory
/// fakes.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError>;
}

/// HTTP fetcher with a fixed user agent and bounded timeout
pub struct Fetcher {
    client: reqwest::Client,
}

impl Fetcher {
    /// Build a fetcher from the scraping configuration.
    pub fn new(config: &ScrapeConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .connect_timeout(Duration::from_secs(10))
            .user_agent(&config.user_agent)
            .gzip(true)
            .build()?;
        Ok(Self { client })
    }

    async fn fetch_http(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        let start = Instant::now();

        let response = self.client.get(url.as_str()).send().await?;
        let status = response.status();
        let final_url = response.url().clone();

        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.as_str().to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("text/html")
            .to_string();

        let body = response.text().await?;

        Ok(FetchedPage {
            final_url: Url::parse(final_url.as_str())
                .map_err(|e| FetchError::InvalidUrl(e.to_string()))?,
            status: status.as_u16(),
            body,
            content_type,
            fetch_duration: start.elapsed(),
        })
    }
}

#[async_trait]
impl PageFetcher for Fetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        self.fetch_http(url).await
    }
}

impl FetchedPage {
    /// Check if this is HTML content
    pub fn is_html(&self) -> bool {
        self.content_type.contains("text/html")
            || self.content_type.contains("application/xhtml")
    }
}
