//! Web scraping subsystem
//!
//! Components, in pipeline order:
//! - `Fetcher`: HTTP GET with a fixed identifying header and bounded timeout
//! - `PolitenessGate`: robots.txt checks (fail-open) and per-host delays
//! - `collect_links`: selector-driven link discovery and resolution
//! - `ContentExtractor`: HTML to clean text and title

pub mod extractor;
pub mod fetcher;
pub mod links;
pub mod politeness;

pub use extractor::{ArticleBlock, ContentExtractor, Extracted};
pub use fetcher::{FetchError, FetchedPage, Fetcher, PageFetcher};
pub use links::{collect_links, SelectorMode};
pub use politeness::PolitenessGate;
