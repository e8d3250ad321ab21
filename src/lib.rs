//! LexHarvest: legal-document ingestion for a retrieval knowledge base
//!
//! A run-to-completion harvester that feeds a question-answering product:
//! - Polite scraping of official legal/government sites (robots.txt, fixed
//!   per-host delays)
//! - Selector-driven content extraction (HTML to clean text)
//! - Stable, content-derived document ids so re-runs upsert instead of
//!   duplicating
//! - Dual-sink persistence: relational metadata store (PostgreSQL, optional
//!   pgvector column) plus a vector collection for semantic search
//! - A built-in seed corpus and schema/smoke-test utilities

pub mod config;
pub mod document;
pub mod embedding;
pub mod pipeline;
pub mod scraping;
pub mod seed;
pub mod store;
pub mod util;

pub use config::Config;
pub use document::Document;
