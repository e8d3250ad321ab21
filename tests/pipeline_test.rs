//! End-to-end ingestion tests with in-memory fetchers and sinks.
//! No network, no database: the fetch seam and both sink traits are
//! replaced with fakes.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use lexharvest::config::{ScrapeConfig, SiteDescriptor};
use lexharvest::document::Document;
use lexharvest::pipeline::Pipeline;
use lexharvest::scraping::fetcher::{FetchError, FetchedPage, PageFetcher};
use lexharvest::store::{DualSinkWriter, MetadataSink, StoreError, VectorSink};

/// Serves pages from a map; anything else is a 404. robots.txt is a 404
/// too unless explicitly added, which exercises the fail-open path.
struct FakeFetcher {
    pages: HashMap<String, String>,
}

impl FakeFetcher {
    fn new(pages: &[(&str, &str)]) -> Self {
        Self {
            pages: pages
                .iter()
                .map(|(url, body)| (url.to_string(), body.to_string()))
                .collect(),
        }
    }
}

#[async_trait]
impl PageFetcher for FakeFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        match self.pages.get(url.as_str()) {
            Some(body) => Ok(FetchedPage {
                final_url: url.clone(),
                status: 200,
                body: body.clone(),
                content_type: "text/html; charset=utf-8".to_string(),
                fetch_duration: Duration::from_millis(1),
            }),
            None => Err(FetchError::Status {
                url: url.as_str().to_string(),
                status: 404,
            }),
        }
    }
}

/// Metadata sink backed by a map, with an optional id that always fails.
#[derive(Default)]
struct MemoryMetadataSink {
    rows: HashMap<String, Document>,
    fail_id: Option<String>,
}

#[async_trait]
impl MetadataSink for MemoryMetadataSink {
    async fn upsert(
        &mut self,
        doc: &Document,
        _embedding: Option<&[f32]>,
    ) -> Result<(), StoreError> {
        if self.fail_id.as_deref() == Some(doc.id.as_str()) {
            return Err(StoreError::InvalidResponse("simulated failure".into()));
        }
        self.rows.insert(doc.id.clone(), doc.clone());
        Ok(())
    }
}

#[derive(Default)]
struct MemoryVectorSink {
    ids: Vec<String>,
    fail: bool,
}

#[async_trait]
impl VectorSink for MemoryVectorSink {
    async fn upsert_batch(
        &mut self,
        docs: &[Document],
        _embeddings: Option<&[Vec<f32>]>,
    ) -> Result<usize, StoreError> {
        if self.fail {
            return Err(StoreError::Api {
                status: 503,
                message: "unavailable".into(),
            });
        }
        for doc in docs {
            if !self.ids.contains(&doc.id) {
                self.ids.push(doc.id.clone());
            }
        }
        Ok(docs.len())
    }

    async fn count(&mut self) -> Result<u64, StoreError> {
        Ok(self.ids.len() as u64)
    }
}

fn fast_config() -> ScrapeConfig {
    ScrapeConfig {
        per_request_delay_secs: 0,
        site_pause_secs: 0,
        ..ScrapeConfig::default()
    }
}

fn test_site() -> SiteDescriptor {
    SiteDescriptor {
        name: "Test Site".to_string(),
        base_url: "https://example.ci/".to_string(),
        selectors: vec!["a[href*='loi']".to_string()],
        priority: 1,
    }
}

fn long_paragraph() -> String {
    "Article premier. La presente loi fixe les regles applicables. ".repeat(5)
}

#[tokio::test]
async fn harvest_follows_links_and_drops_short_pages() {
    let long = long_paragraph();
    let entry = r#"<html><body>
        <a href="/loi/2020-123">Loi 2020-123</a>
        <a href="/loi/2020-456">Loi 2020-456</a>
        <a href="/loi/annexe.pdf">Annexe PDF</a>
        <a href="/autre/page">Autre</a>
    </body></html>"#;
    let page_long = format!(
        "<html><head><title>Loi 2020-123</title></head><body><main>{}</main></body></html>",
        long
    );
    let page_short =
        "<html><head><title>Loi 2020-456</title></head><body><main>Trop court.</main></body></html>";

    let fetcher = FakeFetcher::new(&[
        ("https://example.ci/", entry),
        ("https://example.ci/loi/2020-123", &page_long),
        ("https://example.ci/loi/2020-456", page_short),
    ]);

    let config = fast_config();
    let mut pipeline = Pipeline::new(&fetcher, &config);
    let report = pipeline.harvest(&[test_site()]).await;

    assert_eq!(report.documents.len(), 1);
    let doc = &report.documents[0];
    assert_eq!(doc.title, "Loi 2020-123");
    assert_eq!(doc.category, "legislation");
    assert_eq!(doc.source_url, "https://example.ci/loi/2020-123");
    assert!(doc.id.starts_with("test_site_"));

    assert_eq!(report.stats.sites_visited, 1);
    assert_eq!(report.stats.documents_dropped, 1);
    // the PDF link never hits the network
    assert_eq!(report.stats.links_skipped, 1);
    // robots.txt returned 404, which must not block anything
    assert_eq!(report.stats.robots_denied, 0);
}

#[tokio::test]
async fn harvest_respects_robots_disallow() {
    let entry = r#"<html><body><a href="/loi/2020-123">Loi</a></body></html>"#;
    let fetcher = FakeFetcher::new(&[
        ("https://example.ci/robots.txt", "User-agent: *\nDisallow: /"),
        ("https://example.ci/", entry),
    ]);

    let config = fast_config();
    let mut pipeline = Pipeline::new(&fetcher, &config);
    let report = pipeline.harvest(&[test_site()]).await;

    assert!(report.documents.is_empty());
    assert_eq!(report.stats.pages_fetched, 0);
    assert!(report.stats.robots_denied >= 1);
}

#[tokio::test]
async fn harvest_caps_links_per_site() {
    let long = long_paragraph();
    let entry: String = (0..20)
        .map(|i| format!(r#"<a href="/loi/{i}">Loi {i}</a>"#))
        .collect();
    let entry = format!("<html><body>{entry}</body></html>");

    let mut pages = vec![("https://example.ci/".to_string(), entry)];
    for i in 0..20 {
        pages.push((
            format!("https://example.ci/loi/{i}"),
            format!("<html><body><main>{long} numero {i}</main></body></html>"),
        ));
    }
    let page_refs: Vec<(&str, &str)> = pages
        .iter()
        .map(|(u, b)| (u.as_str(), b.as_str()))
        .collect();
    let fetcher = FakeFetcher::new(&page_refs);

    let mut config = fast_config();
    config.max_links_per_site = 5;
    let mut pipeline = Pipeline::new(&fetcher, &config);
    let report = pipeline.harvest(&[test_site()]).await;

    assert_eq!(report.documents.len(), 5);
    assert_eq!(report.stats.links_discovered, 20);
}

#[tokio::test]
async fn scrape_extracts_article_blocks_from_entry_page() {
    let long = long_paragraph();
    let entry = format!(
        r#"<html><body>
            <article><h2>Decret sur les marches publics</h2>{long}</article>
            <article>{long} seconde publication</article>
            <article>Bloc trop court</article>
        </body></html>"#
    );
    let fetcher = FakeFetcher::new(&[("https://example.ci/", &entry)]);

    let config = fast_config();
    let mut pipeline = Pipeline::new(&fetcher, &config);
    let site = test_site();
    let report = pipeline.scrape_articles(std::slice::from_ref(&site)).await;

    assert_eq!(report.documents.len(), 2);
    assert_eq!(report.stats.documents_dropped, 1);

    let first = &report.documents[0];
    assert_eq!(first.title, "Decret sur les marches publics");
    assert_eq!(first.category, "Test Site");
    assert_eq!(first.source_url, "https://example.ci/");

    // untitled block falls back to a numbered label
    assert_eq!(report.documents[1].title, "Test Site Document #2");
}

#[tokio::test]
async fn dual_sink_writer_reports_partial_failures() {
    let long = long_paragraph();
    let entry: String = (0..5)
        .map(|i| format!(r#"<a href="/loi/{i}">Loi {i}</a>"#))
        .collect();
    let entry = format!("<html><body>{entry}</body></html>");

    let mut pages = vec![("https://example.ci/".to_string(), entry)];
    for i in 0..5 {
        pages.push((
            format!("https://example.ci/loi/{i}"),
            format!("<html><body><main>{long} numero {i}</main></body></html>"),
        ));
    }
    let page_refs: Vec<(&str, &str)> = pages
        .iter()
        .map(|(u, b)| (u.as_str(), b.as_str()))
        .collect();
    let fetcher = FakeFetcher::new(&page_refs);

    let config = fast_config();
    let mut pipeline = Pipeline::new(&fetcher, &config);
    let report = pipeline.harvest(&[test_site()]).await;
    assert_eq!(report.documents.len(), 5);

    let mut metadata = MemoryMetadataSink {
        fail_id: Some(report.documents[2].id.clone()),
        ..Default::default()
    };
    let mut vector = MemoryVectorSink::default();

    let result = DualSinkWriter::new(&mut metadata, &mut vector)
        .persist(&report.documents, None)
        .await;

    assert_eq!(result.relational_ok, 4);
    assert_eq!(result.relational_failures.len(), 1);
    assert_eq!(result.relational_failures[0].0, report.documents[2].id);
    assert_eq!(result.vector_ok, 5);
    assert!(result.vector_error.is_none());
    assert!(!result.fully_successful());
}

#[tokio::test]
async fn reingesting_the_same_page_upserts_instead_of_duplicating() {
    let long = long_paragraph();
    let entry = r#"<html><body><a href="/loi/2020-123">Loi</a></body></html>"#;
    let page = format!("<html><body><main>{long}</main></body></html>");
    let fetcher = FakeFetcher::new(&[
        ("https://example.ci/", entry),
        ("https://example.ci/loi/2020-123", &page),
    ]);

    let config = fast_config();
    let mut metadata = MemoryMetadataSink::default();
    let mut vector = MemoryVectorSink::default();

    for _ in 0..2 {
        let mut pipeline = Pipeline::new(&fetcher, &config);
        let report = pipeline.harvest(&[test_site()]).await;
        assert_eq!(report.documents.len(), 1);
        let result = DualSinkWriter::new(&mut metadata, &mut vector)
            .persist(&report.documents, None)
            .await;
        assert!(result.fully_successful());
    }

    assert_eq!(metadata.rows.len(), 1);
    assert_eq!(vector.ids.len(), 1);
}

#[tokio::test]
async fn vector_sink_failure_does_not_lose_relational_writes() {
    let long = long_paragraph();
    let entry = r#"<html><body><a href="/loi/2020-123">Loi</a></body></html>"#;
    let page = format!("<html><body><main>{long}</main></body></html>");
    let fetcher = FakeFetcher::new(&[
        ("https://example.ci/", entry),
        ("https://example.ci/loi/2020-123", &page),
    ]);

    let config = fast_config();
    let mut pipeline = Pipeline::new(&fetcher, &config);
    let report = pipeline.harvest(&[test_site()]).await;

    let mut metadata = MemoryMetadataSink::default();
    let mut vector = MemoryVectorSink {
        fail: true,
        ..Default::default()
    };

    let result = DualSinkWriter::new(&mut metadata, &mut vector)
        .persist(&report.documents, None)
        .await;

    assert_eq!(result.relational_ok, 1);
    assert_eq!(metadata.rows.len(), 1);
    assert!(result.vector_error.is_some());
    assert!(!result.fully_successful());
}
