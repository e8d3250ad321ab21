//! Link collection
//!
//! Applies per-site selector patterns to an entry page and resolves every
//! discovered `href` against the base URL. Selector patterns are supplied
//! by configuration and deliberately not validated: a pattern that matches
//! nothing (or fails to parse) is a valid outcome, surfaced only as a log
//! line.

use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// How multiple selector patterns combine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorMode {
    /// The first pattern with any matches drives extraction (article
    /// listing pages)
    FirstMatch,
    /// All patterns' matches are unioned (link-harvesting pages)
    Union,
}

/// Collect document links from a page.
///
/// Returns absolute URLs, deduplicated, in discovery order. Relative hrefs
/// resolve against `base_url`; hrefs that do not form a valid URL are
/// dropped.
pub fn collect_links(
    base_url: &Url,
    html: &str,
    selectors: &[String],
    mode: SelectorMode,
) -> Vec<Url> {
    let document = Html::parse_document(html);

    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for pattern in selectors {
        let selector = match Selector::parse(pattern) {
            Ok(s) => s,
            Err(_) => {
                tracing::warn!("skipping unparsable selector pattern '{}'", pattern);
                continue;
            }
        };

        let mut matched_any = false;
        for element in document.select(&selector) {
            if let Some(href) = element.value().attr("href") {
                if let Ok(url) = base_url.join(href) {
                    matched_any = true;
                    if (url.scheme() == "http" || url.scheme() == "https")
                        && seen.insert(url.as_str().to_string())
                    {
                        links.push(url);
                    }
                }
            }
        }

        if matched_any && mode == SelectorMode::FirstMatch {
            break;
        }
    }

    if links.is_empty() {
        tracing::warn!(
            "no links found on {} with the configured selectors",
            base_url
        );
    }

    links
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_hrefs_resolve_against_base() {
        let base = Url::parse("https://example.ci/").unwrap();
        let html = r#"<a href="/loi/123">Loi</a>"#;
        let links = collect_links(&base, html, &["a[href]".to_string()], SelectorMode::Union);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].as_str(), "https://example.ci/loi/123");
    }

    #[test]
    fn bare_filenames_resolve_against_page_directory() {
        let base = Url::parse("https://example.ci/docs/").unwrap();
        let html = r#"<a href="texte.pdf">PDF</a>"#;
        let links = collect_links(&base, html, &["a[href]".to_string()], SelectorMode::Union);
        assert_eq!(links[0].as_str(), "https://example.ci/docs/texte.pdf");
    }

    #[test]
    fn union_mode_merges_and_deduplicates() {
        let base = Url::parse("https://www.sgg.gouv.ci/").unwrap();
        let html = r#"
            <a href="/jo/2024-01">JO janvier</a>
            <a href="/decret/123">Decret</a>
            <a href="/jo/2024-01">JO janvier (bis)</a>
        "#;
        let selectors = vec!["a[href*='jo']".to_string(), "a[href*='decret']".to_string()];
        let links = collect_links(&base, html, &selectors, SelectorMode::Union);
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].as_str(), "https://www.sgg.gouv.ci/jo/2024-01");
        assert_eq!(links[1].as_str(), "https://www.sgg.gouv.ci/decret/123");
    }

    #[test]
    fn first_match_mode_stops_at_first_matching_pattern() {
        let base = Url::parse("https://example.ci/").unwrap();
        let html = r#"
            <a href="/texte/1">Texte</a>
            <a href="/document/2">Document</a>
        "#;
        let selectors = vec![
            "a[href*='texte']".to_string(),
            "a[href*='document']".to_string(),
        ];
        let links = collect_links(&base, html, &selectors, SelectorMode::FirstMatch);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].as_str(), "https://example.ci/texte/1");
    }

    #[test]
    fn no_matches_is_a_valid_empty_outcome() {
        let base = Url::parse("https://example.ci/").unwrap();
        let html = "<p>Pas de liens ici</p>";
        let selectors = vec!["a[href*='loi']".to_string()];
        let links = collect_links(&base, html, &selectors, SelectorMode::Union);
        assert!(links.is_empty());
    }

    #[test]
    fn non_http_schemes_are_dropped() {
        let base = Url::parse("https://example.ci/").unwrap();
        let html = r#"
            <a href="mailto:contact@example.ci">Mail</a>
            <a href="/loi/1">Loi</a>
        "#;
        let links = collect_links(&base, html, &["a[href]".to_string()], SelectorMode::Union);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].as_str(), "https://example.ci/loi/1");
    }
}
