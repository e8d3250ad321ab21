//! Content extraction from HTML
//!
//! Turns a page into a title and clean text. Non-content elements
//! (script/style/nav/header/footer) never contribute text. The main content
//! region is located by an ordered selector chain with stop-on-first-match
//! semantics, falling back to the whole body; whitespace runs collapse to
//! single spaces.

use ego_tree::NodeRef;
use scraper::{ElementRef, Html, Node, Selector};
use url::Url;

/// Elements whose text is never content
const EXCLUDED_ELEMENTS: &[&str] = &["script", "style", "nav", "header", "footer", "noscript"];

/// Extracted title and text for one page
#[derive(Debug, Clone)]
pub struct Extracted {
    pub title: String,
    pub text: String,
}

/// One candidate article block from an entry page
#[derive(Debug, Clone)]
pub struct ArticleBlock {
    /// Best-guess heading found inside the block, if any
    pub title: Option<String>,
    /// Clean text of the block
    pub text: String,
}

/// Content extractor with precompiled selector chains
pub struct ContentExtractor {
    /// Main-content candidates, in priority order, ending with `body`
    content_selectors: Vec<Selector>,
    /// Article-block candidates for entry pages, in priority order
    article_selectors: Vec<Selector>,
    /// Heading candidates inside an article block
    block_title_selectors: Vec<Selector>,
    title_selector: Selector,
    h1_selector: Selector,
}

impl ContentExtractor {
    pub fn new() -> Self {
        let content_selectors = ["main", "article", "div.content, div.main, div.text", "body"]
            .iter()
            .filter_map(|s| Selector::parse(s).ok())
            .collect();

        let article_selectors = ["article", "div.post", "div.content", "div.document"]
            .iter()
            .filter_map(|s| Selector::parse(s).ok())
            .collect();

        let block_title_selectors = ["h1, h2, h3, h4", ".title, .titre, .heading"]
            .iter()
            .filter_map(|s| Selector::parse(s).ok())
            .collect();

        Self {
            content_selectors,
            article_selectors,
            block_title_selectors,
            title_selector: Selector::parse("title").expect("static selector"),
            h1_selector: Selector::parse("h1").expect("static selector"),
        }
    }

    /// Extract the title and main text of a page.
    pub fn extract(&self, html: &str, url: &Url) -> Extracted {
        let document = Html::parse_document(html);
        let title = self.extract_title(&document, url);
        let text = match self.find_main_content(&document) {
            Some(region) => collect_text(region),
            None => String::new(),
        };
        Extracted { title, text }
    }

    /// Locate the main content region: first selector in the chain with a
    /// match wins.
    fn find_main_content<'a>(&self, document: &'a Html) -> Option<ElementRef<'a>> {
        for selector in &self.content_selectors {
            if let Some(element) = document.select(selector).next() {
                return Some(element);
            }
        }
        None
    }

    /// Title resolution: `<title>`, else first `<h1>`, else the last path
    /// segment of the URL.
    fn extract_title(&self, document: &Html, url: &Url) -> String {
        if let Some(el) = document.select(&self.title_selector).next() {
            let title = collapse_whitespace(&el.text().collect::<String>());
            if !title.is_empty() {
                return title;
            }
        }

        if let Some(el) = document.select(&self.h1_selector).next() {
            let title = collapse_whitespace(&el.text().collect::<String>());
            if !title.is_empty() {
                return title;
            }
        }

        url.path_segments()
            .and_then(|mut segments| segments.next_back().map(|s| s.to_string()))
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| url.as_str().to_string())
    }

    /// Select candidate article blocks from an entry page.
    ///
    /// First-match semantics: the first selector in the chain that matches
    /// anything drives extraction; later selectors are not unioned in.
    pub fn article_blocks(&self, html: &str, limit: usize) -> Vec<ArticleBlock> {
        let document = Html::parse_document(html);

        for selector in &self.article_selectors {
            let blocks: Vec<ArticleBlock> = document
                .select(selector)
                .take(limit)
                .map(|el| ArticleBlock {
                    title: self.block_title(el),
                    text: collect_text(el),
                })
                .collect();
            if !blocks.is_empty() {
                return blocks;
            }
        }

        Vec::new()
    }

    fn block_title(&self, block: ElementRef<'_>) -> Option<String> {
        for selector in &self.block_title_selectors {
            if let Some(el) = block.select(selector).next() {
                let title = collapse_whitespace(&el.text().collect::<String>());
                if !title.is_empty() {
                    return Some(title);
                }
            }
        }
        None
    }
}

impl Default for ContentExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Check if a node sits inside an excluded (non-content) element
fn has_excluded_ancestor(node: &NodeRef<Node>) -> bool {
    let mut current = node.parent();
    while let Some(parent) = current {
        if let Some(elem) = parent.value().as_element() {
            if EXCLUDED_ELEMENTS.contains(&elem.name()) {
                return true;
            }
        }
        current = parent.parent();
    }
    false
}

/// Gather text nodes under a region, skipping non-content subtrees, and
/// collapse all whitespace runs to single spaces.
fn collect_text(region: ElementRef<'_>) -> String {
    let mut out = String::new();
    for node in region.descendants() {
        if let Some(text) = node.value().as_text() {
            if has_excluded_ancestor(&node) {
                continue;
            }
            out.push_str(text);
            out.push(' ');
        }
    }
    collapse_whitespace(&out)
}

/// Collapse whitespace runs to single spaces and trim.
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
