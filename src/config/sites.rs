//! Site descriptors: which sites to harvest and how to find documents on them

use serde::{Deserialize, Serialize};

/// A site to harvest. Static configuration, never derived at runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteDescriptor {
    /// Human-readable source name, also used as the document category
    /// in the page-harvesting flow
    pub name: String,
    /// Entry page URL
    pub base_url: String,
    /// CSS selector patterns locating document links on the entry page.
    /// Supplied as-is and not validated; selectors that match nothing are
    /// a valid (logged) outcome. Site structures change, so expect to
    /// adjust these per site.
    #[serde(default)]
    pub selectors: Vec<String>,
    /// Processing priority, lower first
    #[serde(default = "default_priority")]
    pub priority: u8,
}

fn default_priority() -> u8 {
    3
}

impl SiteDescriptor {
    /// Source name as an id-safe slug (lowercase, spaces to underscores).
    pub fn slug(&self) -> String {
        self.name
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_")
    }
}

fn site(name: &str, base_url: &str, selectors: &[&str], priority: u8) -> SiteDescriptor {
    SiteDescriptor {
        name: name.to_string(),
        base_url: base_url.to_string(),
        selectors: selectors.iter().map(|s| s.to_string()).collect(),
        priority,
    }
}

/// Official legal sources for the link-harvesting flow.
pub fn official_sites() -> Vec<SiteDescriptor> {
    vec![
        site(
            "Ministere de la Justice",
            "https://www.justice.ci/",
            &["a[href*='texte']", "a[href*='code']", "a[href*='.pdf']"],
            1,
        ),
        site(
            "SGG - Journal Officiel",
            "https://www.sgg.gouv.ci/",
            &["a[href*='jo']", "a[href*='decret']", "a[href*='.pdf']"],
            1,
        ),
        site(
            "Assemblee Nationale",
            "https://www.assnat.ci/",
            &["a[href*='loi']", "a[href*='projet']", "a[href*='.pdf']"],
            2,
        ),
        site(
            "CNDJ",
            "https://www.cndj.ci/",
            &["a[href*='texte']", "a[href*='document']"],
            2,
        ),
        site(
            "Droit-Afrique",
            "https://www.droit-afrique.com/",
            &["a[href*='cote-ivoire']", "a[href*='cotedivoire']"],
            3,
        ),
    ]
}

/// Portal entry pages for the page-harvesting flow. No link selectors:
/// article blocks are taken from the entry page itself.
pub fn portal_sites() -> Vec<SiteDescriptor> {
    vec![
        site("journal_officiel", "https://jo.gouv.ci", &[], 1),
        site("cepici", "https://www.cepici.ci", &[], 2),
        site("dgi", "https://www.dgi.gouv.ci", &[], 2),
    ]
}
