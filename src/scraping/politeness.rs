//! Politeness gate for site access
//!
//! Two duties: robots.txt gating and fixed per-host rate limiting. The
//! robots policy is fetched once per host per session and cached; when it
//! cannot be retrieved or parsed the gate fails open (permissive), trading
//! strict compliance for scrape availability. The rate limit is a hard
//! minimum interval, not adaptive backoff.

use lru::LruCache;
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};
use url::Url;

use crate::config::ScrapeConfig;
use crate::scraping::fetcher::PageFetcher;

/// Parsed robots.txt rules for one host
#[derive(Debug, Clone)]
pub struct RobotsPolicy {
    disallow_patterns: Vec<String>,
    allow_patterns: Vec<String>,
}

impl RobotsPolicy {
    /// Parse robots.txt content for our user agent. A group naming us
    /// replaces whatever the wildcard group contributed.
    pub fn parse(content: &str, user_agent: &str) -> Self {
        let ua_lower = user_agent.to_lowercase();
        let mut disallow = Vec::new();
        let mut allow = Vec::new();
        let mut in_relevant_group = false;
        let mut saw_own_group = false;

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some((directive, value)) = line.split_once(':') {
                let directive = directive.trim().to_lowercase();
                let value = value.trim();
                match directive.as_str() {
                    "user-agent" => {
                        let agent = value.to_lowercase();
                        if agent == "*" {
                            in_relevant_group = !saw_own_group;
                        } else if ua_lower.contains(&agent) || agent.contains(&ua_lower) {
                            in_relevant_group = true;
                            saw_own_group = true;
                            disallow.clear();
                            allow.clear();
                        } else {
                            in_relevant_group = false;
                        }
                    }
                    "disallow" if in_relevant_group => {
                        if !value.is_empty() {
                            disallow.push(value.to_string());
                        }
                    }
                    "allow" if in_relevant_group => {
                        if !value.is_empty() {
                            allow.push(value.to_string());
                        }
                    }
                    _ => {}
                }
            }
        }

        Self {
            disallow_patterns: disallow,
            allow_patterns: allow,
        }
    }

    /// Permissive policy used when robots.txt cannot be retrieved.
    pub fn allow_all() -> Self {
        Self {
            disallow_patterns: Vec::new(),
            allow_patterns: Vec::new(),
        }
    }

    /// Whether a path (with query, if any) is allowed. The longest
    /// matching pattern decides; a tie goes to allow.
    pub fn is_allowed(&self, path: &str) -> bool {
        let mut longest_allow = 0;
        for pattern in &self.allow_patterns {
            if Self::path_matches(path, pattern) {
                longest_allow = longest_allow.max(pattern.len());
            }
        }

        let mut longest_disallow = 0;
        for pattern in &self.disallow_patterns {
            if Self::path_matches(path, pattern) {
                longest_disallow = longest_disallow.max(pattern.len());
            }
        }

        longest_allow >= longest_disallow
    }

    /// Pattern match with `*` (any run) and a trailing `$` anchor; plain
    /// patterns are prefix matches.
    fn path_matches(path: &str, pattern: &str) -> bool {
        if pattern.is_empty() {
            return false;
        }

        let (pattern, must_end_match) = match pattern.strip_suffix('$') {
            Some(stripped) => (stripped, true),
            None => (pattern, false),
        };

        if pattern.contains('*') {
            let parts: Vec<&str> = pattern.split('*').collect();
            let mut pos = 0;

            for (i, part) in parts.iter().enumerate() {
                if part.is_empty() {
                    continue;
                }
                if let Some(found_pos) = path[pos..].find(part) {
                    if i == 0 && found_pos != 0 {
                        return false;
                    }
                    pos += found_pos + part.len();
                } else {
                    return false;
                }
            }

            if must_end_match {
                return pos == path.len();
            }
            return true;
        }

        if must_end_match {
            return path == pattern;
        }

        path.starts_with(pattern)
    }
}

/// Session politeness state: cached robots policies and per-host request
/// times. Robots fetches go through the same `PageFetcher` seam as page
/// fetches, so tests never touch the network.
pub struct PolitenessGate {
    robots_cache: LruCache<String, RobotsPolicy>,
    last_request: HashMap<String, Instant>,
    user_agent: String,
    per_request_delay: Duration,
    site_pause: Duration,
}

impl PolitenessGate {
    pub fn new(config: &ScrapeConfig) -> Self {
        let cache_size = NonZeroUsize::new(config.robots_cache_size.max(1))
            .expect("max(1) guarantees non-zero");
        Self {
            robots_cache: LruCache::new(cache_size),
            last_request: HashMap::new(),
            user_agent: config.user_agent.clone(),
            per_request_delay: config.per_request_delay(),
            site_pause: config.site_pause(),
        }
    }

    /// Check whether our user agent may fetch `url`, consulting the host's
    /// robots.txt. Unreachable or non-2xx robots resources fail open.
    pub async fn is_allowed(&mut self, fetcher: &dyn PageFetcher, url: &Url) -> bool {
        let host = match url.host_str() {
            Some(h) => h.to_string(),
            None => return true,
        };

        // Rules can be query-sensitive (e.g. "Disallow: /search?"), so the
        // query string is part of what gets matched.
        let target = match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        };

        if let Some(policy) = self.robots_cache.get(&host) {
            return policy.is_allowed(&target);
        }

        let policy = self.fetch_robots(fetcher, url, &host).await;
        let allowed = policy.is_allowed(&target);
        self.robots_cache.put(host, policy);
        allowed
    }

    async fn fetch_robots(
        &self,
        fetcher: &dyn PageFetcher,
        url: &Url,
        host: &str,
    ) -> RobotsPolicy {
        let robots_url = match Url::parse(&format!("{}://{}/robots.txt", url.scheme(), host)) {
            Ok(u) => u,
            Err(_) => return RobotsPolicy::allow_all(),
        };

        match fetcher.fetch(&robots_url).await {
            Ok(page) => RobotsPolicy::parse(&page.body, &self.user_agent),
            Err(err) => {
                tracing::debug!("robots.txt unavailable for {} ({}), failing open", host, err);
                RobotsPolicy::allow_all()
            }
        }
    }

    /// Block until at least the configured interval has passed since the
    /// last request to this URL's host, then record the request.
    pub async fn enforce_delay(&mut self, url: &Url) {
        let host = match url.host_str() {
            Some(h) => h.to_string(),
            None => return,
        };

        if let Some(last) = self.last_request.get(&host) {
            let elapsed = last.elapsed();
            if elapsed < self.per_request_delay {
                tokio::time::sleep(self.per_request_delay - elapsed).await;
            }
        }

        self.last_request.insert(host, Instant::now());
    }

    /// Fixed pause after finishing one site, before starting the next.
    pub async fn site_pause(&self) {
        tokio::time::sleep(self.site_pause).await;
    }

    /// User agent the gate checks robots rules against.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}
