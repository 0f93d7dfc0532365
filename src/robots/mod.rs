//! Robots.txt handling module
//!
//! This module fetches `/robots.txt` from the canonical host, parses the
//! directives that apply to the configured user agent, and folds them into
//! the extraction state: disallowed prefixes feed the admission filter,
//! sitemap lines seed the sitemap pipeline, and `Crawl-delay` raises the
//! politeness delay.

mod parser;

pub use parser::RobotsRules;

use crate::crawler::{fetch_url, Deadline};
use crate::state::ExtractionState;
use crate::url::same_site;
use reqwest::Client;
use url::Url;

/// Fetches and applies robots.txt for the canonical host
///
/// A non-200 response, a transport error, or an interrupted request all
/// mean "no robots.txt": nothing is restricted and `None` is returned.
pub async fn analyze_robots(
    client: &Client,
    state: &mut ExtractionState,
    user_agent: &str,
    deadline: &Deadline,
) -> Option<RobotsRules> {
    let robots_url = format!("{}/robots.txt", state.base_origin());
    tracing::debug!("Fetching {}", robots_url);

    let page = match deadline.run(fetch_url(client, &robots_url)).await? {
        Ok(page) if page.status_code == 200 => page,
        Ok(page) => {
            tracing::info!("No robots.txt at {} (HTTP {})", robots_url, page.status_code);
            return None;
        }
        Err(e) => {
            tracing::warn!("Failed to fetch robots.txt: {}", e);
            return None;
        }
    };

    let rules = RobotsRules::parse(&page.text(), user_agent);
    apply_rules(&rules, state);
    state.robots_found = true;

    Some(rules)
}

/// Folds parsed rules into the extraction state
pub fn apply_rules(rules: &RobotsRules, state: &mut ExtractionState) {
    for prefix in &rules.disallowed {
        state.filter_mut().add_disallowed(prefix);
    }

    for sitemap in &rules.sitemaps {
        match align_sitemap_url(sitemap, state.base_url()) {
            Some(url) => {
                let url = url.to_string();
                if !state.sitemap_queue.contains(&url) {
                    state.sitemap_queue.push_back(url);
                }
            }
            None => tracing::debug!("Ignoring invalid Sitemap entry {:?}", sitemap),
        }
    }

    if let Some(delay) = rules.crawl_delay() {
        state.raise_crawl_delay(delay);
    }
}

/// Resolves a `Sitemap:` value and aligns a `www.`-only host difference
///
/// If the sitemap host differs from the canonical host only by a leading
/// `www.` label, the canonical host is substituted so later requests hit
/// the host the site actually serves from.
pub fn align_sitemap_url(raw: &str, base: &Url) -> Option<Url> {
    let mut url = base.join(raw.trim()).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }

    let canonical_host = base.host_str()?;
    let host = url.host_str()?.to_string();
    if !host.eq_ignore_ascii_case(canonical_host) && same_site(&host, canonical_host) {
        url.set_host(Some(canonical_host)).ok()?;
    }

    Some(url)
}
