use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Which pipeline contributed a URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrlSource {
    /// Found in a sitemap document
    Sitemap,
    /// Found by the breadth-first crawl
    Crawl,
}

impl UrlSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sitemap => "sitemap",
            Self::Crawl => "crawl",
        }
    }
}

impl fmt::Display for UrlSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one extraction
///
/// `sources` reports how many URLs each pipeline contributed while it ran.
/// A page found by both pipelines counts once in `urls` but once for each
/// source, so the source counts may add up to more than `total_urls`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Canonical `scheme://host[:port]` after redirect resolution
    pub base_url: String,

    /// Discovered URLs, sorted
    pub urls: Vec<String>,

    /// Number of discovered URLs
    pub total_urls: usize,

    /// Whether robots.txt was fetched successfully
    pub robots_found: bool,

    /// Whether at least one sitemap document was fetched and parsed
    pub sitemap_found: bool,

    /// Per-pipeline contribution counts
    pub sources: BTreeMap<UrlSource, usize>,

    /// True when the deadline or a cancellation cut the extraction short
    pub partial: bool,

    /// Wall-clock duration of the extraction
    pub elapsed_ms: u64,

    /// When the extraction finished
    pub extracted_at: DateTime<Utc>,
}

impl ExtractionResult {
    /// Number of URLs contributed by `source`
    pub fn source_count(&self, source: UrlSource) -> usize {
        self.sources.get(&source).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_serializes_lowercase() {
        let mut sources = BTreeMap::new();
        sources.insert(UrlSource::Sitemap, 3);
        sources.insert(UrlSource::Crawl, 1);
        let json = serde_json::to_string(&sources).unwrap();
        assert_eq!(json, r#"{"sitemap":3,"crawl":1}"#);
    }

    #[test]
    fn test_source_count_defaults_to_zero() {
        let result = ExtractionResult {
            base_url: "https://example.com".to_string(),
            urls: vec![],
            total_urls: 0,
            robots_found: false,
            sitemap_found: false,
            sources: BTreeMap::new(),
            partial: false,
            elapsed_ms: 0,
            extracted_at: Utc::now(),
        };
        assert_eq!(result.source_count(UrlSource::Crawl), 0);
    }
}
