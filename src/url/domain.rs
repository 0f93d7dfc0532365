use url::Url;

/// Extracts the lowercase host from a URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use site_discovery::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Strips one leading `www.` label, case-insensitively
pub fn strip_www(host: &str) -> &str {
    match host.get(..4) {
        Some(prefix) if prefix.eq_ignore_ascii_case("www.") => &host[4..],
        _ => host,
    }
}

/// Compares two hosts ignoring case and one leading `www.` label
pub fn same_site(a: &str, b: &str) -> bool {
    strip_www(a).eq_ignore_ascii_case(strip_www(b))
}

/// Admission predicate shared by the sitemap and crawl phases
///
/// A URL is admitted when its host matches the canonical host (ignoring a
/// leading `www.`) and its path does not start with any disallowed prefix.
#[derive(Debug, Clone)]
pub struct DomainFilter {
    /// Canonical host with `www.` stripped, lowercase
    site: String,

    /// Disallowed path prefixes, in the order they were collected
    disallowed: Vec<String>,
}

impl DomainFilter {
    /// Creates a filter anchored on the canonical host
    pub fn new(canonical_host: &str) -> Self {
        Self {
            site: strip_www(canonical_host).to_lowercase(),
            disallowed: Vec::new(),
        }
    }

    /// Re-anchors the filter after the canonical host changed
    pub fn set_canonical_host(&mut self, canonical_host: &str) {
        self.site = strip_www(canonical_host).to_lowercase();
    }

    /// Adds a disallowed path prefix; empty and duplicate prefixes are ignored
    pub fn add_disallowed(&mut self, prefix: &str) {
        if prefix.is_empty() || self.disallowed.iter().any(|p| p == prefix) {
            return;
        }
        self.disallowed.push(prefix.to_string());
    }

    /// Returns the collected disallowed prefixes
    pub fn disallowed(&self) -> &[String] {
        &self.disallowed
    }

    /// Checks whether `host` belongs to the canonical site
    pub fn is_same_site(&self, host: &str) -> bool {
        strip_www(host).eq_ignore_ascii_case(&self.site)
    }

    /// Checks whether `path` escapes every disallowed prefix
    pub fn is_path_allowed(&self, path: &str) -> bool {
        !self.disallowed.iter().any(|prefix| path.starts_with(prefix))
    }

    /// Full admission check for a candidate URL
    pub fn admits(&self, url: &Url) -> bool {
        match url.host_str() {
            Some(host) => self.is_same_site(host) && self.is_path_allowed(url.path()),
            None => false,
        }
    }
}
