use crate::state::result::{ExtractionResult, UrlSource};
use crate::url::{extract_domain, origin_of, DomainFilter};
use chrono::Utc;
use std::collections::{BTreeMap, HashSet, VecDeque};
use std::time::Duration;
use url::Url;

/// Request-scoped state of one extraction
///
/// Created at the start of [`crate::crawler::Extractor::extract`] and
/// consumed by [`ExtractionState::aggregate`]. Nothing in here is shared
/// between extractions.
///
/// Invariants: a URL is inserted into the discovered set at most once, and
/// the discovered set never grows beyond `max_urls`.
#[derive(Debug)]
pub struct ExtractionState {
    /// Canonical base URL (`scheme://host[:port]/`)
    base_url: Url,

    /// Domain and robots admission filter
    filter: DomainFilter,

    /// Every URL admitted so far
    discovered: HashSet<String>,

    /// Cap on `discovered`
    max_urls: usize,

    /// Sitemap documents waiting to be fetched
    pub sitemap_queue: VecDeque<String>,

    /// Sitemap documents already fetched
    sitemaps_seen: HashSet<String>,

    /// Effective delay between crawl requests
    crawl_delay: Duration,

    /// Whether robots.txt was fetched successfully
    pub robots_found: bool,

    /// Whether at least one sitemap document yielded entries
    pub sitemap_found: bool,

    /// Live contribution counts per pipeline
    source_counts: BTreeMap<UrlSource, usize>,

    /// Whether URLs on other hosts are vetted for private addresses
    guard_targets: bool,
}

impl ExtractionState {
    /// Creates the state for an extraction rooted at `base_url`
    pub fn new(base_url: &Url, max_urls: usize, delay_ms: u64) -> Self {
        let root = root_of(base_url);
        let host = extract_domain(&root).unwrap_or_default();

        Self {
            base_url: root,
            filter: DomainFilter::new(&host),
            discovered: HashSet::new(),
            max_urls,
            sitemap_queue: VecDeque::new(),
            sitemaps_seen: HashSet::new(),
            crawl_delay: Duration::from_millis(delay_ms),
            robots_found: false,
            sitemap_found: false,
            source_counts: BTreeMap::new(),
            guard_targets: true,
        }
    }

    /// Replaces the canonical base after redirect resolution
    pub fn set_base_url(&mut self, url: &Url) {
        self.base_url = root_of(url);
        let host = extract_domain(&self.base_url).unwrap_or_default();
        self.filter.set_canonical_host(&host);
    }

    /// Canonical base URL with a `/` path
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Canonical `scheme://host[:port]`
    pub fn base_origin(&self) -> String {
        origin_of(&self.base_url)
    }

    /// Canonical host, lowercase
    pub fn canonical_host(&self) -> &str {
        self.base_url.host_str().unwrap_or_default()
    }

    /// Enables or disables the private-address check on foreign hosts
    pub fn set_target_guard(&mut self, enabled: bool) {
        self.guard_targets = enabled;
    }

    pub fn guards_targets(&self) -> bool {
        self.guard_targets
    }

    pub fn filter(&self) -> &DomainFilter {
        &self.filter
    }

    pub fn filter_mut(&mut self) -> &mut DomainFilter {
        &mut self.filter
    }

    pub fn max_urls(&self) -> usize {
        self.max_urls
    }

    pub fn discovered_count(&self) -> usize {
        self.discovered.len()
    }

    pub fn is_full(&self) -> bool {
        self.discovered.len() >= self.max_urls
    }

    pub fn is_discovered(&self, url: &str) -> bool {
        self.discovered.contains(url)
    }

    /// Admits a URL if it passes the filter and the cap allows it
    ///
    /// Returns true only when the URL was newly inserted; the source's
    /// contribution count is bumped in that case.
    pub fn admit(&mut self, url: &Url, source: UrlSource) -> bool {
        if self.is_full() || !self.filter.admits(url) {
            return false;
        }
        if !self.discovered.insert(url.to_string()) {
            return false;
        }
        *self.source_counts.entry(source).or_insert(0) += 1;
        true
    }

    /// Records a page the crawler has accepted for fetching
    ///
    /// The crawl count grows for every visited page, even one the sitemap
    /// phase already contributed; the discovered set only grows if the URL
    /// is new and the cap allows it.
    pub fn record_crawled(&mut self, url: &str) {
        if !self.is_discovered(url) && !self.is_full() {
            self.discovered.insert(url.to_string());
        }
        *self.source_counts.entry(UrlSource::Crawl).or_insert(0) += 1;
    }

    /// Contribution count so far for `source`
    pub fn source_count(&self, source: UrlSource) -> usize {
        self.source_counts.get(&source).copied().unwrap_or(0)
    }

    /// Marks a sitemap as processed; false if it was already seen
    pub fn mark_sitemap_seen(&mut self, sitemap_url: &str) -> bool {
        self.sitemaps_seen.insert(sitemap_url.to_string())
    }

    pub fn crawl_delay(&self) -> Duration {
        self.crawl_delay
    }

    /// Raises the crawl delay to at least `floor`; never lowers it
    pub fn raise_crawl_delay(&mut self, floor: Duration) {
        if floor > self.crawl_delay {
            self.crawl_delay = floor;
        }
    }

    /// Turns the accumulated state into the final result
    pub fn aggregate(self, partial: bool, elapsed: Duration) -> ExtractionResult {
        let base_url = self.base_origin();
        let mut urls: Vec<String> = self.discovered.into_iter().collect();
        urls.sort();

        let mut sources = BTreeMap::new();
        sources.insert(
            UrlSource::Sitemap,
            self.source_counts.get(&UrlSource::Sitemap).copied().unwrap_or(0),
        );
        sources.insert(
            UrlSource::Crawl,
            self.source_counts.get(&UrlSource::Crawl).copied().unwrap_or(0),
        );

        ExtractionResult {
            base_url,
            total_urls: urls.len(),
            urls,
            robots_found: self.robots_found,
            sitemap_found: self.sitemap_found,
            sources,
            partial,
            elapsed_ms: elapsed.as_millis() as u64,
            extracted_at: Utc::now(),
        }
    }
}

/// Strips path, query and fragment, keeping `scheme://host[:port]/`
fn root_of(url: &Url) -> Url {
    let mut root = url.clone();
    root.set_path("/");
    root.set_query(None);
    root.set_fragment(None);
    root
}
