use crate::output::OutputFormat;
use serde::Deserialize;
use std::time::Duration;

/// Default cap on discovered URLs
pub const DEFAULT_MAX_URLS: usize = 1000;

/// Default overall extraction timeout (seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Default politeness delay between crawl requests (milliseconds)
pub const DEFAULT_DELAY_MS: u64 = 100;

/// User agent sent when none is configured
pub const DEFAULT_USER_AGENT: &str = "SiteDiscovery/1.0 (+https://github.com/site-discovery)";

/// Main configuration file structure for Site-Discovery
///
/// Every section and key is optional; missing values fall back to the
/// request defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub extraction: ExtractionSettings,
    #[serde(default)]
    pub output: OutputSettings,
}

/// Extraction behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExtractionSettings {
    /// Maximum number of URLs to discover
    #[serde(rename = "max-urls")]
    pub max_urls: usize,

    /// Overall extraction timeout (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// User agent sent with every request and matched against robots.txt groups
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Minimum time between crawl requests (milliseconds)
    #[serde(rename = "delay-ms")]
    pub delay_ms: u64,

    /// Crawl even when sitemaps produced URLs
    #[serde(rename = "force-crawl")]
    pub force_crawl: bool,
}

impl Default for ExtractionSettings {
    fn default() -> Self {
        Self {
            max_urls: DEFAULT_MAX_URLS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            delay_ms: DEFAULT_DELAY_MS,
            force_crawl: false,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Report format
    pub format: OutputFormat,

    /// Whether to classify discovered URLs into page categories
    pub categorize: bool,
}

/// A single URL extraction request
///
/// Created per call and consumed by [`crate::crawler::Extractor`]. Bounds
/// are checked by [`crate::config::validate_request`] before any network
/// activity.
#[derive(Debug, Clone)]
pub struct ExtractionRequest {
    /// The seed address, with or without a scheme
    pub seed: String,

    /// Maximum number of URLs to discover (1..=10000)
    pub max_urls: usize,

    /// Overall extraction deadline (1..=600 seconds)
    pub timeout: Duration,

    /// User agent string
    pub user_agent: String,

    /// Delay between crawl requests in milliseconds (0..=5000)
    pub delay_ms: u64,

    /// Run the crawl phase even when sitemaps produced URLs
    pub force_crawl: bool,

    /// Skip the private-network guard. Only for controlled test environments.
    pub skip_ssrf_check: bool,
}

impl ExtractionRequest {
    /// Creates a request for `seed` with default limits
    pub fn new(seed: impl Into<String>) -> Self {
        Self::from_settings(seed, &ExtractionSettings::default())
    }

    /// Creates a request for `seed` using limits from a config file section
    pub fn from_settings(seed: impl Into<String>, settings: &ExtractionSettings) -> Self {
        Self {
            seed: seed.into(),
            max_urls: settings.max_urls,
            timeout: Duration::from_secs(settings.timeout_secs),
            user_agent: settings.user_agent.clone(),
            delay_ms: settings.delay_ms,
            force_crawl: settings.force_crawl,
            skip_ssrf_check: false,
        }
    }

    pub fn with_max_urls(mut self, max_urls: usize) -> Self {
        self.max_urls = max_urls;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_delay_ms(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    pub fn with_force_crawl(mut self, force_crawl: bool) -> Self {
        self.force_crawl = force_crawl;
        self
    }

    /// Disables the private-network guard so loopback mock servers can be used
    pub fn with_ssrf_check_skipped(mut self) -> Self {
        self.skip_ssrf_check = true;
        self
    }
}
