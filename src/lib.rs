//! Site-Discovery: a polite same-domain URL discovery engine
//!
//! Given one seed address, this crate produces the deduplicated set of
//! same-domain URLs reachable from that site. Sitemaps are preferred;
//! a rate-limited breadth-first crawl is the fallback. Robots exclusion
//! rules are honored and targets in private network space are refused.

pub mod categorize;
pub mod config;
pub mod crawler;
pub mod output;
pub mod robots;
pub mod sitemap;
pub mod state;
pub mod telemetry;
pub mod url;

use thiserror::Error;

/// Main error type for Site-Discovery operations
///
/// Only the fatal categories surface from [`crawler::Extractor::extract`]:
/// every network or parse failure after the seed has been accepted
/// degrades the extraction instead of failing it.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unsafe target {host}: {reason}")]
    UnsafeTarget { host: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Output error: {0}")]
    Output(String),
}

impl From<UrlError> for DiscoveryError {
    fn from(err: UrlError) -> Self {
        DiscoveryError::InvalidInput(err.to_string())
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("URL is empty")]
    Empty,

    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingDomain,
}

/// Per-request failures
///
/// These never abort an extraction; they are logged and the component
/// that hit them degrades.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Too many redirects from {url}")]
    TooManyRedirects { url: String },

    #[error("Unexpected status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Body of {url} exceeds {limit} bytes")]
    BodyTooLarge { url: String, limit: usize },

    #[error("Failed to decompress {url}: {source}")]
    Decompress { url: String, source: std::io::Error },
}

/// Result type alias for Site-Discovery operations
pub type Result<T> = std::result::Result<T, DiscoveryError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

/// Result type alias for single network fetches
pub type FetchResult<T> = std::result::Result<T, FetchError>;

// Re-export commonly used types
pub use categorize::{categorize_urls, PageCategory};
pub use config::{Config, ExtractionRequest};
pub use crawler::{extract_urls, Extractor};
pub use state::{ExtractionResult, UrlSource};
pub use telemetry::{Phase, ProgressReporter, Telemetry};
pub use url::normalize_seed;
