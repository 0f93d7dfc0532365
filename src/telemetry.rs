//! Telemetry and progress reporting
//!
//! The extractor never depends on a concrete logging or metrics backend.
//! Callers hand in an optional [`Telemetry`] sink and an optional
//! [`ProgressReporter`]; both default to doing nothing.

use crate::state::UrlSource;
use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Major phases of an extraction, as reported to progress callbacks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Resolving,
    Robots,
    Sitemap,
    Crawling,
    Complete,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Resolving => "resolving",
            Self::Robots => "robots",
            Self::Sitemap => "sitemap",
            Self::Crawling => "crawling",
            Self::Complete => "complete",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured events emitted at extraction milestones
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Milestone {
    RedirectResolved {
        seed: String,
        canonical: String,
        redirected: bool,
    },
    RobotsAnalyzed {
        found: bool,
        disallowed: usize,
        sitemaps: usize,
        crawl_delay_ms: u64,
    },
    SitemapsExtracted {
        processed: usize,
        urls: usize,
    },
    CrawlCompleted {
        visited: usize,
        urls: usize,
    },
}

/// Sink for extraction telemetry
///
/// Implementations may be shared by concurrent extractions and must
/// tolerate concurrent calls.
pub trait Telemetry: Send + Sync {
    /// Opens the span covering one extraction
    fn extraction_started(&self, _seed_url: &str, _max_urls: usize) {}

    /// Closes the span opened by `extraction_started`
    fn extraction_finished(&self, _elapsed: Duration) {}

    /// Counter of URLs extracted
    fn add_urls_extracted(&self, _count: u64) {}

    /// Counter of URLs per source
    fn add_urls_by_source(&self, _source: UrlSource, _count: u64) {}

    /// Structured log event at a milestone
    fn record_event(&self, _event: &Milestone) {}
}

/// Telemetry sink that discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTelemetry;

impl Telemetry for NoopTelemetry {}

/// Telemetry sink that re-emits everything as `tracing` events
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingTelemetry;

impl Telemetry for TracingTelemetry {
    fn extraction_started(&self, seed_url: &str, max_urls: usize) {
        tracing::info!(seed_url, max_urls, "extraction started");
    }

    fn extraction_finished(&self, elapsed: Duration) {
        tracing::info!(elapsed_ms = elapsed.as_millis() as u64, "extraction finished");
    }

    fn add_urls_extracted(&self, count: u64) {
        tracing::info!(counter = "urls_extracted", count);
    }

    fn add_urls_by_source(&self, source: UrlSource, count: u64) {
        tracing::info!(counter = "urls_by_source", source = source.as_str(), count);
    }

    fn record_event(&self, event: &Milestone) {
        match event {
            Milestone::RedirectResolved {
                seed,
                canonical,
                redirected,
            } => tracing::info!(%seed, %canonical, redirected, "redirect resolution"),
            Milestone::RobotsAnalyzed {
                found,
                disallowed,
                sitemaps,
                crawl_delay_ms,
            } => tracing::info!(found, disallowed, sitemaps, crawl_delay_ms, "robots analysis"),
            Milestone::SitemapsExtracted { processed, urls } => {
                tracing::info!(processed, urls, "sitemap extraction")
            }
            Milestone::CrawlCompleted { visited, urls } => {
                tracing::info!(visited, urls, "crawl completed")
            }
        }
    }
}

/// In-memory telemetry sink with atomic counters
///
/// Useful for summaries and tests; safe to share behind an `Arc` across
/// concurrent extractions.
#[derive(Debug, Default)]
pub struct CountingTelemetry {
    extractions_started: AtomicU64,
    extractions_finished: AtomicU64,
    urls_extracted: AtomicU64,
    sitemap_urls: AtomicU64,
    crawl_urls: AtomicU64,
    events: Mutex<Vec<Milestone>>,
}

impl CountingTelemetry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extractions_started(&self) -> u64 {
        self.extractions_started.load(Ordering::Relaxed)
    }

    pub fn extractions_finished(&self) -> u64 {
        self.extractions_finished.load(Ordering::Relaxed)
    }

    pub fn urls_extracted(&self) -> u64 {
        self.urls_extracted.load(Ordering::Relaxed)
    }

    pub fn urls_by_source(&self, source: UrlSource) -> u64 {
        match source {
            UrlSource::Sitemap => self.sitemap_urls.load(Ordering::Relaxed),
            UrlSource::Crawl => self.crawl_urls.load(Ordering::Relaxed),
        }
    }

    /// Snapshot of recorded milestone events, oldest first
    pub fn events(&self) -> Vec<Milestone> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl Telemetry for CountingTelemetry {
    fn extraction_started(&self, _seed_url: &str, _max_urls: usize) {
        self.extractions_started.fetch_add(1, Ordering::Relaxed);
    }

    fn extraction_finished(&self, _elapsed: Duration) {
        self.extractions_finished.fetch_add(1, Ordering::Relaxed);
    }

    fn add_urls_extracted(&self, count: u64) {
        self.urls_extracted.fetch_add(count, Ordering::Relaxed);
    }

    fn add_urls_by_source(&self, source: UrlSource, count: u64) {
        let counter = match source {
            UrlSource::Sitemap => &self.sitemap_urls,
            UrlSource::Crawl => &self.crawl_urls,
        };
        counter.fetch_add(count, Ordering::Relaxed);
    }

    fn record_event(&self, event: &Milestone) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(event.clone());
    }
}

/// Receives `(current URL count, phase)` updates during an extraction
pub trait ProgressReporter: Send + Sync {
    fn report(&self, count: usize, phase: Phase);
}

impl<F> ProgressReporter for F
where
    F: Fn(usize, Phase) + Send + Sync,
{
    fn report(&self, count: usize, phase: Phase) {
        self(count, phase)
    }
}
