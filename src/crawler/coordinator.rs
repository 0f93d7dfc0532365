//! Extraction coordinator - main orchestration logic
//!
//! This module runs one extraction end to end:
//! - Validating the request and normalizing the seed
//! - Refusing private network targets
//! - Resolving the canonical host
//! - Applying robots.txt, draining sitemaps, and crawling as a fallback
//! - Aggregating the result and reporting telemetry

use crate::config::{validate_request, ExtractionRequest};
use crate::crawler::deadline::Deadline;
use crate::crawler::fetcher::build_http_client;
use crate::crawler::redirect::{resolve_canonical, Resolution};
use crate::crawler::scheduler::Scheduler;
use crate::robots::analyze_robots;
use crate::sitemap::extract_sitemaps;
use crate::state::{ExtractionResult, ExtractionState, UrlSource};
use crate::telemetry::{Milestone, NoopTelemetry, Phase, ProgressReporter, Telemetry};
use crate::url::{check_target_within, is_safe_discovered_target, normalize_seed};
use crate::{DiscoveryError, Result};
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;
use url::Url;

/// Runs extractions against a telemetry sink and progress reporter
///
/// An `Extractor` holds no per-extraction state and may be shared by
/// concurrent extractions; only its collaborators are shared.
#[derive(Clone)]
pub struct Extractor {
    telemetry: Arc<dyn Telemetry>,
    progress: Option<Arc<dyn ProgressReporter>>,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor {
    /// Creates an extractor with no telemetry and no progress reporting
    pub fn new() -> Self {
        Self {
            telemetry: Arc::new(NoopTelemetry),
            progress: None,
        }
    }

    pub fn with_telemetry(mut self, telemetry: Arc<dyn Telemetry>) -> Self {
        self.telemetry = telemetry;
        self
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressReporter>) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Runs one extraction with no external cancellation
    ///
    /// See [`Extractor::extract_with_cancel`].
    pub async fn extract(&self, request: &ExtractionRequest) -> Result<ExtractionResult> {
        self.extract_with_cancel(request, CancellationToken::new())
            .await
    }

    /// Runs one extraction, stopping early if `cancel` fires
    ///
    /// # Returns
    ///
    /// * `Ok(ExtractionResult)` - Completed or partial result
    /// * `Err(DiscoveryError::InvalidInput)` - Bad seed or out-of-range request field
    /// * `Err(DiscoveryError::UnsafeTarget)` - Seed resolves into private network space
    /// * `Err(DiscoveryError::HttpClient)` - The HTTP client could not be built
    ///
    /// Cancellation and timeout after the seed has been accepted are not
    /// errors; the result is returned with `partial` set.
    pub async fn extract_with_cancel(
        &self,
        request: &ExtractionRequest,
        cancel: CancellationToken,
    ) -> Result<ExtractionResult> {
        let span = tracing::info_span!(
            "extract_urls",
            seed_url = %request.seed,
            max_urls = request.max_urls
        );
        self.run(request, cancel).instrument(span).await
    }

    async fn run(
        &self,
        request: &ExtractionRequest,
        cancel: CancellationToken,
    ) -> Result<ExtractionResult> {
        validate_request(request).map_err(|e| DiscoveryError::InvalidInput(e.to_string()))?;
        let seed = normalize_seed(&request.seed)?;

        // The timeout covers the guard's DNS lookup too
        let started = Instant::now();
        let deadline = Deadline::new(request.timeout, cancel);

        if request.skip_ssrf_check {
            tracing::warn!("Private network check disabled for {}", seed);
        } else {
            check_target_within(&seed, deadline.remaining()).await?;
        }

        let client = build_http_client(&request.user_agent)?;

        self.telemetry
            .extraction_started(seed.as_str(), request.max_urls);
        tracing::info!("Starting extraction of {}", seed);

        let mut state = ExtractionState::new(&seed, request.max_urls, request.delay_ms);
        state.set_target_guard(!request.skip_ssrf_check);

        // Canonical host
        self.report(&state, Phase::Resolving);
        let resolution = resolve_canonical(&client, &seed, &deadline).await;
        let resolution = vet_redirect(resolution, &seed, &state, &deadline).await;
        state.set_base_url(&resolution.canonical);
        self.telemetry.record_event(&Milestone::RedirectResolved {
            seed: seed.to_string(),
            canonical: state.base_origin(),
            redirected: resolution.redirected,
        });

        // Robots
        self.report(&state, Phase::Robots);
        let rules = analyze_robots(&client, &mut state, &request.user_agent, &deadline).await;
        self.telemetry.record_event(&Milestone::RobotsAnalyzed {
            found: state.robots_found,
            disallowed: state.filter().disallowed().len(),
            sitemaps: rules.as_ref().map_or(0, |r| r.sitemaps.len()),
            crawl_delay_ms: state.crawl_delay().as_millis() as u64,
        });

        // Sitemaps
        self.report(&state, Phase::Sitemap);
        let sitemaps = extract_sitemaps(&client, &mut state, &deadline).await;
        self.telemetry.record_event(&Milestone::SitemapsExtracted {
            processed: sitemaps.processed,
            urls: state.source_count(UrlSource::Sitemap),
        });

        // Crawl fallback
        let needs_crawl = request.force_crawl
            || (state.source_count(UrlSource::Sitemap) == 0 && state.discovered_count() == 0);
        if needs_crawl && !deadline.is_expired() {
            self.report(&state, Phase::Crawling);
            let start = state.base_url().clone();
            let outcome = Scheduler::new(&client, &deadline, start)
                .with_progress(self.progress.as_deref())
                .run(&mut state)
                .await;
            self.telemetry.record_event(&Milestone::CrawlCompleted {
                visited: outcome.visited,
                urls: state.discovered_count(),
            });
        } else if needs_crawl {
            tracing::info!("Deadline reached before crawling");
        } else {
            tracing::debug!("Sitemaps supplied URLs, skipping crawl");
        }

        let partial = deadline.is_expired();
        let elapsed = started.elapsed();
        let result = state.aggregate(partial, elapsed);

        self.telemetry.add_urls_extracted(result.total_urls as u64);
        for (source, count) in &result.sources {
            self.telemetry.add_urls_by_source(*source, *count as u64);
        }
        self.telemetry.extraction_finished(elapsed);
        if let Some(progress) = &self.progress {
            progress.report(result.total_urls, Phase::Complete);
        }

        tracing::info!(
            "Extraction of {} finished: {} URLs ({} from sitemaps, {} from crawl){}",
            result.base_url,
            result.total_urls,
            result.source_count(UrlSource::Sitemap),
            result.source_count(UrlSource::Crawl),
            if partial { ", partial" } else { "" }
        );

        Ok(result)
    }

    fn report(&self, state: &ExtractionState, phase: Phase) {
        if let Some(progress) = &self.progress {
            progress.report(state.discovered_count(), phase);
        }
    }
}

/// Falls back to the seed when it redirected to a private address
async fn vet_redirect(
    resolution: Resolution,
    seed: &Url,
    state: &ExtractionState,
    deadline: &Deadline,
) -> Resolution {
    if !resolution.redirected || !state.guards_targets() {
        return resolution;
    }

    let trusted = seed.host_str().unwrap_or_default();
    if is_safe_discovered_target(&resolution.canonical, trusted, deadline.remaining()).await {
        resolution
    } else {
        Resolution {
            canonical: seed.clone(),
            redirected: false,
        }
    }
}

/// Runs one extraction with default collaborators
///
/// # Example
///
/// ```no_run
/// use site_discovery::{extract_urls, ExtractionRequest};
///
/// # async fn demo() -> site_discovery::Result<()> {
/// let result = extract_urls(&ExtractionRequest::new("example.com")).await?;
/// println!("{} URLs", result.total_urls);
/// # Ok(())
/// # }
/// ```
pub async fn extract_urls(request: &ExtractionRequest) -> Result<ExtractionResult> {
    Extractor::new().extract(request).await
}
