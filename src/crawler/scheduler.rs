//! Breadth-first crawl scheduler
//!
//! This module handles:
//! - FIFO frontier management with duplicate suppression
//! - Domain and robots admission through the shared filter
//! - The politeness delay between page fetches
//! - Cap, cancellation and timeout termination

use crate::crawler::deadline::Deadline;
use crate::crawler::fetcher::fetch_url;
use crate::crawler::parser::extract_links;
use crate::state::ExtractionState;
use crate::telemetry::{Phase, ProgressReporter};
use crate::url::without_fragment;
use reqwest::Client;
use std::collections::{HashSet, VecDeque};
use url::Url;

/// Why a crawl stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlStop {
    /// Nothing left to visit
    Exhausted,
    /// The discovered-URL cap was reached
    CapReached,
    /// The deadline elapsed or the extraction was cancelled
    Interrupted,
}

/// Summary of one crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlOutcome {
    /// Pages accepted for fetching
    pub visited: usize,
    pub stop: CrawlStop,
}

/// Scheduler drives one breadth-first traversal
///
/// The bookkeeping is three plain structures: the FIFO `frontier`, the
/// `queued` set that suppresses duplicate enqueues, and the `visited` set
/// of pages already accepted. Requests are issued one at a time.
pub struct Scheduler<'a> {
    client: &'a Client,
    deadline: &'a Deadline,
    progress: Option<&'a dyn ProgressReporter>,
    frontier: VecDeque<Url>,
    queued: HashSet<String>,
    visited: HashSet<String>,
}

impl<'a> Scheduler<'a> {
    /// Creates a scheduler whose frontier holds only `start`
    pub fn new(client: &'a Client, deadline: &'a Deadline, start: Url) -> Self {
        let mut queued = HashSet::new();
        queued.insert(start.to_string());

        Self {
            client,
            deadline,
            progress: None,
            frontier: VecDeque::from([start]),
            queued,
            visited: HashSet::new(),
        }
    }

    /// Attaches a progress reporter
    pub fn with_progress(mut self, progress: Option<&'a dyn ProgressReporter>) -> Self {
        self.progress = progress;
        self
    }

    /// Number of URLs waiting in the frontier
    pub fn frontier_size(&self) -> usize {
        self.frontier.len()
    }

    /// Runs the traversal until the frontier empties, the cap is reached,
    /// or the deadline trips
    ///
    /// # Per-URL Flow
    ///
    /// 1. Stop if the cap is reached
    /// 2. Skip pages already visited
    /// 3. Skip pages the filter rejects (no delay, no fetch)
    /// 4. Record the page, then sleep for the effective crawl delay
    /// 5. Fetch; non-HTML and non-2xx pages contribute no links
    /// 6. Enqueue new admissible links
    pub async fn run(mut self, state: &mut ExtractionState) -> CrawlOutcome {
        let report_every = (state.max_urls() / 20).max(1);

        let stop = loop {
            if self.deadline.is_expired() {
                break CrawlStop::Interrupted;
            }

            if state.is_full() {
                tracing::info!("URL cap of {} reached, stopping crawl", state.max_urls());
                break CrawlStop::CapReached;
            }

            let url = match self.frontier.pop_front() {
                Some(url) => url,
                None => break CrawlStop::Exhausted,
            };
            let key = url.to_string();

            if self.visited.contains(&key) {
                continue;
            }

            if !state.filter().admits(&url) {
                tracing::trace!("Filtered out {}", key);
                continue;
            }

            self.visited.insert(key.clone());
            state.record_crawled(&key);

            if self.visited.len() % report_every == 0 {
                if let Some(progress) = self.progress {
                    progress.report(state.discovered_count(), Phase::Crawling);
                }
            }

            if !self.deadline.sleep(state.crawl_delay()).await {
                break CrawlStop::Interrupted;
            }

            tracing::debug!("Fetching {}", key);
            let page = match self.deadline.run(fetch_url(self.client, &key)).await {
                Some(Ok(page)) => page,
                Some(Err(e)) => {
                    tracing::debug!("Fetch failed: {}", e);
                    continue;
                }
                None => break CrawlStop::Interrupted,
            };

            if !page.is_success() {
                tracing::debug!("HTTP {} for {}", page.status_code, key);
                continue;
            }

            if !page.is_html() {
                tracing::trace!("Skipping non-HTML {} ({})", key, page.content_type);
                continue;
            }

            for link in extract_links(&page.text(), &page.final_url) {
                self.enqueue(without_fragment(link), state);
            }
        };

        tracing::info!(
            "Crawl stopped ({:?}): {} pages visited, {} still queued",
            stop,
            self.visited.len(),
            self.frontier_size()
        );

        CrawlOutcome {
            visited: self.visited.len(),
            stop,
        }
    }

    /// Adds a link to the frontier unless it was seen, is inadmissible, or
    /// the frontier already holds as many URLs as the cap allows
    fn enqueue(&mut self, link: Url, state: &ExtractionState) {
        if self.frontier.len() >= state.max_urls() {
            return;
        }

        let key = link.to_string();
        if self.visited.contains(&key) || self.queued.contains(&key) {
            return;
        }

        if !state.filter().admits(&link) {
            return;
        }

        self.queued.insert(key);
        self.frontier.push_back(link);
    }
}
