//! Sitemap pipeline
//!
//! Drains the sitemap queue seeded by robots.txt (or `/sitemap.xml` when
//! robots named none), following index documents recursively and admitting
//! leaf locations through the shared domain and robots filter.

mod parser;

pub use parser::{parse_sitemap, SitemapDocument};

use crate::crawler::{fetch_url, Deadline, MAX_BODY_BYTES};
use crate::state::{ExtractionState, UrlSource};
use crate::url::{is_safe_discovered_target, without_fragment};
use crate::{FetchError, FetchResult};
use flate2::read::GzDecoder;
use reqwest::Client;
use std::io::Read;
use url::Url;

/// Leading bytes of every gzip stream
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Summary of one sitemap phase
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SitemapOutcome {
    /// Sitemap documents fetched
    pub processed: usize,
    /// Leaf URLs newly admitted
    pub admitted: usize,
    /// Whether the deadline stopped the phase early
    pub interrupted: bool,
}

/// Runs the sitemap pipeline against the extraction state
///
/// Documents are fetched one at a time. A document that fails to fetch or
/// parse contributes nothing; the pipeline moves on to the next one.
pub async fn extract_sitemaps(
    client: &Client,
    state: &mut ExtractionState,
    deadline: &Deadline,
) -> SitemapOutcome {
    let mut outcome = SitemapOutcome::default();

    if state.sitemap_queue.is_empty() {
        match state.base_url().join("sitemap.xml") {
            Ok(default) => state.sitemap_queue.push_back(default.to_string()),
            Err(e) => tracing::warn!("Cannot build default sitemap URL: {}", e),
        }
    }

    while !state.is_full() {
        if deadline.is_expired() {
            outcome.interrupted = true;
            break;
        }

        let sitemap_url = match state.sitemap_queue.pop_front() {
            Some(url) => url,
            None => break,
        };
        if !state.mark_sitemap_seen(&sitemap_url) {
            continue;
        }

        // Robots and index documents may name any host
        if state.guards_targets() {
            let safe = match Url::parse(&sitemap_url) {
                Ok(url) => {
                    is_safe_discovered_target(&url, state.canonical_host(), deadline.remaining())
                        .await
                }
                Err(_) => false,
            };
            if !safe {
                continue;
            }
        }

        let body = match deadline.run(fetch_sitemap_body(client, &sitemap_url)).await {
            Some(Ok(body)) => body,
            Some(Err(e)) => {
                tracing::warn!("Skipping sitemap: {}", e);
                continue;
            }
            None => {
                outcome.interrupted = true;
                break;
            }
        };
        outcome.processed += 1;

        let document = parse_sitemap(&body);
        tracing::debug!(
            "Sitemap {} lists {} locations",
            sitemap_url,
            document.locations().len()
        );

        match document {
            SitemapDocument::Index(nested) => {
                state.sitemap_found = true;
                for loc in nested {
                    match Url::parse(&loc) {
                        Ok(url) if matches!(url.scheme(), "http" | "https") => {
                            state.sitemap_queue.push_back(url.to_string());
                        }
                        _ => tracing::debug!("Ignoring nested sitemap {:?}", loc),
                    }
                }
            }
            SitemapDocument::UrlSet(locations) => {
                if !locations.is_empty() {
                    state.sitemap_found = true;
                }
                for loc in locations {
                    if state.is_full() {
                        break;
                    }
                    if let Ok(url) = Url::parse(&loc) {
                        if state.admit(&without_fragment(url), UrlSource::Sitemap) {
                            outcome.admitted += 1;
                        }
                    }
                }
            }
        }
    }

    tracing::info!(
        "Sitemap phase: {} documents, {} URLs admitted",
        outcome.processed,
        outcome.admitted
    );
    outcome
}

/// Fetches one sitemap and returns its text, inflating gzip bodies
///
/// Gzip is detected by a `.gz` path suffix or the gzip magic bytes. The
/// wire body is capped by the fetcher; the inflated stream is capped again
/// at [`MAX_BODY_BYTES`].
pub async fn fetch_sitemap_body(client: &Client, url: &str) -> FetchResult<String> {
    let page = fetch_url(client, url).await?;
    if !page.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: page.status_code,
        });
    }

    let gzipped = page.final_url.path().ends_with(".gz") || page.body.starts_with(&GZIP_MAGIC);
    if !gzipped {
        return Ok(page.text());
    }

    let inflated = gunzip_capped(&page.body, MAX_BODY_BYTES).map_err(|e| match e {
        GunzipError::TooLarge => FetchError::BodyTooLarge {
            url: url.to_string(),
            limit: MAX_BODY_BYTES,
        },
        GunzipError::Io(source) => FetchError::Decompress {
            url: url.to_string(),
            source,
        },
    })?;

    Ok(String::from_utf8_lossy(&inflated).into_owned())
}

enum GunzipError {
    TooLarge,
    Io(std::io::Error),
}

/// Inflates a gzip stream, reading at most `limit + 1` bytes of output
fn gunzip_capped(compressed: &[u8], limit: usize) -> Result<Vec<u8>, GunzipError> {
    // A `.gz` name over a plain body: pass the bytes through.
    if !compressed.starts_with(&GZIP_MAGIC) {
        return Ok(compressed.to_vec());
    }

    let mut inflated = Vec::new();
    GzDecoder::new(compressed)
        .take(limit as u64 + 1)
        .read_to_end(&mut inflated)
        .map_err(GunzipError::Io)?;

    if inflated.len() > limit {
        return Err(GunzipError::TooLarge);
    }
    Ok(inflated)
}
