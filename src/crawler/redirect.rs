//! Canonical redirect resolution
//!
//! Follows redirects from the seed to find the host the site actually
//! serves from. Never fatal: on any failure the seed is kept.

use crate::crawler::deadline::Deadline;
use crate::crawler::fetcher::classify_error;
use crate::url::origin_of;
use crate::FetchError;
use reqwest::Client;
use url::Url;

/// Outcome of redirect resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// URL whose scheme and host become canonical
    pub canonical: Url,
    /// Whether the canonical origin differs from the seed's
    pub redirected: bool,
}

impl Resolution {
    fn unchanged(seed: &Url) -> Self {
        Self {
            canonical: seed.clone(),
            redirected: false,
        }
    }

    fn adopted(seed: &Url, final_url: Url) -> Self {
        let redirected = origin_of(seed) != origin_of(&final_url);
        Self {
            canonical: final_url,
            redirected,
        }
    }
}

/// Resolves the canonical URL of a seed
///
/// # Resolution Flow
///
/// 1. HEAD the seed, following up to 10 redirects; adopt the final URL
/// 2. On transport failure, GET `{scheme}://{host}/robots.txt` on the
///    original host; adopt its final origin only if that request redirected
/// 3. Otherwise keep the seed unchanged
pub async fn resolve_canonical(client: &Client, seed: &Url, deadline: &Deadline) -> Resolution {
    let head = match deadline.run(client.head(seed.as_str()).send()).await {
        Some(result) => result,
        None => return Resolution::unchanged(seed),
    };

    match head {
        Ok(response) => {
            let final_url = response.url().clone();
            if origin_of(&final_url) != origin_of(seed) {
                tracing::info!("Seed {} redirects to {}", seed, final_url);
            }
            return Resolution::adopted(seed, final_url);
        }
        Err(e) => match classify_error(seed.as_str(), e) {
            err @ FetchError::TooManyRedirects { .. } => {
                tracing::warn!("Redirect resolution: {}", err);
            }
            err => {
                tracing::debug!("HEAD {} failed, trying robots.txt: {}", seed, err);
            }
        },
    }

    let probe = format!("{}/robots.txt", origin_of(seed));
    match deadline.run(client.get(&probe).send()).await {
        Some(Ok(response)) => {
            let final_url = response.url().clone();
            if origin_of(&final_url) != origin_of(seed) {
                tracing::info!("robots.txt probe redirected {} to {}", seed, final_url);
                let mut canonical = final_url;
                canonical.set_path("/");
                canonical.set_query(None);
                return Resolution::adopted(seed, canonical);
            }
            Resolution::unchanged(seed)
        }
        Some(Err(e)) => {
            tracing::warn!(
                "Redirect resolution failed for {}: {}",
                seed,
                classify_error(&probe, e)
            );
            Resolution::unchanged(seed)
        }
        None => Resolution::unchanged(seed),
    }
}
