//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests of an extraction, including:
//! - Building the HTTP client with the configured user agent
//! - Redirect following with a hop limit
//! - Reading bodies under a hard byte cap
//! - Error classification

use crate::{FetchError, FetchResult};
use reqwest::{redirect::Policy, Client, Response};
use std::time::Duration;
use url::Url;

/// Hard cap on any response body, applied to wire bytes before decompression
pub const MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

/// Maximum redirect hops followed per request
pub const MAX_REDIRECTS: usize = 10;

/// A fetched response with its body read under the cap
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub final_url: Url,
    /// HTTP status code
    pub status_code: u16,
    /// Content-Type header value (empty when absent)
    pub content_type: String,
    /// Raw body bytes
    pub body: Vec<u8>,
}

impl FetchedPage {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// Whether the Content-Type denotes an HTML document
    pub fn is_html(&self) -> bool {
        let content_type = self.content_type.to_ascii_lowercase();
        content_type.contains("text/html") || content_type.contains("application/xhtml+xml")
    }

    /// Body decoded as UTF-8, replacing invalid sequences
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Builds an HTTP client with proper configuration
///
/// The client follows at most [`MAX_REDIRECTS`] redirects and does not
/// decompress transparently, so the byte cap always sees wire bytes.
///
/// # Example
///
/// ```no_run
/// use site_discovery::crawler::build_http_client;
///
/// let client = build_http_client("MyBot/1.0").unwrap();
/// ```
pub fn build_http_client(user_agent: &str) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .build()
}

/// Sends a GET request and reads the body under [`MAX_BODY_BYTES`]
///
/// Non-2xx responses are returned as pages; callers decide what a status
/// means for them.
pub async fn fetch_url(client: &Client, url: &str) -> FetchResult<FetchedPage> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| classify_error(url, e))?;

    let final_url = response.url().clone();
    let status_code = response.status().as_u16();
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    let body = read_capped(response, MAX_BODY_BYTES, url).await?;

    Ok(FetchedPage {
        final_url,
        status_code,
        content_type,
        body,
    })
}

/// Reads a response body, failing as soon as it exceeds `limit` bytes
///
/// A declared Content-Length above the limit is rejected without reading.
pub async fn read_capped(mut response: Response, limit: usize, url: &str) -> FetchResult<Vec<u8>> {
    if let Some(declared) = response.content_length() {
        if declared > limit as u64 {
            return Err(FetchError::BodyTooLarge {
                url: url.to_string(),
                limit,
            });
        }
    }

    let mut body = Vec::new();
    while let Some(chunk) = response.chunk().await.map_err(|e| classify_error(url, e))? {
        if body.len() + chunk.len() > limit {
            return Err(FetchError::BodyTooLarge {
                url: url.to_string(),
                limit,
            });
        }
        body.extend_from_slice(&chunk);
    }

    Ok(body)
}

/// Maps a transport error onto the fetch error taxonomy
pub fn classify_error(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else if error.is_redirect() {
        FetchError::TooManyRedirects {
            url: url.to_string(),
        }
    } else {
        FetchError::Http {
            url: url.to_string(),
            source: error,
        }
    }
}
