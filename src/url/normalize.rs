use crate::UrlError;
use url::Url;

/// Normalizes a raw seed string into an absolute HTTP(S) URL
///
/// # Normalization Steps
///
/// 1. Trim surrounding whitespace; reject if nothing is left
/// 2. Prepend `https://` when the string carries no scheme separator
/// 3. Parse the URL; reject if malformed
/// 4. Reject schemes other than `http` and `https`
/// 5. Reject URLs without a host
///
/// # Arguments
///
/// * `raw` - The seed as typed by the caller
///
/// # Returns
///
/// * `Ok(Url)` - Parsed absolute URL
/// * `Err(UrlError)` - The seed cannot be used
///
/// # Examples
///
/// ```
/// use site_discovery::url::normalize_seed;
///
/// let url = normalize_seed("  example.com/shop ").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/shop");
/// ```
pub fn normalize_seed(raw: &str) -> Result<Url, UrlError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    let url = Url::parse(&candidate).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(UrlError::MissingDomain),
    }
}

/// Returns `scheme://host[:port]` for a URL, without a trailing slash
pub fn origin_of(url: &Url) -> String {
    url[..url::Position::BeforePath].to_string()
}

/// Drops the fragment so `/a#x` and `/a` are the same discovered page
pub fn without_fragment(mut url: Url) -> Url {
    url.set_fragment(None);
    url
}
