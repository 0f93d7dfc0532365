//! HTML link extraction
//!
//! Parses one page with a tolerant HTML5 parser and returns candidate
//! links as absolute URLs.

use scraper::Html;
use url::Url;

/// Schemes that never lead to a crawlable page
const SKIPPED_SCHEMES: &[&str] = &["javascript:", "mailto:", "tel:", "data:"];

/// Extracts all candidate links from an HTML document
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `href` of `<a>`, `<link>` and `<area>` elements
///
/// **Exclude:**
/// - Empty and fragment-only (`#...`) hrefs
/// - `javascript:`, `mailto:`, `tel:` and `data:` links
/// - Anything that does not resolve to an HTTP(S) URL
///
/// The tree is walked in document order. A `<base href>` element changes
/// the resolution base for every link that follows it, but not for links
/// already seen. The result is unordered and may contain duplicates.
///
/// # Example
///
/// ```
/// use site_discovery::crawler::extract_links;
/// use url::Url;
///
/// let html = r#"<html><body><a href="/page">Link</a></body></html>"#;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// let links = extract_links(html, &base_url);
/// assert_eq!(links[0].as_str(), "https://example.com/page");
/// ```
pub fn extract_links(html: &str, page_url: &Url) -> Vec<Url> {
    let document = Html::parse_document(html);
    let mut base = page_url.clone();
    let mut links = Vec::new();

    for node in document.root_element().descendants() {
        let element = match node.value().as_element() {
            Some(element) => element,
            None => continue,
        };

        match element.name() {
            "base" => {
                if let Some(href) = element.attr("href") {
                    match base.join(href.trim()) {
                        Ok(new_base) => base = new_base,
                        Err(e) => tracing::trace!("Ignoring invalid <base href={:?}>: {}", href, e),
                    }
                }
            }
            "a" | "link" | "area" => {
                if let Some(url) = element.attr("href").and_then(|href| resolve_link(href, &base)) {
                    links.push(url);
                }
            }
            _ => {}
        }
    }

    links
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - empty or fragment-only hrefs
/// - javascript:, mailto:, tel:, data: schemes
/// - invalid URLs
/// - non-HTTP(S) URLs after resolution
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if SKIPPED_SCHEMES
        .iter()
        .any(|scheme| lowered.starts_with(scheme))
    {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) if matches!(absolute_url.scheme(), "http" | "https") => {
            Some(absolute_url)
        }
        _ => None,
    }
}
