//! Sitemap XML parsing
//!
//! A fetched sitemap is read twice at most: first as a `sitemapindex`, and
//! only if that yields nothing, as a flat `urlset`.

use quick_xml::events::Event;
use quick_xml::Reader;

/// One fetched sitemap document, interpreted under exactly one schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SitemapDocument {
    /// Locations of nested sitemap documents
    Index(Vec<String>),
    /// Locations of leaf pages
    UrlSet(Vec<String>),
}

impl SitemapDocument {
    pub fn locations(&self) -> &[String] {
        match self {
            SitemapDocument::Index(locs) | SitemapDocument::UrlSet(locs) => locs,
        }
    }
}

/// Parses a sitemap document
///
/// Returns [`SitemapDocument::Index`] when the document has at least one
/// `<sitemap><loc>` entry; otherwise the `<url><loc>` entries as a
/// [`SitemapDocument::UrlSet`]. Malformed XML yields an empty url set.
///
/// # Example
///
/// ```
/// use site_discovery::sitemap::{parse_sitemap, SitemapDocument};
///
/// let xml = r#"<urlset><url><loc>https://example.com/a</loc></url></urlset>"#;
/// assert_eq!(
///     parse_sitemap(xml),
///     SitemapDocument::UrlSet(vec!["https://example.com/a".to_string()])
/// );
/// ```
pub fn parse_sitemap(xml: &str) -> SitemapDocument {
    let xml = xml.trim_start_matches('\u{feff}');

    match collect_locations(xml, b"sitemap") {
        Some(nested) if !nested.is_empty() => SitemapDocument::Index(nested),
        _ => SitemapDocument::UrlSet(collect_locations(xml, b"url").unwrap_or_default()),
    }
}

/// Collects the text of every `<loc>` directly inside a `container` element
///
/// Namespace prefixes are ignored. Returns None on any XML syntax error.
fn collect_locations(xml: &str, container: &[u8]) -> Option<Vec<String>> {
    let mut locations = Vec::new();
    let mut in_container = false;
    let mut in_loc = false;
    let mut current = String::new();

    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let name = e.local_name();
                if name.as_ref() == container {
                    in_container = true;
                } else if in_container && name.as_ref() == b"loc" {
                    in_loc = true;
                    current.clear();
                }
            }
            Ok(Event::Text(ref e)) if in_loc => match e.unescape() {
                Ok(text) => current.push_str(&text),
                Err(_) => return None,
            },
            Ok(Event::CData(e)) if in_loc => {
                current.push_str(&String::from_utf8_lossy(&e.into_inner()));
            }
            Ok(Event::End(ref e)) => {
                let name = e.local_name();
                if name.as_ref() == b"loc" && in_loc {
                    let loc = current.trim();
                    if !loc.is_empty() {
                        locations.push(loc.to_string());
                    }
                    in_loc = false;
                } else if name.as_ref() == container {
                    in_container = false;
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                tracing::debug!("Malformed sitemap XML at {}: {}", reader.buffer_position(), e);
                return None;
            }
            _ => {}
        }
        buf.clear();
    }

    Some(locations)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_urlset() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url><loc>https://example.com/</loc><lastmod>2024-01-01</lastmod></url>
  <url><loc>
      https://example.com/about
  </loc></url>
</urlset>"#;
        assert_eq!(
            parse_sitemap(xml),
            SitemapDocument::UrlSet(vec![
                "https://example.com/".to_string(),
                "https://example.com/about".to_string(),
            ])
        );
    }

    #[test]
    fn test_parse_index() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <sitemap><loc>https://example.com/sitemap-1.xml</loc></sitemap>
  <sitemap><loc>https://example.com/sitemap-2.xml.gz</loc></sitemap>
</sitemapindex>"#;
        assert_eq!(
            parse_sitemap(xml),
            SitemapDocument::Index(vec![
                "https://example.com/sitemap-1.xml".to_string(),
                "https://example.com/sitemap-2.xml.gz".to_string(),
            ])
        );
    }

    #[test]
    fn test_empty_index_falls_back_to_urlset() {
        let xml = r#"<sitemapindex></sitemapindex>"#;
        assert_eq!(parse_sitemap(xml), SitemapDocument::UrlSet(vec![]));
    }

    #[test]
    fn test_prefixed_namespace_and_entities() {
        let xml = r#"<sm:urlset xmlns:sm="http://www.sitemaps.org/schemas/sitemap/0.9">
  <sm:url><sm:loc>https://example.com/search?a=1&amp;b=2</sm:loc></sm:url>
</sm:urlset>"#;
        assert_eq!(
            parse_sitemap(xml).locations(),
            &["https://example.com/search?a=1&b=2".to_string()]
        );
    }

    #[test]
    fn test_cdata_location() {
        let xml = r#"<urlset><url><loc><![CDATA[https://example.com/cdata]]></loc></url></urlset>"#;
        assert_eq!(
            parse_sitemap(xml).locations(),
            &["https://example.com/cdata".to_string()]
        );
    }

    #[test]
    fn test_loc_outside_entries_ignored() {
        let xml = r#"<urlset><loc>https://example.com/stray</loc><url><loc>https://example.com/ok</loc></url></urlset>"#;
        assert_eq!(
            parse_sitemap(xml).locations(),
            &["https://example.com/ok".to_string()]
        );
    }

    #[test]
    fn test_empty_locations_skipped() {
        let xml = r#"<urlset><url><loc>  </loc></url><url><loc></loc></url></urlset>"#;
        assert!(parse_sitemap(xml).locations().is_empty());
    }

    #[test]
    fn test_byte_order_mark() {
        let xml = "\u{feff}<urlset><url><loc>https://example.com/bom</loc></url></urlset>";
        assert_eq!(parse_sitemap(xml).locations().len(), 1);
    }

    #[test]
    fn test_malformed_xml_yields_nothing() {
        let xml = r#"<urlset><url><loc>https://example.com/a</loc></url></wrong>"#;
        assert_eq!(parse_sitemap(xml), SitemapDocument::UrlSet(vec![]));
    }

    #[test]
    fn test_html_page_yields_nothing() {
        let html = "<html><body><h1>Not found</h1></body></html>";
        assert!(parse_sitemap(html).locations().is_empty());
    }
}
