//! Page categorization
//!
//! Sorts arbitrary URLs into a fixed set of page categories by comparing
//! their normalized paths against multilingual pattern tables. Independent
//! of any extraction run.

mod patterns;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use url::Url;

/// File extensions stripped from the last path segment
///
/// `.shtml` precedes `.html` so the longer suffix wins.
const STRIPPED_EXTENSIONS: &[&str] = &[
    ".shtml", ".html", ".php", ".aspx", ".asp", ".jsp", ".do", ".action", ".cfm", ".pl", ".cgi",
];

/// Closed set of page categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageCategory {
    Home,
    Contact,
    About,
    Products,
    Blog,
    Faq,
    Privacy,
    Login,
    Cart,
}

impl PageCategory {
    pub const ALL: [PageCategory; 9] = [
        PageCategory::Home,
        PageCategory::Contact,
        PageCategory::About,
        PageCategory::Products,
        PageCategory::Blog,
        PageCategory::Faq,
        PageCategory::Privacy,
        PageCategory::Login,
        PageCategory::Cart,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Contact => "contact",
            Self::About => "about",
            Self::Products => "products",
            Self::Blog => "blog",
            Self::Faq => "faq",
            Self::Privacy => "privacy",
            Self::Login => "login",
            Self::Cart => "cart",
        }
    }

    /// Normalized path patterns of this category
    pub fn patterns(&self) -> &'static [&'static str] {
        match self {
            Self::Home => patterns::HOME,
            Self::Contact => patterns::CONTACT,
            Self::About => patterns::ABOUT,
            Self::Products => patterns::PRODUCTS,
            Self::Blog => patterns::BLOG,
            Self::Faq => patterns::FAQ,
            Self::Privacy => patterns::PRIVACY,
            Self::Login => patterns::LOGIN,
            Self::Cart => patterns::CART,
        }
    }
}

impl fmt::Display for PageCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Groups URLs by page category
///
/// A URL lands under every category it matches and under none if it
/// matches nothing. Only non-empty categories appear in the map; URLs keep
/// their input order within each category.
///
/// # Example
///
/// ```
/// use site_discovery::{categorize_urls, PageCategory};
///
/// let urls = ["https://example.com/", "https://example.com/en/contact"];
/// let categories = categorize_urls(&urls);
/// assert_eq!(categories[&PageCategory::Home], vec!["https://example.com/"]);
/// assert_eq!(categories[&PageCategory::Contact], vec!["https://example.com/en/contact"]);
/// ```
pub fn categorize_urls<S: AsRef<str>>(urls: &[S]) -> BTreeMap<PageCategory, Vec<String>> {
    let mut categories: BTreeMap<PageCategory, Vec<String>> = BTreeMap::new();

    for url in urls {
        let url = url.as_ref();
        for category in categorize_url(url) {
            categories.entry(category).or_default().push(url.to_string());
        }
    }

    categories
}

/// Categories a single URL (or bare path) belongs to
pub fn categorize_url(url: &str) -> Vec<PageCategory> {
    let path = match raw_path(url) {
        Some(path) => normalize_path(&path),
        None => return Vec::new(),
    };

    PageCategory::ALL
        .into_iter()
        .filter(|category| {
            category
                .patterns()
                .iter()
                .any(|pattern| matches_pattern(&path, pattern, *category))
        })
        .collect()
}

/// Normalizes a URL path for matching
///
/// Percent-decodes, lowercases, strips one trailing slash (except for `/`)
/// and one known file extension.
pub fn normalize_path(path: &str) -> String {
    let decoded = urlencoding::decode(path)
        .map(|p| p.into_owned())
        .unwrap_or_else(|_| path.to_string());
    let mut path = decoded.to_lowercase();

    if path.is_empty() {
        return "/".to_string();
    }
    if path.len() > 1 && path.ends_with('/') {
        path.pop();
    }

    let last_segment_start = path.rfind('/').map_or(0, |i| i + 1);
    for ext in STRIPPED_EXTENSIONS {
        if path.ends_with(ext) && path.len() - ext.len() > last_segment_start {
            path.truncate(path.len() - ext.len());
            break;
        }
    }

    path
}

/// Path component of an absolute URL or a bare `/path`
fn raw_path(url: &str) -> Option<String> {
    let url = url.trim();
    if let Ok(parsed) = Url::parse(url) {
        return Some(parsed.path().to_string());
    }
    if url.starts_with('/') {
        let end = url.find(|c: char| c == '?' || c == '#').unwrap_or(url.len());
        return Some(url[..end].to_string());
    }
    None
}

/// Matches a normalized path against one normalized pattern
fn matches_pattern(path: &str, pattern: &str, category: PageCategory) -> bool {
    if path == pattern {
        return true;
    }

    let pattern_segments = segments(pattern);
    if pattern_segments.is_empty() {
        return false;
    }

    // Bare language codes only ever mean the language root page
    if category == PageCategory::Home
        && pattern_segments.len() == 1
        && is_language_code(pattern_segments[0])
    {
        return false;
    }

    let path_segments = segments(path);
    if pattern_segments.len() == 1 {
        return path_segments.contains(&pattern_segments[0]);
    }

    path_segments
        .windows(pattern_segments.len())
        .any(|window| window == pattern_segments.as_slice())
}

fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// `xx` or `xx-yy` with ASCII letters
fn is_language_code(segment: &str) -> bool {
    let is_pair = |s: &str| s.len() == 2 && s.bytes().all(|b| b.is_ascii_alphabetic());
    match segment.split_once('-') {
        Some((lang, region)) => is_pair(lang) && is_pair(region),
        None => is_pair(segment),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has(url: &str, category: PageCategory) -> bool {
        categorize_url(url).contains(&category)
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("/"), "/");
        assert_eq!(normalize_path(""), "/");
        assert_eq!(normalize_path("/About/"), "/about");
        assert_eq!(normalize_path("/contact.html"), "/contact");
        assert_eq!(normalize_path("/page.shtml"), "/page");
        assert_eq!(normalize_path("/login.aspx"), "/login");
        assert_eq!(normalize_path("/cgi/run.cgi"), "/cgi/run");
        assert_eq!(normalize_path("/%C3%BCber-uns"), "/über-uns");
        assert_eq!(normalize_path("/docs.pdf"), "/docs.pdf");
    }

    #[test]
    fn test_extension_only_segment_kept() {
        assert_eq!(normalize_path("/.html"), "/.html");
    }

    #[test]
    fn test_language_code_matches_only_exactly() {
        assert!(has("https://example.com/it", PageCategory::Home));
        assert!(has("https://example.com/it/", PageCategory::Home));
        assert!(!has("https://example.com/it/something", PageCategory::Home));
        assert!(has("https://example.com/pt-br", PageCategory::Home));
        assert!(!has("https://example.com/pt-br/produtos", PageCategory::Home));
    }

    #[test]
    fn test_contact_segment_matching() {
        assert!(has("https://example.com/contact", PageCategory::Contact));
        assert!(has("https://example.com/en/contact", PageCategory::Contact));
        assert!(has("https://example.com/contact/form", PageCategory::Contact));
        assert!(has("https://example.com/contacto", PageCategory::Contact));
        assert!(!has("https://example.com/contactos-list", PageCategory::Contact));
    }

    #[test]
    fn test_contact_pattern_does_not_match_longer_word() {
        assert!(!matches_pattern("/contacto", "/contact", PageCategory::Contact));
        assert!(matches_pattern("/en/contact", "/contact", PageCategory::Contact));
        assert!(matches_pattern("/contact/form", "/contact", PageCategory::Contact));
    }

    #[test]
    fn test_multi_segment_pattern_consecutive() {
        assert!(matches_pattern("/en/account/login", "/account/login", PageCategory::Login));
        assert!(!matches_pattern("/account/x/login", "/account/login", PageCategory::Login));
    }

    #[test]
    fn test_root_pattern_matches_root_only() {
        assert!(has("https://example.com", PageCategory::Home));
        assert!(has("https://example.com/", PageCategory::Home));
        assert!(!has("https://example.com/random-page", PageCategory::Home));
    }

    #[test]
    fn test_home_index_pages() {
        assert!(has("https://example.com/index.html", PageCategory::Home));
        assert!(has("https://example.com/index.php", PageCategory::Home));
        assert!(has("https://example.com/fr/accueil", PageCategory::Home));
    }

    #[test]
    fn test_multilingual() {
        assert!(has("https://example.de/ueber-uns", PageCategory::About));
        assert!(has("https://example.de/%C3%BCber-uns/", PageCategory::About));
        assert!(has("https://example.fr/panier", PageCategory::Cart));
        assert!(has("https://example.it/domande-frequenti", PageCategory::Faq));
        assert!(has("https://example.nl/privacybeleid", PageCategory::Privacy));
        assert!(has("https://example.es/blog/mi-post", PageCategory::Blog));
        assert!(has("https://example.com.br/produtos/item-1", PageCategory::Products));
    }

    #[test]
    fn test_query_and_case_ignored() {
        assert!(has("https://example.com/FAQ?lang=en", PageCategory::Faq));
        assert!(has("/Cart#top", PageCategory::Cart));
    }

    #[test]
    fn test_multiple_categories() {
        let categories = categorize_url("https://example.com/shop/cart");
        assert!(categories.contains(&PageCategory::Products));
        assert!(categories.contains(&PageCategory::Cart));
    }

    #[test]
    fn test_unparseable_input_matches_nothing() {
        assert!(categorize_url("not a url").is_empty());
    }

    #[test]
    fn test_categorize_urls_grouping() {
        let urls = vec![
            "https://example.com/".to_string(),
            "https://example.com/about".to_string(),
            "https://example.com/blog/one".to_string(),
            "https://example.com/blog/two".to_string(),
            "https://example.com/random".to_string(),
        ];
        let categories = categorize_urls(&urls);

        assert_eq!(categories.len(), 3);
        assert_eq!(categories[&PageCategory::Home], vec!["https://example.com/"]);
        assert_eq!(categories[&PageCategory::About], vec!["https://example.com/about"]);
        assert_eq!(
            categories[&PageCategory::Blog],
            vec!["https://example.com/blog/one", "https://example.com/blog/two"]
        );
        assert!(!categories.contains_key(&PageCategory::Contact));
    }

    #[test]
    fn test_language_code_detection() {
        assert!(is_language_code("it"));
        assert!(is_language_code("en-us"));
        assert!(!is_language_code("home"));
        assert!(!is_language_code("e1"));
        assert!(!is_language_code("en-usa"));
    }
}
