//! Integration tests for the extractor
//!
//! These tests use wiremock to create mock HTTP servers and run full
//! extractions end-to-end. Mock servers listen on loopback, so every
//! request skips the private-network guard.

use flate2::write::GzEncoder;
use flate2::Compression;
use site_discovery::telemetry::CountingTelemetry;
use site_discovery::{
    categorize_urls, extract_urls, DiscoveryError, ExtractionRequest, Extractor, PageCategory,
    UrlSource,
};
use std::io::Write;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test request against a mock server
fn test_request(seed: &str) -> ExtractionRequest {
    ExtractionRequest::new(seed)
        .with_user_agent("TestBot/1.0")
        .with_delay_ms(0)
        .with_timeout(Duration::from_secs(20))
        .with_ssrf_check_skipped()
}

fn urlset(urls: &[String]) -> String {
    let entries: String = urls
        .iter()
        .map(|u| format!("  <url><loc>{}</loc></url>\n", u))
        .collect();
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n{}</urlset>",
        entries
    )
}

fn gzip(data: &str) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data.as_bytes()).unwrap();
    encoder.finish().unwrap()
}

async fn mount_get(server: &MockServer, route: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .mount(server)
        .await;
}

fn html_page(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(
        format!("<html><body>{}</body></html>", body),
        "text/html; charset=utf-8",
    )
}

#[tokio::test]
async fn test_urlset_sitemap_counts() {
    let server = MockServer::start().await;
    let base = server.uri();
    let urls: Vec<String> = (0..25).map(|i| format!("{}/page-{}", base, i)).collect();
    mount_get(
        &server,
        "/sitemap.xml",
        ResponseTemplate::new(200).set_body_string(urlset(&urls)),
    )
    .await;

    let result = extract_urls(&test_request(&base)).await.unwrap();

    assert_eq!(result.total_urls, 25);
    assert_eq!(result.source_count(UrlSource::Sitemap), 25);
    assert_eq!(result.source_count(UrlSource::Crawl), 0);
    assert!(result.sitemap_found);
    assert!(!result.robots_found);
    assert!(!result.partial);
    assert_eq!(result.base_url, base);
}

#[tokio::test]
async fn test_robots_disallow_filters_sitemap_urls() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_get(
        &server,
        "/robots.txt",
        ResponseTemplate::new(200).set_body_string(format!(
            "User-agent: *\nDisallow: /admin/\nSitemap: {}/custom-sitemap.xml\n",
            base
        )),
    )
    .await;
    let urls = vec![
        format!("{}/", base),
        format!("{}/admin/users", base),
        format!("{}/admin/", base),
        format!("{}/administrator", base),
        format!("{}/blog/admin/post", base),
    ];
    mount_get(
        &server,
        "/custom-sitemap.xml",
        ResponseTemplate::new(200).set_body_string(urlset(&urls)),
    )
    .await;

    let result = extract_urls(&test_request(&base)).await.unwrap();

    assert!(result.robots_found);
    assert_eq!(result.total_urls, 3);
    assert!(result.urls.iter().all(|u| !u.contains("/admin/users")));
    assert!(!result.urls.contains(&format!("{}/admin/", base)));
    assert!(result.urls.contains(&format!("{}/administrator", base)));
    assert!(result.urls.contains(&format!("{}/blog/admin/post", base)));
}

#[tokio::test]
async fn test_www_variant_is_same_site() {
    let server = MockServer::start().await;
    let port = url::Url::parse(&server.uri()).unwrap().port().unwrap();
    let seed = format!("http://localhost:{}", port);

    // The robots sitemap names the www host; it is rewritten to the canonical one
    mount_get(
        &server,
        "/robots.txt",
        ResponseTemplate::new(200).set_body_string(format!(
            "User-agent: *\nSitemap: http://www.localhost:{}/sitemap.xml\n",
            port
        )),
    )
    .await;
    mount_get(
        &server,
        "/sitemap.xml",
        ResponseTemplate::new(200).set_body_string(urlset(&[
            format!("http://localhost:{}/a", port),
            format!("http://www.localhost:{}/b", port),
            format!("http://other.localhost:{}/c", port),
        ])),
    )
    .await;

    let result = extract_urls(&test_request(&seed)).await.unwrap();

    assert_eq!(result.total_urls, 2);
    assert!(result.urls.contains(&format!("http://localhost:{}/a", port)));
    assert!(result.urls.contains(&format!("http://www.localhost:{}/b", port)));
}

#[tokio::test]
async fn test_max_urls_cap_across_phases() {
    let server = MockServer::start().await;
    let base = server.uri();
    let urls: Vec<String> = (0..50).map(|i| format!("{}/item/{}", base, i)).collect();
    mount_get(
        &server,
        "/sitemap.xml",
        ResponseTemplate::new(200).set_body_string(urlset(&urls)),
    )
    .await;
    let links: String = (0..30)
        .map(|i| format!(r#"<a href="/crawled/{}">x</a>"#, i))
        .collect();
    mount_get(&server, "/", html_page(&links)).await;

    let request = test_request(&base).with_max_urls(10).with_force_crawl(true);
    let result = extract_urls(&request).await.unwrap();

    assert_eq!(result.total_urls, 10);
    assert_eq!(result.urls.len(), 10);
}

#[tokio::test]
async fn test_gzip_sitemap_index() {
    let server = MockServer::start().await;
    let base = server.uri();
    let index = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <sitemap><loc>{0}/sitemap-pages.xml</loc></sitemap>
  <sitemap><loc>{0}/sitemap-posts.xml.gz</loc></sitemap>
</sitemapindex>"#,
        base
    );
    mount_get(
        &server,
        "/robots.txt",
        ResponseTemplate::new(200)
            .set_body_string(format!("Sitemap: {}/sitemap_index.xml.gz\n", base)),
    )
    .await;
    mount_get(
        &server,
        "/sitemap_index.xml.gz",
        ResponseTemplate::new(200)
            .insert_header("content-type", "application/x-gzip")
            .set_body_bytes(gzip(&index)),
    )
    .await;
    mount_get(
        &server,
        "/sitemap-pages.xml",
        ResponseTemplate::new(200).set_body_string(urlset(&[
            format!("{}/about", base),
            format!("{}/contact", base),
        ])),
    )
    .await;
    mount_get(
        &server,
        "/sitemap-posts.xml.gz",
        ResponseTemplate::new(200).set_body_bytes(gzip(&urlset(&[format!("{}/blog/hello", base)]))),
    )
    .await;

    let result = extract_urls(&test_request(&base)).await.unwrap();

    assert_eq!(result.total_urls, 3);
    assert_eq!(result.source_count(UrlSource::Sitemap), 3);
    assert!(result.sitemap_found);
}

#[tokio::test]
async fn test_crawl_fallback_without_sitemap() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_get(
        &server,
        "/",
        html_page(r##"<a href="/about">About</a><a href="/shop#top">Shop</a><a href="https://other.example.org/">Out</a>"##),
    )
    .await;
    mount_get(&server, "/about", html_page(r#"<a href="/">Home</a><a href="/team">Team</a>"#)).await;
    mount_get(&server, "/shop", html_page(r#"<a href="/shop">Shop</a>"#)).await;
    mount_get(&server, "/team", html_page("")).await;

    let result = extract_urls(&test_request(&base)).await.unwrap();

    assert!(!result.sitemap_found);
    assert_eq!(result.total_urls, 4);
    assert_eq!(result.source_count(UrlSource::Crawl), 4);
    assert_eq!(result.source_count(UrlSource::Sitemap), 0);
    assert!(result.urls.contains(&format!("{}/shop", base)));
    assert!(result.urls.iter().all(|u| !u.contains("other.example.org")));
}

#[tokio::test]
async fn test_crawl_respects_disallow() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_get(
        &server,
        "/robots.txt",
        ResponseTemplate::new(200).set_body_string("User-agent: testbot\nDisallow: /private/\n"),
    )
    .await;
    mount_get(
        &server,
        "/",
        html_page(r#"<a href="/private/data">P</a><a href="/public">Q</a>"#),
    )
    .await;
    mount_get(&server, "/public", html_page("")).await;
    Mock::given(method("GET"))
        .and(path("/private/data"))
        .respond_with(html_page(""))
        .expect(0)
        .mount(&server)
        .await;

    let result = extract_urls(&test_request(&base)).await.unwrap();

    assert_eq!(result.total_urls, 2);
    assert!(!result.urls.contains(&format!("{}/private/data", base)));
}

#[tokio::test]
async fn test_robots_crawl_delay_is_honored() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_get(
        &server,
        "/robots.txt",
        ResponseTemplate::new(200).set_body_string("User-agent: *\nCrawl-delay: 1\n"),
    )
    .await;
    mount_get(&server, "/", html_page(r#"<a href="/next">next</a>"#)).await;
    mount_get(&server, "/next", html_page("")).await;

    let started = Instant::now();
    let result = extract_urls(&test_request(&base)).await.unwrap();

    assert_eq!(result.total_urls, 2);
    assert!(started.elapsed() >= Duration::from_secs(2));
}

#[tokio::test]
async fn test_cancellation_returns_partial_result_promptly() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_get(
        &server,
        "/",
        html_page(r#"<a href="/next">next</a>"#).set_delay(Duration::from_secs(10)),
    )
    .await;

    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        trigger.cancel();
    });

    let started = Instant::now();
    let result = Extractor::new()
        .extract_with_cancel(&test_request(&base), token)
        .await
        .unwrap();

    assert!(started.elapsed() < Duration::from_secs(2));
    assert!(result.partial);
    assert!(result.total_urls <= 1);
}

#[tokio::test]
async fn test_timeout_returns_partial_result() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_get(
        &server,
        "/",
        html_page("").set_delay(Duration::from_secs(10)),
    )
    .await;

    let started = Instant::now();
    let result = extract_urls(&test_request(&base).with_timeout(Duration::from_secs(1)))
        .await
        .unwrap();

    assert!(started.elapsed() < Duration::from_secs(3));
    assert!(result.partial);
}

#[tokio::test]
async fn test_invalid_input_errors() {
    let cases = vec![
        ExtractionRequest::new(""),
        ExtractionRequest::new("ftp://example.com/"),
        ExtractionRequest::new("https://example.com").with_max_urls(0),
        ExtractionRequest::new("https://example.com").with_max_urls(10_001),
        ExtractionRequest::new("https://example.com").with_timeout(Duration::from_secs(601)),
        ExtractionRequest::new("https://example.com").with_delay_ms(5_001),
    ];

    for request in cases {
        let err = extract_urls(&request).await.unwrap_err();
        assert!(
            matches!(err, DiscoveryError::InvalidInput(_)),
            "expected InvalidInput for {:?}, got {:?}",
            request,
            err
        );
    }
}

#[tokio::test]
async fn test_unsafe_targets_rejected() {
    for seed in [
        "http://127.0.0.1/x",
        "http://10.0.0.1/x",
        "http://192.168.1.1/x",
        "http://169.254.169.254/x",
        "http://localhost/x",
    ] {
        let err = extract_urls(&ExtractionRequest::new(seed)).await.unwrap_err();
        assert!(
            matches!(err, DiscoveryError::UnsafeTarget { .. }),
            "expected UnsafeTarget for {}, got {:?}",
            seed,
            err
        );
    }
}

#[tokio::test]
async fn test_shared_telemetry_across_concurrent_extractions() {
    let first = MockServer::start().await;
    let second = MockServer::start().await;
    for server in [&first, &second] {
        let urls: Vec<String> = (0..3).map(|i| format!("{}/p{}", server.uri(), i)).collect();
        mount_get(
            server,
            "/sitemap.xml",
            ResponseTemplate::new(200).set_body_string(urlset(&urls)),
        )
        .await;
    }

    let telemetry = Arc::new(CountingTelemetry::new());
    let extractor = Extractor::new().with_telemetry(telemetry.clone());
    let first_request = test_request(&first.uri());
    let second_request = test_request(&second.uri());

    let (a, b) = tokio::join!(
        extractor.extract(&first_request),
        extractor.extract(&second_request)
    );

    assert_eq!(a.unwrap().total_urls, 3);
    assert_eq!(b.unwrap().total_urls, 3);
    assert_eq!(telemetry.extractions_finished(), 2);
    assert_eq!(telemetry.urls_extracted(), 6);
    assert_eq!(telemetry.urls_by_source(UrlSource::Sitemap), 6);
}

#[tokio::test]
async fn test_categorize_extracted_urls() {
    let server = MockServer::start().await;
    let base = server.uri();
    let urls = vec![
        format!("{}/", base),
        format!("{}/en/contact", base),
        format!("{}/it", base),
        format!("{}/it/prodotti", base),
    ];
    mount_get(
        &server,
        "/sitemap.xml",
        ResponseTemplate::new(200).set_body_string(urlset(&urls)),
    )
    .await;

    let result = extract_urls(&test_request(&base)).await.unwrap();
    let categories = categorize_urls(&result.urls);

    assert_eq!(
        categories[&PageCategory::Home],
        vec![format!("{}/", base), format!("{}/it", base)]
    );
    assert_eq!(categories[&PageCategory::Contact], vec![format!("{}/en/contact", base)]);
    assert_eq!(categories[&PageCategory::Products], vec![format!("{}/it/prodotti", base)]);
}
