//! Integration tests for the crawler
//!
//! These tests use wiremock to serve small sites over real HTTP and run
//! the whole crawl cycle end-to-end.

use site_census::config::Config;
use site_census::crawler::{crawl, Coordinator, CrawlOutcome, HttpFetcher};
use site_census::output::render_report;
use site_census::CrawlError;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!("<html><body>{}</body></html>", body))
        .insert_header("content-type", "text/html")
}

async fn mount_page(server: &MockServer, page_path: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(html(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_fragment_variants_count_as_one_url() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        &format!(
            r#"<a href="/about">About</a><a href="{}/about#team">Team</a>"#,
            base_url
        ),
    )
    .await;
    mount_page(&mock_server, "/about", "<p>No links here</p>").await;

    let mut coordinator =
        Coordinator::start(&base_url, 2).expect("Failed to create coordinator");
    let outcome = coordinator
        .run(CancellationToken::new())
        .await
        .expect("Crawl failed");

    assert_eq!(outcome, CrawlOutcome::Completed);

    let results = coordinator.results();
    assert_eq!(results.len(), 2);
    assert_eq!(results.get(&base_url), Some(&1));
    assert_eq!(results.get(&format!("{}/about", base_url)), Some(&2));
}

#[tokio::test]
async fn test_multi_level_site() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/docs">Docs</a><a href="/blog/">Blog</a>"#,
    )
    .await;
    mount_page(
        &mock_server,
        "/docs",
        r#"<a href="/docs/install">Install</a><a href="/">Home</a>"#,
    )
    .await;
    // "/blog/" is fetched as "/blog" once normalized
    mount_page(
        &mock_server,
        "/blog",
        r#"<a href="/docs/install?ref=blog">Install</a>"#,
    )
    .await;
    mount_page(&mock_server, "/docs/install", r#"<a href="/docs">Back</a>"#).await;

    let mut coordinator =
        Coordinator::start(&base_url, 3).expect("Failed to create coordinator");
    let outcome = coordinator
        .run(CancellationToken::new())
        .await
        .expect("Crawl failed");

    assert_eq!(outcome, CrawlOutcome::Completed);

    let results = coordinator.results();
    assert_eq!(results.len(), 4);
    assert_eq!(results.get(&base_url), Some(&2));
    assert_eq!(results.get(&format!("{}/docs", base_url)), Some(&2));
    assert_eq!(results.get(&format!("{}/blog", base_url)), Some(&1));
    assert_eq!(results.get(&format!("{}/docs/install", base_url)), Some(&2));

    let visited = coordinator.visited();
    assert_eq!(visited.len(), results.len());
    assert!(results.keys().all(|url| visited.contains(url)));

    let stats = coordinator.stats();
    assert_eq!(stats.pages_fetched, 4);
    assert_eq!(stats.fetch_failures, 0);
    assert_eq!(stats.unique_urls, 4);
    assert_eq!(stats.total_occurrences, 7);
}

#[tokio::test]
async fn test_spa_root_stops_before_crawling() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            r#"<div id="root"></div><script>React.render()</script><a href="/about">About</a>"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/about"))
        .respond_with(html("<p>About</p>"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut coordinator =
        Coordinator::start(&base_url, 2).expect("Failed to create coordinator");
    let outcome = coordinator
        .run(CancellationToken::new())
        .await
        .expect("Crawl failed");

    assert_eq!(outcome, CrawlOutcome::SpaDetected);
    assert!(coordinator.results().is_empty());
    assert!(coordinator.visited().is_empty());
}

#[tokio::test]
async fn test_missing_page_is_counted_but_not_followed() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/gone">Gone</a><a href="/here">Here</a>"#,
    )
    .await;
    mount_page(&mock_server, "/here", r#"<a href="/gone">Gone again</a>"#).await;

    // Linked only from the 404 body, so it must never be discovered
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(
            ResponseTemplate::new(404).set_body_string(r#"<a href="/hidden">Hidden</a>"#),
        )
        .mount(&mock_server)
        .await;

    let mut coordinator =
        Coordinator::start(&base_url, 2).expect("Failed to create coordinator");
    let outcome = coordinator
        .run(CancellationToken::new())
        .await
        .expect("Crawl failed");

    assert_eq!(outcome, CrawlOutcome::Completed);

    let results = coordinator.results();
    assert_eq!(results.get(&format!("{}/gone", base_url)), Some(&2));
    assert_eq!(results.get(&format!("{}/here", base_url)), Some(&1));
    assert!(!results.contains_key(&format!("{}/hidden", base_url)));

    let stats = coordinator.stats();
    assert_eq!(stats.fetch_failures, 1);
    assert_eq!(stats.pages_fetched, 2);
}

#[tokio::test]
async fn test_external_and_non_http_links_are_ignored() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"
            <a href="https://other.org/page">Elsewhere</a>
            <a href="mailto:team@example.com">Mail</a>
            <a href="contact">Bare word</a>
            <a href="/contact">Contact</a>
        "#,
    )
    .await;
    mount_page(&mock_server, "/contact", "<p>Write to us</p>").await;

    let mut coordinator =
        Coordinator::start(&base_url, 2).expect("Failed to create coordinator");
    coordinator
        .run(CancellationToken::new())
        .await
        .expect("Crawl failed");

    let results = coordinator.results();
    assert_eq!(results.len(), 2);
    assert_eq!(results.get(&format!("{}/contact", base_url)), Some(&1));
    assert!(results.keys().all(|url| url.starts_with(&base_url)));
}

#[tokio::test]
async fn test_report_is_sorted_by_length() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/longer-page">L</a><a href="/b">B</a><a href="/a">A</a>"#,
    )
    .await;
    mount_page(&mock_server, "/a", "").await;
    mount_page(&mock_server, "/b", "").await;
    mount_page(&mock_server, "/longer-page", "").await;

    let mut coordinator =
        Coordinator::start(&base_url, 4).expect("Failed to create coordinator");
    coordinator
        .run(CancellationToken::new())
        .await
        .expect("Crawl failed");

    let expected = format!(
        "{base} (1)\n{base}/a (1)\n{base}/b (1)\n{base}/longer-page (1)\n",
        base = base_url
    );
    assert_eq!(render_report(coordinator.results()), expected);
}

#[tokio::test]
async fn test_unreachable_root_is_an_error() {
    let mut coordinator =
        Coordinator::start("http://127.0.0.1:1", 2).expect("Failed to create coordinator");
    let result = coordinator.run(CancellationToken::new()).await;

    assert!(matches!(result, Err(CrawlError::Fetch { .. })));
    assert!(coordinator.results().is_empty());
}

#[tokio::test]
async fn test_cancellation_returns_partial_results() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", r#"<a href="/slow">Slow</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(html(r#"<a href="/never">Never</a>"#).set_delay(Duration::from_secs(30)))
        .mount(&mock_server)
        .await;

    let mut coordinator =
        Coordinator::start(&base_url, 2).expect("Failed to create coordinator");

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(500)).await;
        trigger.cancel();
    });

    let outcome = tokio::time::timeout(Duration::from_secs(10), coordinator.run(cancel))
        .await
        .expect("Cancelled crawl did not return promptly")
        .expect("Crawl failed");

    assert_eq!(outcome, CrawlOutcome::Cancelled);

    let results = coordinator.results();
    assert_eq!(results.get(&base_url), Some(&1));
    assert_eq!(results.get(&format!("{}/slow", base_url)), Some(&1));
    assert!(!results.contains_key(&format!("{}/never", base_url)));
}

#[tokio::test]
async fn test_crawl_entry_point() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", r#"<a href="/x">X</a><a href="/x/">X again</a>"#).await;
    mount_page(&mock_server, "/x", r#"<a href="/">Home</a>"#).await;

    let mut config = Config::default();
    config.crawler.workers = 1;
    config.crawler.frontier_capacity = 1;
    config.crawler.intake_capacity = 1;

    let (outcome, results) = crawl(&base_url, &config, CancellationToken::new())
        .await
        .expect("Crawl failed");

    assert_eq!(outcome, CrawlOutcome::Completed);
    assert_eq!(results.len(), 2);
    assert_eq!(results.get(&base_url), Some(&2));
    assert_eq!(results.get(&format!("{}/x", base_url)), Some(&2));
}

#[tokio::test]
async fn test_custom_client_is_used_for_every_request() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // SPA check plus the worker fetch
    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("user-agent", "census-test/1.0"))
        .respond_with(html(r#"<a href="/page">Page</a>"#))
        .expect(2)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .and(header("user-agent", "census-test/1.0"))
        .respond_with(html("<p>Done</p>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = reqwest::Client::builder()
        .user_agent("census-test/1.0")
        .build()
        .expect("Failed to build client");

    let mut coordinator = Coordinator::with_fetcher(
        &base_url,
        &Config::default(),
        HttpFetcher::with_client(client),
    )
    .expect("Failed to create coordinator");
    let outcome = coordinator
        .run(CancellationToken::new())
        .await
        .expect("Crawl failed");

    assert_eq!(outcome, CrawlOutcome::Completed);
    assert_eq!(coordinator.results().get(&format!("{}/page", base_url)), Some(&1));
}
