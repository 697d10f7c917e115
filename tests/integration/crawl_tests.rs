//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use site_crawler::config::Config;
use site_crawler::crawler::{CrawlResult, ALREADY_VISITED};
use site_crawler::extract::PDF_UNAVAILABLE;
use site_crawler::output::{crawl_to_json, to_json, CrawlStatistics};
use site_crawler::{crawl_website, web_crawling_tool, CrawlerError};
use std::time::{Duration, Instant};
use wiremock::matchers::{any, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with no pacing and a short timeout
fn create_test_config(max_depth: u32) -> Config {
    let mut config = Config::default();
    config.crawler.max_depth = max_depth;
    config.crawler.request_delay_ms = 0;
    config.crawler.timeout_secs = 5;
    config
}

fn html_response(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.to_string(), "text/html; charset=utf-8")
}

fn html_page(title: &str, hrefs: &[&str]) -> String {
    let anchors: String = hrefs
        .iter()
        .map(|href| format!(r#"<a href="{}">{}</a>"#, href, href))
        .collect();
    format!(
        "<html><head><title>{}</title></head><body><p>{} content</p>{}</body></html>",
        title, title, anchors
    )
}

async fn mount_html(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html_response(&body))
        .mount(server)
        .await;
}

fn child_urls(node: &CrawlResult) -> Vec<&str> {
    node.links.iter().map(|c| c.url.as_str()).collect()
}

#[tokio::test]
async fn test_full_crawl_single_domain() {
    let mock_server = MockServer::start().await;
    let external = MockServer::start().await;
    let base_url = mock_server.uri();

    let external_link = format!("{}/elsewhere", external.uri());
    mount_html(
        &mock_server,
        "/",
        html_page("Home", &["/page1", "/page2", &external_link]),
    )
    .await;
    mount_html(&mock_server, "/page1", html_page("Page 1", &["/page2"])).await;
    mount_html(&mock_server, "/page2", html_page("Page 2", &[])).await;

    // The external host must never be contacted
    Mock::given(any())
        .respond_with(html_response("<html></html>"))
        .expect(0)
        .mount(&external)
        .await;

    let run = crawl_website(&base_url, &create_test_config(1))
        .await
        .expect("crawl should succeed");

    let root = &run.data;
    assert_eq!(root.url, format!("{}/", base_url));
    assert_eq!(root.depth, 0);
    assert!(root.error.is_none());
    assert_eq!(root.metadata.title.as_deref(), Some("Home"));
    assert!(root.extracted_text.contains("Home content"));
    assert_eq!(root.content_type, "text/html; charset=utf-8");

    assert_eq!(
        child_urls(root),
        vec![
            format!("{}/page1", base_url).as_str(),
            format!("{}/page2", base_url).as_str()
        ]
    );
    for child in &root.links {
        assert_eq!(child.depth, 1);
        assert!(child.links.is_empty(), "depth-1 nodes are leaves at max_depth 1");
        assert!(child.error.is_none());
    }

    assert_eq!(run.start_url, base_url);
    assert_eq!(run.max_depth, 1);
    assert!(run.crawl_id.starts_with("crawl_"));
    assert!(run.crawl_timestamp.ends_with('Z'));
}

#[tokio::test]
async fn test_cycle_yields_already_visited() {
    let mock_server = MockServer::start().await;

    mount_html(&mock_server, "/", html_page("Root", &["/a"])).await;
    mount_html(&mock_server, "/a", html_page("A", &["/", "/a#again"])).await;

    let run = crawl_website(&mock_server.uri(), &create_test_config(3))
        .await
        .unwrap();

    let a = &run.data.links[0];
    assert_eq!(a.metadata.title.as_deref(), Some("A"));
    assert_eq!(a.links.len(), 2);

    for revisit in &a.links {
        assert_eq!(revisit.error.as_deref(), Some(ALREADY_VISITED));
        assert_eq!(revisit.extracted_text, ALREADY_VISITED);
        assert!(revisit.links.is_empty());
        assert_eq!(revisit.depth, 2);
    }

    // Only the revisit sentinels may repeat a URL
    let mut fetched: Vec<&str> = run
        .data
        .iter()
        .filter(|n| !n.is_already_visited())
        .map(|n| n.url.as_str())
        .collect();
    let total = fetched.len();
    fetched.sort();
    fetched.dedup();
    assert_eq!(fetched.len(), total);
}

#[tokio::test]
async fn test_crawl_with_depth_limit() {
    let mock_server = MockServer::start().await;

    mount_html(&mock_server, "/", html_page("L0", &["/1"])).await;
    mount_html(&mock_server, "/1", html_page("L1", &["/2"])).await;
    mount_html(&mock_server, "/2", html_page("L2", &["/3"])).await;

    Mock::given(method("GET"))
        .and(path("/3"))
        .respond_with(html_response(&html_page("L3", &[])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let run = crawl_website(&mock_server.uri(), &create_test_config(2))
        .await
        .unwrap();

    let max = run.data.iter().map(|n| n.depth).max().unwrap();
    assert_eq!(max, 2);
    for node in run.data.iter().filter(|n| n.depth == 2) {
        assert!(node.links.is_empty());
    }
}

#[tokio::test]
async fn test_zero_depth_fetches_only_root() {
    let mock_server = MockServer::start().await;

    mount_html(&mock_server, "/", html_page("Only", &["/never"])).await;
    Mock::given(method("GET"))
        .and(path("/never"))
        .respond_with(html_response("<html></html>"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let run = crawl_website(&mock_server.uri(), &create_test_config(0))
        .await
        .unwrap();

    assert!(run.data.links.is_empty());
    assert_eq!(run.data.metadata.title.as_deref(), Some("Only"));
}

#[tokio::test]
async fn test_link_cap_preserves_discovery_order() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_html(
        &mock_server,
        "/",
        html_page("Hub", &["/e", "/d", "/c", "/b", "/a"]),
    )
    .await;
    for route in ["/e", "/d", "/c"] {
        mount_html(&mock_server, route, html_page(route, &[])).await;
    }
    for route in ["/b", "/a"] {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(html_response("<html></html>"))
            .expect(0)
            .mount(&mock_server)
            .await;
    }

    let mut config = create_test_config(1);
    config.crawler.max_links_per_page = 3;

    let run = crawl_website(&base_url, &config).await.unwrap();
    assert_eq!(
        child_urls(&run.data),
        vec![
            format!("{}/e", base_url).as_str(),
            format!("{}/d", base_url).as_str(),
            format!("{}/c", base_url).as_str(),
        ]
    );
}

#[tokio::test]
async fn test_asset_links_are_not_fetched() {
    let mock_server = MockServer::start().await;

    mount_html(
        &mock_server,
        "/",
        html_page("Assets", &["/style.css", "/app.js", "/logo.PNG", "/about"]),
    )
    .await;
    mount_html(&mock_server, "/about", html_page("About", &[])).await;

    let run = crawl_website(&mock_server.uri(), &create_test_config(1))
        .await
        .unwrap();

    assert_eq!(run.data.links.len(), 1);
    assert!(run.data.links[0].url.ends_with("/about"));

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
}

#[tokio::test]
async fn test_http_error_becomes_error_node() {
    let mock_server = MockServer::start().await;

    mount_html(&mock_server, "/", html_page("Root", &["/missing", "/ok"])).await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;
    mount_html(&mock_server, "/ok", html_page("Ok", &[])).await;

    let run = crawl_website(&mock_server.uri(), &create_test_config(1))
        .await
        .unwrap();

    let missing = &run.data.links[0];
    assert!(missing.error.as_deref().unwrap().contains("404"));
    assert!(missing.content_type.is_empty());
    assert!(missing.links.is_empty());

    let ok = &run.data.links[1];
    assert!(ok.error.is_none());
    assert_eq!(ok.metadata.title.as_deref(), Some("Ok"));
}

#[tokio::test]
async fn test_failed_root_is_still_a_run() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let run = crawl_website(&mock_server.uri(), &create_test_config(2))
        .await
        .unwrap();

    assert!(run.data.is_error());
    assert!(run.data.error.as_deref().unwrap().contains("500"));
}

#[tokio::test]
async fn test_timeout_becomes_error_node() {
    let mock_server = MockServer::start().await;

    mount_html(&mock_server, "/", html_page("Root", &["/slow"])).await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(html_response("<html></html>").set_delay(Duration::from_secs(3)))
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(1);
    config.crawler.timeout_secs = 1;

    let run = crawl_website(&mock_server.uri(), &config).await.unwrap();
    let slow = &run.data.links[0];
    assert!(slow.error.as_deref().unwrap().contains("timeout"), "{:?}", slow.error);
}

#[tokio::test]
async fn test_content_type_handling() {
    let mock_server = MockServer::start().await;

    mount_html(
        &mock_server,
        "/",
        html_page("Docs", &["/notes.txt", "/report.pdf", "/data.bin"]),
    )
    .await;

    let plain = "<p>not parsed</p> <a href=\"/hidden\">x</a>";
    Mock::given(method("GET"))
        .and(path("/notes.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(plain, "text/plain"))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/report.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(&b"%PDF-1.4 not really"[..], "application/pdf"))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/data.bin"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(&[0u8, 159, 146, 150][..], "application/octet-stream"),
        )
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(2);
    config.extraction.pdf = false;

    let run = crawl_website(&mock_server.uri(), &config).await.unwrap();
    let base_url = mock_server.uri();

    let notes = &run.data.links[0];
    assert_eq!(notes.extracted_text, plain);
    assert!(notes.links.is_empty());
    assert_eq!(
        notes.metadata.title,
        Some(format!("Text document from {}/notes.txt", base_url))
    );

    let report = &run.data.links[1];
    assert_eq!(report.extracted_text, PDF_UNAVAILABLE);
    assert!(report.error.is_none());

    let binary = &run.data.links[2];
    assert_eq!(
        binary.extracted_text,
        "Unsupported content type: application/octet-stream"
    );
}

#[tokio::test]
async fn test_redirect_resolves_links_against_final_url() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(302).insert_header("location", format!("{}/docs/", base_url).as_str()),
        )
        .mount(&mock_server)
        .await;
    mount_html(&mock_server, "/docs/", html_page("Docs", &["intro"])).await;
    mount_html(&mock_server, "/docs/intro", html_page("Intro", &[])).await;

    let run = crawl_website(&base_url, &create_test_config(1)).await.unwrap();

    assert_eq!(run.data.url, format!("{}/", base_url));
    assert_eq!(run.data.metadata.title.as_deref(), Some("Docs"));
    assert_eq!(child_urls(&run.data), vec![format!("{}/docs/intro", base_url).as_str()]);
}

#[tokio::test]
async fn test_request_pacing() {
    let mock_server = MockServer::start().await;

    mount_html(&mock_server, "/", html_page("Root", &["/a", "/b"])).await;
    mount_html(&mock_server, "/a", html_page("A", &[])).await;
    mount_html(&mock_server, "/b", html_page("B", &[])).await;

    let mut config = create_test_config(1);
    config.crawler.request_delay_ms = 150;

    let started = Instant::now();
    crawl_website(&mock_server.uri(), &config).await.unwrap();

    assert!(started.elapsed() >= Duration::from_millis(300));
}

#[tokio::test]
async fn test_concurrent_runs_are_independent() {
    let mock_server = MockServer::start().await;

    mount_html(&mock_server, "/", html_page("Root", &["/shared"])).await;
    Mock::given(method("GET"))
        .and(path("/shared"))
        .respond_with(html_response(&html_page("Shared", &[])))
        .expect(2)
        .mount(&mock_server)
        .await;

    let uri = mock_server.uri();
    let config = create_test_config(1);
    let first = tokio::spawn({
        let (uri, config) = (uri.clone(), config.clone());
        async move { crawl_website(&uri, &config).await }
    });
    let second = tokio::spawn({
        let (uri, config) = (uri.clone(), config.clone());
        async move { crawl_website(&uri, &config).await }
    });

    let first = first.await.unwrap().unwrap();
    let second = second.await.unwrap().unwrap();

    assert_ne!(first.crawl_id, second.crawl_id);
    for run in [&first, &second] {
        assert_eq!(run.data.links.len(), 1);
        assert!(run.data.links[0].error.is_none());
    }
}

#[tokio::test]
async fn test_invalid_start_url_is_top_level_error() {
    let err = crawl_website("ftp://example.com/", &create_test_config(1))
        .await
        .unwrap_err();
    assert!(matches!(err, CrawlerError::Url(_)));
}

#[tokio::test]
async fn test_tool_returns_serialized_run() {
    let mock_server = MockServer::start().await;

    mount_html(&mock_server, "/", html_page("Tool", &["/child"])).await;
    Mock::given(method("GET"))
        .and(path("/child"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let json = crawl_to_json(&mock_server.uri(), &create_test_config(1)).await;
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert!(value["crawl_id"].as_str().unwrap().starts_with("crawl_"));
    assert_eq!(value["max_depth"], 1);
    assert_eq!(value["data"]["depth"], 0);
    assert_eq!(value["data"]["metadata"]["title"], "Tool");
    assert!(value["data"].get("error").is_none());

    let child = &value["data"]["links"][0];
    assert!(child["error"].as_str().unwrap().contains("404"));
    assert_eq!(child["links"], serde_json::json!([]));
}

#[tokio::test]
async fn test_tool_error_envelope() {
    let json = web_crawling_tool("http://", 1).await;
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert!(value["error"].as_str().unwrap().starts_with("Crawling failed: "));
    assert_eq!(value["url"], "http://");
    assert!(value["timestamp"].as_str().unwrap().ends_with('Z'));
    assert!(value.get("data").is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_blocking_tool_outside_runtime() {
    let mock_server = MockServer::start().await;
    mount_html(&mock_server, "/", html_page("Blocking", &[])).await;

    let uri = mock_server.uri();
    let json = std::thread::spawn(move || site_crawler::web_crawling_tool_blocking(&uri, 0))
        .join()
        .unwrap();

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["data"]["metadata"]["title"], "Blocking");
}

#[tokio::test]
async fn test_statistics_over_real_crawl() {
    let mock_server = MockServer::start().await;

    mount_html(&mock_server, "/", html_page("Root", &["/a", "/gone"])).await;
    mount_html(&mock_server, "/a", html_page("A", &["/"])).await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(410))
        .mount(&mock_server)
        .await;

    let run = crawl_website(&mock_server.uri(), &create_test_config(2))
        .await
        .unwrap();
    let stats = CrawlStatistics::from_result(&run.data);

    assert_eq!(stats.total_nodes, 4);
    assert_eq!(stats.pages_fetched, 2);
    assert_eq!(stats.already_visited, 1);
    assert_eq!(stats.errors, 1);
    assert_eq!(stats.deepest_depth, 2);

    let compact = to_json(&run, false).unwrap();
    assert!(!compact.contains('\n'));
}
