//! End-to-end crawl tests
//!
//! These tests use wiremock to stand in for the target business sites and
//! exercise the full pipeline: scheme fallback, subpage discovery, signal
//! merging, failure isolation, and the concurrency cap.

use leadsift::config::{Config, CrawlerConfig, FetcherConfig, OutputConfig, SeedEntry};
use leadsift::crawler::{crawl_site, Fetcher};
use leadsift::output::MemorySink;
use std::sync::Arc;
use std::time::{Duration, Instant};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Builds a realistic business page: long enough to pass the parked-page
/// length floors and carrying a business cue for the classifier.
fn business_page(title: &str, body: &str, links: &[&str]) -> String {
    let anchors: Vec<String> = links
        .iter()
        .map(|href| format!(r#"<a href="{}">{}</a>"#, href, href))
        .collect();
    format!(
        "<html><head><title>{}</title></head><body><main><h1>{}</h1>\
         <p>{} We provide professional services and free estimates across \
         the metro area. Contact our team today to discuss your project.</p>\
         {}</main><!-- {} --></body></html>",
        title,
        title,
        body,
        anchors.join("\n"),
        "padding ".repeat(80)
    )
}

fn html_response(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html")
}

fn test_fetcher() -> Fetcher {
    Fetcher::new(&FetcherConfig::default()).expect("failed to build fetcher")
}

fn test_config(seeds: Vec<&str>, max_concurrency: usize) -> Config {
    Config {
        crawler: CrawlerConfig {
            max_concurrency,
            max_subpages: 3,
        },
        fetcher: FetcherConfig::default(),
        output: OutputConfig {
            results_path: "/dev/null".to_string(),
        },
        start_urls: seeds
            .into_iter()
            .map(|seed| SeedEntry::Url(seed.to_string()))
            .collect(),
    }
}

#[tokio::test]
async fn test_site_crawl_merges_and_dedups_contact_signal() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_response(business_page(
            "Acme Plumbing",
            "Reach us at a@x.com or a@x.com.",
            &["/about", "/contact"],
        )))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/about"))
        .respond_with(html_response(business_page(
            "About Acme",
            "Founded 1990. Write to a@x.com or b@x.com.",
            &[],
        )))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/contact"))
        .respond_with(html_response(business_page(
            "Contact Acme",
            "Call +1 (555) 123-4567 any weekday.",
            &[],
        )))
        .mount(&server)
        .await;

    let seed = format!("{}/", server.uri());
    let record = crawl_site(&test_fetcher(), &seed, 3).await;

    assert!(record.is_ok(), "expected ok record, got {:?}", record);
    // Exact-string union in first-seen order: homepage first, then subpages
    assert_eq!(record.emails(), ["a@x.com", "b@x.com"]);
    assert_eq!(record.phones(), ["+1 (555) 123-4567"]);

    let value = serde_json::to_value(&record).unwrap();
    assert_eq!(value["status"], "ok");
    assert_eq!(value["title"], "Acme Plumbing");
    assert_eq!(value["subpages_scraped"], 2);

    // Merged text preserves homepage-first order
    let text = value["text"].as_str().unwrap();
    let home_pos = text.find("Reach us").unwrap();
    let about_pos = text.find("Founded 1990").unwrap();
    assert!(home_pos < about_pos);
}

#[tokio::test]
async fn test_browser_headers_sent_with_requests() {
    let server = MockServer::start().await;

    let mut fetcher_config = FetcherConfig::default();
    fetcher_config.user_agent = "LeadsiftTest/1.0".to_string();

    // The mock only matches when our headers arrive; otherwise the crawl
    // sees a 404 and the record comes back as an error.
    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("user-agent", "LeadsiftTest/1.0"))
        .and(header("accept-language", "en-US,en;q=0.9"))
        .respond_with(html_response(business_page("Home", "Welcome.", &[])))
        .mount(&server)
        .await;

    let fetcher = Fetcher::new(&fetcher_config).unwrap();
    let seed = format!("{}/", server.uri());
    let record = crawl_site(&fetcher, &seed, 3).await;

    assert!(record.is_ok());
}

#[tokio::test]
async fn test_https_seed_falls_back_to_http() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_response(business_page("Fallback Co", "Hi.", &[])))
        .mount(&server)
        .await;

    // The mock server only speaks plain HTTP; an https:// seed on the same
    // port must fail the TLS attempt and succeed on the HTTP fallback.
    let https_seed = format!("{}/", server.uri().replace("http://", "https://"));
    let record = crawl_site(&test_fetcher(), &https_seed, 3).await;

    assert!(record.is_ok(), "expected fallback to succeed: {:?}", record);
}

#[tokio::test]
async fn test_unreachable_homepage_yields_error_record() {
    // Nothing listens on the discard port
    let record = crawl_site(&test_fetcher(), "http://127.0.0.1:9/", 3).await;

    assert!(!record.is_ok());
    let value = serde_json::to_value(&record).unwrap();
    assert_eq!(value["status"], "error");
    assert!(value.get("html").is_none());
}

#[tokio::test]
async fn test_redirected_homepage_is_followed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(301).insert_header("location", "/home"),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/home"))
        .respond_with(html_response(business_page(
            "Redirected",
            "Mail c@x.com.",
            &[],
        )))
        .mount(&server)
        .await;

    let seed = format!("{}/", server.uri());
    let record = crawl_site(&test_fetcher(), &seed, 3).await;

    assert!(record.is_ok());
    assert_eq!(record.emails(), ["c@x.com"]);
}

#[tokio::test]
async fn test_parked_homepage_still_crawls_subpages() {
    let server = MockServer::start().await;

    // Minimal placeholder homepage: fails the length floors, but links out
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_response(
            r#"<html><body>Domain for sale <a href="/about-us">about</a></body></html>"#
                .to_string(),
        ))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/about-us"))
        .respond_with(html_response(business_page(
            "The Real Business",
            "We are real. Email real@biz.com.",
            &[],
        )))
        .mount(&server)
        .await;

    let seed = format!("{}/", server.uri());
    let record = crawl_site(&test_fetcher(), &seed, 3).await;

    assert!(record.is_ok());
    assert_eq!(record.emails(), ["real@biz.com"]);
}

#[tokio::test]
async fn test_failed_subpage_does_not_affect_site_result() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_response(business_page(
            "Half Broken",
            "Mail x@y.com.",
            &["/about", "/contact"],
        )))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/about"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/contact"))
        .respond_with(html_response(business_page(
            "Contact",
            "Mail z@y.com.",
            &[],
        )))
        .mount(&server)
        .await;

    let seed = format!("{}/", server.uri());
    let record = crawl_site(&test_fetcher(), &seed, 3).await;

    assert!(record.is_ok());
    assert_eq!(record.emails(), ["x@y.com", "z@y.com"]);

    // Attempted links count even when one of them failed
    let value = serde_json::to_value(&record).unwrap();
    assert_eq!(value["subpages_scraped"], 2);
}

#[tokio::test]
async fn test_one_failing_seed_is_isolated() {
    let server = MockServer::start().await;

    for site in ["s1", "s2", "s3", "s4"] {
        Mock::given(method("GET"))
            .and(path(format!("/{}", site)))
            .respond_with(html_response(business_page(site, "Fine.", &[])))
            .mount(&server)
            .await;
    }

    let seeds = vec![
        format!("{}/s1", server.uri()),
        format!("{}/s2", server.uri()),
        "http://127.0.0.1:9/".to_string(),
        format!("{}/s3", server.uri()),
        format!("{}/s4", server.uri()),
    ];

    let config = test_config(seeds.iter().map(|s| s.as_str()).collect(), 5);
    let sink = Arc::new(MemorySink::new());
    let stats = leadsift::crawl(config, sink.clone()).await.unwrap();

    assert_eq!(stats.total, 5);
    assert_eq!(stats.ok, 4);
    assert_eq!(stats.failed, 1);

    let records = sink.records();
    assert_eq!(records.len(), 5);
    assert_eq!(records.iter().filter(|r| r.is_ok()).count(), 4);
    assert_eq!(records.iter().filter(|r| !r.is_ok()).count(), 1);
}

#[tokio::test]
async fn test_concurrency_cap_batches_work() {
    let server = MockServer::start().await;

    // Every page takes 300ms; 9 seeds under a cap of 3 need at least
    // three sequential rounds per worker.
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(business_page("Slow", "Hello.", &[]))
                .insert_header("content-type", "text/html")
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;

    let seeds: Vec<String> = (0..9).map(|i| format!("{}/slow{}", server.uri(), i)).collect();
    let config = test_config(seeds.iter().map(|s| s.as_str()).collect(), 3);
    let sink = Arc::new(MemorySink::new());

    let start = Instant::now();
    let stats = leadsift::crawl(config, sink.clone()).await.unwrap();
    let elapsed = start.elapsed();

    assert_eq!(stats.total, 9);
    assert_eq!(stats.ok, 9);
    assert_eq!(sink.records().len(), 9);

    // With only 3 in flight the run cannot finish in fewer than 3 rounds
    assert!(
        elapsed >= Duration::from_millis(800),
        "run finished too fast for the concurrency cap: {:?}",
        elapsed
    );
}

#[tokio::test]
async fn test_duplicate_seeds_produce_one_record() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_response(business_page("Once", "Hi.", &[])))
        .expect(1)
        .mount(&server)
        .await;

    let seed = format!("{}/", server.uri());
    let config = test_config(vec![&seed, &seed, &seed], 3);
    let sink = Arc::new(MemorySink::new());
    let stats = leadsift::crawl(config, sink.clone()).await.unwrap();

    assert_eq!(stats.total, 1);
    assert_eq!(sink.records().len(), 1);
}
