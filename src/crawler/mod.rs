//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with timeouts and redirects
//! - The recursive, domain-scoped crawl driver
//! - The result tree and run envelope

mod coordinator;
mod fetcher;
mod result;

pub use coordinator::{select_links, CrawlFuture, WebCrawler};
pub use fetcher::{build_http_client, fetch_url, FetchedPage};
pub use result::{format_timestamp, generate_crawl_id, CrawlResult, CrawlRun, Iter, ALREADY_VISITED};

use crate::config::{validate, Config};
use crate::url::validate_start_url;
use crate::CrawlerError;
use chrono::Utc;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Validate the configuration and the start URL
/// 2. Build a fresh [`WebCrawler`] with its own visited set
/// 3. Crawl depth-first from depth 0
/// 4. Wrap the tree in a [`CrawlRun`] with a new crawl id and timestamp
///
/// # Arguments
///
/// * `start_url` - Where the crawl begins; must be an absolute http(s) URL
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(CrawlRun)` - Crawl completed; per-page failures are inside the tree
/// * `Err(CrawlerError)` - Invalid configuration or start URL
pub async fn crawl_website(start_url: &str, config: &Config) -> Result<CrawlRun, CrawlerError> {
    validate(config)?;
    let start = validate_start_url(start_url)?;

    let started_at = Utc::now();
    let crawl_id = generate_crawl_id(start_url, started_at, config.crawler.crawl_id_hash_length);

    tracing::info!(
        "Starting crawl {} from {} (max depth {})",
        crawl_id,
        start,
        config.crawler.max_depth
    );

    let mut crawler = WebCrawler::new(config)?;
    let data = crawler.crawl_page(start.as_str(), 0).await;

    tracing::info!(
        "Crawl {} finished: {} URLs visited in {:.2}s",
        crawl_id,
        crawler.visited().len(),
        (Utc::now() - started_at).num_milliseconds() as f64 / 1000.0
    );

    Ok(CrawlRun {
        crawl_id,
        start_url: start_url.to_string(),
        crawl_timestamp: format_timestamp(Utc::now()),
        max_depth: config.crawler.max_depth,
        data,
    })
}
