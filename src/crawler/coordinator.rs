//! Crawler coordinator - recursive crawl orchestration
//!
//! This module contains the depth-first crawl driver, including:
//! - Canonicalizing and de-duplicating URLs
//! - Coordinating fetching and content extraction
//! - Domain confinement and per-page link caps
//! - Pacing between sibling requests

use crate::config::Config;
use crate::crawler::result::CrawlResult;
use crate::crawler::{build_http_client, fetch_url};
use crate::extract::{Capabilities, Extractor};
use crate::url::{extract_authority, is_valid_url, normalize_url};
use crate::CrawlerError;
use reqwest::Client;
use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

/// Boxed future returned by the recursive crawl
pub type CrawlFuture<'a> = Pin<Box<dyn Future<Output = CrawlResult> + Send + 'a>>;

/// Depth-first crawler for a single run
///
/// A `WebCrawler` owns the visited set for one crawl. Separate runs should use
/// separate instances; they may be driven concurrently from different tasks.
pub struct WebCrawler {
    client: Client,
    extractor: Extractor,
    max_depth: u32,
    max_links_per_page: usize,
    request_delay: Duration,
    visited: HashSet<String>,
    base_domain: Option<String>,
}

impl WebCrawler {
    /// Creates a crawler from configuration
    ///
    /// # Returns
    ///
    /// * `Ok(WebCrawler)` - Ready to crawl
    /// * `Err(CrawlerError)` - The HTTP client could not be built
    pub fn new(config: &Config) -> Result<Self, CrawlerError> {
        let client = build_http_client(config)
            .map_err(|e| CrawlerError::Runtime(format!("failed to build HTTP client: {}", e)))?;
        let extractor = Extractor::new(Capabilities::from_config(&config.extraction));

        Ok(Self::with_client(client, extractor, config))
    }

    /// Creates a crawler around an existing client and extractor
    pub fn with_client(client: Client, extractor: Extractor, config: &Config) -> Self {
        Self {
            client,
            extractor,
            max_depth: config.crawler.max_depth,
            max_links_per_page: config.crawler.max_links_per_page,
            request_delay: Duration::from_millis(config.crawler.request_delay_ms),
            visited: HashSet::new(),
            base_domain: None,
        }
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Canonical URLs visited so far
    pub fn visited(&self) -> &HashSet<String> {
        &self.visited
    }

    /// Authority all followed links must share; fixed once recursion starts
    pub fn base_domain(&self) -> Option<&str> {
        self.base_domain.as_deref()
    }

    /// Crawls one URL and, depth permitting, the in-domain pages it links to
    ///
    /// This method:
    /// 1. Normalizes the URL and checks the visited set
    /// 2. Fetches the resource
    /// 3. Extracts text, metadata and links
    /// 4. Recurses into filtered links, pausing after each child
    ///
    /// Never fails: fetch problems, bad URLs and revisits all come back as
    /// terminal nodes carrying an `error`.
    pub fn crawl_page<'a>(&'a mut self, url: &str, depth: u32) -> CrawlFuture<'a> {
        let url = url.to_string();

        Box::pin(async move {
            let normalized = match normalize_url(&url) {
                Ok(u) => u,
                Err(e) => {
                    tracing::warn!("Skipping unparseable URL {}: {}", url, e);
                    return CrawlResult::failed(url, depth, e.to_string());
                }
            };
            let key = normalized.to_string();

            if self.visited.contains(&key) {
                tracing::debug!("Already visited {}", key);
                return CrawlResult::already_visited(key, depth);
            }
            self.visited.insert(key.clone());

            tracing::info!("Crawling depth {}: {}", depth, key);

            let page = match fetch_url(&self.client, &normalized).await {
                Ok(page) => page,
                Err(e) => {
                    tracing::error!("Error crawling {}: {}", key, e);
                    return CrawlResult::failed(key, depth, e.to_string());
                }
            };

            let extraction =
                self.extractor
                    .extract(&page.final_url, &page.content_type, &page.text, &page.bytes);

            let mut result = CrawlResult {
                url: key,
                depth,
                content_type: page.content_type,
                metadata: extraction.metadata,
                extracted_text: extraction.text,
                links: Vec::new(),
                error: None,
            };

            if depth >= self.max_depth || extraction.links.is_empty() {
                return result;
            }

            if self.base_domain.is_none() {
                self.base_domain = extract_authority(&normalized);
                tracing::debug!("Base domain set to {:?}", self.base_domain);
            }

            let to_follow = select_links(
                &extraction.links,
                self.base_domain.as_deref(),
                self.max_links_per_page,
            );
            tracing::debug!(
                "Following {} of {} links from {}",
                to_follow.len(),
                extraction.links.len(),
                result.url
            );

            for link in to_follow {
                let child = self.crawl_page(&link, depth + 1).await;
                result.links.push(child);

                if !self.request_delay.is_zero() {
                    tracing::debug!("Pausing {:?} before next request", self.request_delay);
                    tokio::time::sleep(self.request_delay).await;
                }
            }

            result
        })
    }
}

/// Keeps in-domain, non-asset links in discovery order, capped at `limit`
pub fn select_links(links: &[String], base_domain: Option<&str>, limit: usize) -> Vec<String> {
    links
        .iter()
        .filter(|link| is_valid_url(link, base_domain))
        .take(limit)
        .cloned()
        .collect()
}
