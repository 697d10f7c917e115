//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with the configured user agent and timeout
//! - GET requests that stream the full body
//! - Lossy decoding of the body as UTF-8
//! - Error classification

use crate::config::Config;
use crate::CrawlerError;
use reqwest::{header::CONTENT_TYPE, redirect::Policy, Client};
use std::time::Duration;
use url::Url;

/// Maximum number of redirects followed for a single fetch
const MAX_REDIRECTS: usize = 10;

/// A successfully fetched resource
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub final_url: Url,

    /// HTTP status code
    pub status_code: u16,

    /// Content-Type header value, lowercased; empty when absent
    pub content_type: String,

    /// Body decoded as UTF-8, invalid sequences replaced
    pub text: String,

    /// Raw body
    pub bytes: Vec<u8>,
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use site_crawler::config::Config;
/// use site_crawler::crawler::build_http_client;
///
/// let client = build_http_client(&Config::default()).unwrap();
/// ```
pub fn build_http_client(config: &Config) -> Result<Client, reqwest::Error> {
    let timeout = Duration::from_secs(config.crawler.timeout_secs);

    Client::builder()
        .user_agent(config.user_agent.value.clone())
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL and reads the whole body
///
/// # Errors
///
/// | Condition | Error |
/// |-----------|-------|
/// | Non-2xx status | `CrawlerError::Status` |
/// | Timeout (connect or read) | `CrawlerError::Timeout` |
/// | Any other transport failure | `CrawlerError::Http` |
///
/// Decoding never fails; invalid UTF-8 is replaced with U+FFFD.
pub async fn fetch_url(client: &Client, url: &Url) -> Result<FetchedPage, CrawlerError> {
    let mut response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| classify_error(url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(CrawlerError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let final_url = response.url().clone();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .trim()
        .to_lowercase();

    let mut bytes = Vec::new();
    while let Some(chunk) = response.chunk().await.map_err(|e| classify_error(url, e))? {
        bytes.extend_from_slice(&chunk);
    }

    let text = String::from_utf8_lossy(&bytes).into_owned();

    tracing::debug!(
        "Fetched {} ({} bytes, status {}, type '{}')",
        final_url,
        bytes.len(),
        status.as_u16(),
        content_type
    );

    Ok(FetchedPage {
        final_url,
        status_code: status.as_u16(),
        content_type,
        text,
        bytes,
    })
}

fn classify_error(url: &Url, error: reqwest::Error) -> CrawlerError {
    if error.is_timeout() {
        CrawlerError::Timeout {
            url: url.to_string(),
        }
    } else {
        CrawlerError::Http {
            url: url.to_string(),
            source: error,
        }
    }
}
