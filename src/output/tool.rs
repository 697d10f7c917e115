//! Agent-facing crawl entry points
//!
//! These functions always return a JSON string: the serialized crawl run on
//! success, or an [`ErrorEnvelope`] when the crawl could not run at all.

use super::{to_json, ErrorEnvelope};
use crate::config::Config;
use crate::crawler::crawl_website;
use crate::CrawlerError;

/// Crawls with the given configuration and returns JSON
pub async fn crawl_to_json(url: &str, config: &Config) -> String {
    let pretty = config.output.pretty;

    match crawl_website(url, config).await {
        Ok(run) => to_json(&run, pretty).unwrap_or_else(|e| failure(url, &e, pretty)),
        Err(e) => failure(url, &e, pretty),
    }
}

/// Crawls `url` to `max_depth` with default settings and returns JSON
///
/// # Example
///
/// ```no_run
/// # async fn example() {
/// let json = site_crawler::web_crawling_tool("https://example.com", 1).await;
/// println!("{}", json);
/// # }
/// ```
pub async fn web_crawling_tool(url: &str, max_depth: u32) -> String {
    let mut config = Config::default();
    config.crawler.max_depth = max_depth;

    crawl_to_json(url, &config).await
}

/// Blocking variant of [`web_crawling_tool`]
///
/// Drives the crawl on a private current-thread runtime. When called from a
/// thread that is already inside a tokio runtime, the private runtime runs on
/// a scoped helper thread, where blocking on it is allowed.
pub fn web_crawling_tool_blocking(url: &str, max_depth: u32) -> String {
    if tokio::runtime::Handle::try_current().is_err() {
        return crawl_on_private_runtime(url, max_depth);
    }

    tracing::debug!("Inside an async runtime; crawling {} on a helper thread", url);
    std::thread::scope(|scope| {
        scope
            .spawn(|| crawl_on_private_runtime(url, max_depth))
            .join()
            .unwrap_or_else(|_| {
                let error = CrawlerError::Runtime("crawl thread panicked".to_string());
                failure(url, &error, true)
            })
    })
}

fn crawl_on_private_runtime(url: &str, max_depth: u32) -> String {
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            let error = CrawlerError::Runtime(format!("failed to start runtime: {}", e));
            return failure(url, &error, true);
        }
    };

    runtime.block_on(web_crawling_tool(url, max_depth))
}

fn failure(url: &str, error: &CrawlerError, pretty: bool) -> String {
    tracing::error!("Crawling failed for {}: {}", url, error);
    ErrorEnvelope::new(url, error).to_json(pretty)
}
