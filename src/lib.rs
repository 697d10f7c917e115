//! Site Crawler: a depth-bounded, domain-scoped web content extractor
//!
//! This crate crawls a website recursively from a start URL, stays on the
//! start URL's host, extracts plain text and metadata from HTML, PDF, DOCX
//! and plain-text resources, and returns the visited pages as a nested tree
//! serialized to JSON.
//!
//! # Example
//!
//! ```no_run
//! use site_crawler::{crawl_website, Config};
//!
//! # async fn example() -> Result<(), site_crawler::CrawlerError> {
//! let mut config = Config::default();
//! config.crawler.max_depth = 1;
//! let run = crawl_website("https://example.com", &config).await?;
//! println!("{}", run.data.links.len());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod crawler;
pub mod extract;
pub mod output;
pub mod url;

use thiserror::Error;

/// Main error type for crawler operations
#[derive(Debug, Error)]
pub enum CrawlerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Runtime error: {0}")]
    Runtime(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,

    #[error("Malformed URL: {0}")]
    Malformed(String),
}

/// Result type alias for crawler operations
pub type Result<T> = std::result::Result<T, CrawlerError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{crawl_website, CrawlResult, CrawlRun, WebCrawler};
pub use extract::{Capabilities, ContentKind, Extractor};
pub use output::{web_crawling_tool, web_crawling_tool_blocking};
pub use crate::url::{extract_authority, extract_domain, is_valid_url, normalize_url};
