//! Output module for serializing crawl results and reports
//!
//! This module handles:
//! - Serializing a crawl run to JSON
//! - The error envelope emitted when a crawl cannot run at all
//! - Agent-facing entry points that always return a JSON string
//! - Markdown reports and crawl statistics

mod markdown;
pub mod stats;
mod tool;

pub use markdown::{render_markdown, write_markdown_report};
pub use stats::{print_statistics, CrawlStatistics};
pub use tool::{crawl_to_json, web_crawling_tool, web_crawling_tool_blocking};

use crate::config::OutputFormat;
use crate::crawler::{format_timestamp, CrawlRun};
use crate::CrawlerError;
use chrono::Utc;
use serde::Serialize;
use std::fmt;

/// Serializes a crawl run to JSON
///
/// # Arguments
///
/// * `run` - The finished crawl
/// * `pretty` - Indent the output for humans
pub fn to_json(run: &CrawlRun, pretty: bool) -> Result<String, CrawlerError> {
    let json = if pretty {
        serde_json::to_string_pretty(run)?
    } else {
        serde_json::to_string(run)?
    };
    Ok(json)
}

/// Renders a crawl run in the requested output format
pub fn render(run: &CrawlRun, format: OutputFormat, pretty: bool) -> Result<String, CrawlerError> {
    match format {
        OutputFormat::Json => to_json(run, pretty),
        OutputFormat::Markdown => Ok(render_markdown(run)),
    }
}

/// Top-level failure report; carries no `data`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorEnvelope {
    pub error: String,
    pub url: String,
    pub timestamp: String,
}

impl ErrorEnvelope {
    pub fn new(url: &str, error: &dyn fmt::Display) -> Self {
        Self {
            error: format!("Crawling failed: {}", error),
            url: url.to_string(),
            timestamp: format_timestamp(Utc::now()),
        }
    }

    /// Serializes the envelope; never fails
    pub fn to_json(&self, pretty: bool) -> String {
        let value = serde_json::json!({
            "error": self.error,
            "url": self.url,
            "timestamp": self.timestamp,
        });

        if pretty {
            serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
        } else {
            value.to_string()
        }
    }
}
