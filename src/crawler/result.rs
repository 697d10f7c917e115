//! Crawl result tree and run envelope

use crate::extract::Metadata;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::sync::atomic::{AtomicU64, Ordering};

/// Sentinel used for both `error` and `extracted_text` of revisited URLs
pub const ALREADY_VISITED: &str = "Already visited";

static CRAWL_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// One visited URL and the pages followed from it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrawlResult {
    /// Canonical URL, unique within a run (revisit sentinels aside)
    pub url: String,

    /// Link-hops from the start URL
    pub depth: u32,

    /// Declared MIME type; empty when the fetch failed
    pub content_type: String,

    pub metadata: Metadata,

    pub extracted_text: String,

    /// Children in the order their links were discovered
    pub links: Vec<CrawlResult>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CrawlResult {
    /// Terminal node for a URL already seen in this run
    pub fn already_visited(url: impl Into<String>, depth: u32) -> Self {
        Self {
            url: url.into(),
            depth,
            content_type: String::new(),
            metadata: Metadata::default(),
            extracted_text: ALREADY_VISITED.to_string(),
            links: Vec::new(),
            error: Some(ALREADY_VISITED.to_string()),
        }
    }

    /// Terminal node for a URL that could not be fetched
    pub fn failed(url: impl Into<String>, depth: u32, error: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            depth,
            content_type: String::new(),
            metadata: Metadata::default(),
            extracted_text: String::new(),
            links: Vec::new(),
            error: Some(error.into()),
        }
    }

    pub fn is_already_visited(&self) -> bool {
        self.error.as_deref() == Some(ALREADY_VISITED)
    }

    /// True when this node carries a real failure (not a revisit)
    pub fn is_error(&self) -> bool {
        self.error.is_some() && !self.is_already_visited()
    }

    /// Iterates over this node and all descendants, depth-first, pre-order
    pub fn iter(&self) -> Iter<'_> {
        Iter { stack: vec![self] }
    }
}

/// Pre-order iterator over a [`CrawlResult`] tree
pub struct Iter<'a> {
    stack: Vec<&'a CrawlResult>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a CrawlResult;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.links.iter().rev());
        Some(node)
    }
}

/// A finished crawl, ready for serialization
#[derive(Debug, Clone, Serialize)]
pub struct CrawlRun {
    pub crawl_id: String,
    pub start_url: String,
    /// UTC, ISO-8601 with a trailing `Z`
    pub crawl_timestamp: String,
    pub max_depth: u32,
    pub data: CrawlResult,
}

/// Builds a crawl id from the start time and a hash of the start URL
///
/// Format: `crawl_{unix_millis}_{hash}_{seq}`, where `hash` is the first
/// `hash_len` hex characters of the SHA-256 of `start_url` and `seq` is a
/// process-wide counter, so two runs started in the same millisecond for the
/// same URL still get distinct ids.
pub fn generate_crawl_id(start_url: &str, started_at: DateTime<Utc>, hash_len: usize) -> String {
    let digest = hex::encode(Sha256::digest(start_url.as_bytes()));
    let hash_len = hash_len.clamp(1, digest.len());
    let seq = CRAWL_SEQUENCE.fetch_add(1, Ordering::Relaxed);

    format!(
        "crawl_{}_{}_{}",
        started_at.timestamp_millis(),
        &digest[..hash_len],
        seq
    )
}

/// Formats a timestamp as ISO-8601 UTC with microseconds and a `Z` suffix
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}
