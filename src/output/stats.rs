//! Statistics over a crawl result tree
//!
//! This module provides functionality for summarizing a finished crawl and
//! displaying the numbers on the terminal.

use crate::crawler::CrawlResult;
use crate::extract::ContentKind;
use std::collections::BTreeMap;

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStatistics {
    /// Every node in the tree, revisits and failures included
    pub total_nodes: u64,

    /// Nodes whose resource was fetched and extracted
    pub pages_fetched: u64,

    /// Revisit sentinel nodes
    pub already_visited: u64,

    /// Nodes that failed (bad URL, HTTP error, timeout)
    pub errors: u64,

    /// Largest depth present in the tree
    pub deepest_depth: u32,

    /// Fetched pages by content kind
    pub pages_by_kind: BTreeMap<ContentKind, u64>,

    /// Nodes at each depth
    pub pages_by_depth: BTreeMap<u32, u64>,
}

impl CrawlStatistics {
    /// Walks a result tree and tallies its nodes
    pub fn from_result(root: &CrawlResult) -> Self {
        let mut stats = Self::default();

        for node in root.iter() {
            stats.total_nodes += 1;
            stats.deepest_depth = stats.deepest_depth.max(node.depth);
            *stats.pages_by_depth.entry(node.depth).or_insert(0) += 1;

            if node.is_already_visited() {
                stats.already_visited += 1;
            } else if node.is_error() {
                stats.errors += 1;
            } else {
                stats.pages_fetched += 1;
                let kind = ContentKind::from_content_type(&node.content_type);
                *stats.pages_by_kind.entry(kind).or_insert(0) += 1;
            }
        }

        stats
    }

    /// Share of non-revisit nodes that were fetched successfully, in percent
    pub fn success_rate(&self) -> f64 {
        let attempted = self.pages_fetched + self.errors;
        if attempted == 0 {
            0.0
        } else {
            (self.pages_fetched as f64 / attempted as f64) * 100.0
        }
    }
}

/// Prints statistics to stderr in a formatted manner
///
/// Stdout is reserved for the crawl output itself.
pub fn print_statistics(stats: &CrawlStatistics) {
    eprintln!("=== Crawl Statistics ===\n");

    eprintln!("Overview:");
    eprintln!("  Total nodes: {}", stats.total_nodes);
    eprintln!("  Pages fetched: {}", stats.pages_fetched);
    eprintln!("  Already visited: {}", stats.already_visited);
    eprintln!("  Errors: {}", stats.errors);
    eprintln!("  Deepest depth: {}", stats.deepest_depth);
    eprintln!();

    if !stats.pages_by_kind.is_empty() {
        eprintln!("Pages by Content Type:");
        let mut kind_counts: Vec<_> = stats.pages_by_kind.iter().collect();
        kind_counts.sort_by(|a, b| b.1.cmp(a.1));

        for (kind, count) in kind_counts {
            eprintln!("  {}: {}", kind, count);
        }
        eprintln!();
    }

    eprintln!("Nodes by Depth:");
    for (depth, count) in &stats.pages_by_depth {
        eprintln!("  {}: {}", depth, count);
    }
    eprintln!();

    eprintln!(
        "Success Rate: {:.1}% ({} / {} pages fetched)",
        stats.success_rate(),
        stats.pages_fetched,
        stats.pages_fetched + stats.errors
    );
}
