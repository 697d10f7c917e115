//! Markdown report generation
//!
//! This module renders a crawl run as a human-readable markdown outline:
//! run information, statistics, and the page tree with titles, content
//! types, errors and a short excerpt of each page's text.

use crate::crawler::{CrawlResult, CrawlRun};
use crate::output::stats::CrawlStatistics;
use crate::CrawlerError;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Maximum number of characters of extracted text shown per page
const EXCERPT_CHARS: usize = 200;

/// Writes the markdown report for a run to a file
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote the report
/// * `Err(CrawlerError)` - Failed to write the file
pub fn write_markdown_report(run: &CrawlRun, output_path: &Path) -> Result<(), CrawlerError> {
    let markdown = render_markdown(run);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a crawl run as markdown
pub fn render_markdown(run: &CrawlRun) -> String {
    let stats = CrawlStatistics::from_result(&run.data);
    let mut md = String::new();

    md.push_str("# Crawl Report\n\n");

    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Crawl ID**: {}\n", run.crawl_id));
    md.push_str(&format!("- **Start URL**: {}\n", run.start_url));
    md.push_str(&format!("- **Timestamp**: {}\n", run.crawl_timestamp));
    md.push_str(&format!("- **Max Depth**: {}\n\n", run.max_depth));

    md.push_str("## Statistics\n\n");
    md.push_str("| Metric | Count |\n");
    md.push_str("|--------|-------|\n");
    md.push_str(&format!("| Total nodes | {} |\n", stats.total_nodes));
    md.push_str(&format!("| Pages fetched | {} |\n", stats.pages_fetched));
    md.push_str(&format!("| Already visited | {} |\n", stats.already_visited));
    md.push_str(&format!("| Errors | {} |\n", stats.errors));
    md.push_str(&format!("| Deepest depth | {} |\n\n", stats.deepest_depth));

    if !stats.pages_by_kind.is_empty() {
        md.push_str("| Content Type | Pages |\n");
        md.push_str("|--------------|-------|\n");
        for (kind, count) in &stats.pages_by_kind {
            md.push_str(&format!("| {} | {} |\n", kind, count));
        }
        md.push('\n');
    }

    md.push_str("## Pages\n\n");
    for node in run.data.iter() {
        push_node(&mut md, node);
    }

    md
}

fn push_node(md: &mut String, node: &CrawlResult) {
    let indent = "  ".repeat(node.depth as usize);
    let title = node.metadata.title.as_deref().unwrap_or(&node.url);

    md.push_str(&format!("{}- **{}** <{}>\n", indent, escape(title), node.url));

    if node.is_already_visited() {
        md.push_str(&format!("{}  - _already visited_\n", indent));
        return;
    }

    if let Some(error) = &node.error {
        md.push_str(&format!("{}  - Error: {}\n", indent, escape(error)));
        return;
    }

    if !node.content_type.is_empty() {
        md.push_str(&format!("{}  - Type: `{}`\n", indent, node.content_type));
    }

    if let Some(description) = &node.metadata.description {
        md.push_str(&format!("{}  - Description: {}\n", indent, escape(description)));
    }

    let excerpt = excerpt(&node.extracted_text);
    if !excerpt.is_empty() {
        md.push_str(&format!("{}  - {}\n", indent, escape(&excerpt)));
    }
}

/// First `EXCERPT_CHARS` characters on one line, with an ellipsis if cut
fn excerpt(text: &str) -> String {
    let flat: String = text.split_whitespace().collect::<Vec<_>>().join(" ");

    if flat.chars().count() <= EXCERPT_CHARS {
        flat
    } else {
        let cut: String = flat.chars().take(EXCERPT_CHARS).collect();
        format!("{}...", cut.trim_end())
    }
}

/// Escapes characters that would otherwise start markdown emphasis or links
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '*' | '_' | '`' | '[' | ']' | '<' | '>') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
