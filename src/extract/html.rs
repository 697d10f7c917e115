//! HTML parser for extracting text, metadata and links
//!
//! This module handles parsing HTML content to extract:
//! - Visible text, with `<script>` and `<style>` content skipped
//! - Page title, description and keywords
//! - Links to follow (from `<a href>` tags)

use super::Metadata;
use scraper::{Html, Selector};
use url::Url;

/// Elements whose text content is never part of the page text
const SKIPPED_ELEMENTS: &[&str] = &["script", "style"];

/// Extracted information from an HTML page
#[derive(Debug, Clone, Default)]
pub struct ParsedPage {
    /// Visible text collapsed to single spaces
    pub text: String,

    /// Title, description and keywords, when present
    pub metadata: Metadata,

    /// All links found on the page (absolute URLs, discovery order)
    pub links: Vec<String>,
}

/// Parses HTML content and extracts text, metadata and links
///
/// # Link Extraction Rules
///
/// **Include:**
/// - every `<a href="...">`, resolved against the page's base URL
///   (the `<base href>` element when present, otherwise `page_url`)
///
/// **Exclude:**
/// - `javascript:`, `mailto:`, `tel:` links
/// - Data URIs
/// - Fragment-only and empty hrefs
/// - Non-HTTP(S) URLs after resolution
///
/// Duplicates are kept; the crawl driver's visited set takes care of them.
///
/// # Example
///
/// ```
/// use site_crawler::extract::parse_html;
/// use url::Url;
///
/// let html = r#"<html><head><title>Test</title></head><body><a href="/page">Link</a></body></html>"#;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// let parsed = parse_html(html, &base_url);
/// assert_eq!(parsed.metadata.title, Some("Test".to_string()));
/// assert_eq!(parsed.links, vec!["https://example.com/page".to_string()]);
/// ```
pub fn parse_html(html: &str, page_url: &Url) -> ParsedPage {
    let document = Html::parse_document(html);
    let base_url = resolve_base_url(&document, page_url);

    ParsedPage {
        text: extract_text(&document),
        metadata: extract_metadata(&document),
        links: extract_links(&document, &base_url),
    }
}

/// Collects all text nodes outside skipped elements into single-spaced text
fn extract_text(document: &Html) -> String {
    let mut words: Vec<&str> = Vec::new();

    for node in document.root_element().descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };

        let skipped = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .map_or(false, |element| SKIPPED_ELEMENTS.contains(&element.name()))
        });

        if !skipped {
            words.extend(text.split_whitespace());
        }
    }

    words.join(" ")
}

fn extract_metadata(document: &Html) -> Metadata {
    let mut metadata = Metadata {
        title: extract_title(document),
        ..Metadata::default()
    };

    if let Some(description) = meta_content(document, "description") {
        metadata.description = Some(description);
    }

    if let Some(keywords) = meta_content(document, "keywords") {
        let keywords: Vec<String> = keywords
            .split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .collect();

        if !keywords.is_empty() {
            metadata.keywords = Some(keywords);
        }
    }

    metadata
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Returns the trimmed `content` of the first `<meta name=...>` with the given name
fn meta_content(document: &Html, name: &str) -> Option<String> {
    let meta_selector = Selector::parse("meta[name]").ok()?;

    document
        .select(&meta_selector)
        .find(|element| {
            element
                .value()
                .attr("name")
                .map_or(false, |n| n.trim().eq_ignore_ascii_case(name))
        })
        .and_then(|element| element.value().attr("content"))
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty())
}

/// Picks the URL relative links are resolved against
fn resolve_base_url(document: &Html, page_url: &Url) -> Url {
    let Ok(base_selector) = Selector::parse("base[href]") else {
        return page_url.clone();
    };

    document
        .select(&base_selector)
        .next()
        .and_then(|element| element.value().attr("href"))
        .and_then(|href| page_url.join(href.trim()).ok())
        .unwrap_or_else(|| page_url.clone())
}

/// Extracts all valid links from the HTML document
fn extract_links(document: &Html, base_url: &Url) -> Vec<String> {
    let mut links = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if let Some(href) = element.value().attr("href") {
                if let Some(absolute_url) = resolve_link(href, base_url) {
                    links.push(absolute_url);
                }
            }
        }
    }

    links
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if lowered.starts_with("javascript:")
        || lowered.starts_with("mailto:")
        || lowered.starts_with("tel:")
        || lowered.starts_with("data:")
    {
        return None;
    }

    // Same page anchors
    if href.starts_with('#') {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) => {
            if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
                Some(absolute_url.to_string())
            } else {
                None
            }
        }
        Err(e) => {
            tracing::debug!("Failed to resolve link '{}' against {}: {}", href, base_url, e);
            None
        }
    }
}
