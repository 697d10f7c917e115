//! URL handling module
//!
//! This module provides URL normalization, domain extraction and the link
//! admissibility check that keeps a crawl on one host.

mod domain;
mod filter;
mod normalize;

use crate::UrlError;
use url::Url;

// Re-export main functions
pub use domain::{extract_authority, extract_domain};
pub use filter::{is_valid_url, EXCLUDED_EXTENSIONS};
pub use normalize::normalize_url;

/// Validates a crawl start URL
///
/// Unlike discovered links, which are silently filtered, a bad start URL means
/// no crawl can be built at all, so the reason is reported as an error.
///
/// # Returns
///
/// * `Ok(Url)` - The normalized start URL
/// * `Err(UrlError)` - The URL is malformed, not HTTP(S), or has no host
pub fn validate_start_url(url_str: &str) -> Result<Url, UrlError> {
    let url = normalize_url(url_str)?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(UrlError::MissingDomain),
    }
}
