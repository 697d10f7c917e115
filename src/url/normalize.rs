use crate::UrlError;
use url::Url;

/// Normalizes a URL into its canonical crawl form
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Lowercase the scheme and host
/// 3. Remove fragment (everything after #)
///
/// Path, query and params are left as they are, so two URLs differing only by
/// fragment or by the case of their host normalize to the same string. The
/// `url` crate already lowercases the host of special schemes; hosts of other
/// schemes are lowercased explicitly. Normalization is idempotent.
///
/// Parsing follows the WHATWG URL rules, so dot segments in the path are
/// resolved and unsafe characters percent-encoded (`/a/../b` becomes `/b`).
///
/// # Arguments
///
/// * `url_str` - The URL string to normalize
///
/// # Returns
///
/// * `Ok(Url)` - Normalized URL
/// * `Err(UrlError)` - Failed to parse or normalize the URL
///
/// # Examples
///
/// ```
/// use site_crawler::url::normalize_url;
///
/// let url = normalize_url("HTTPS://EXAMPLE.COM/Page?b=2#top").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/Page?b=2");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let mut url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if let Some(host) = url.host_str() {
        let lowered = host.to_lowercase();
        if lowered != host {
            url.set_host(Some(&lowered))
                .map_err(|e| UrlError::Malformed(format!("Failed to set host: {}", e)))?;
        }
    }

    url.set_fragment(None);

    Ok(url)
}
