use super::domain::extract_authority;
use url::Url;

/// Path extensions of static assets that never carry crawlable content
pub const EXCLUDED_EXTENSIONS: &[&str] = &[
    ".jpg", ".jpeg", ".png", ".gif", ".css", ".js", ".ico", ".svg",
];

/// Checks whether a discovered link may be followed
///
/// A link is rejected when:
/// - it does not parse, or has no host
/// - its scheme is not `http` or `https`
/// - `base_domain` is given and the link's authority differs (case-insensitive)
/// - its path ends with one of [`EXCLUDED_EXTENSIONS`]
///
/// This never panics; every failure is reported as `false`.
///
/// # Examples
///
/// ```
/// use site_crawler::url::is_valid_url;
///
/// assert!(is_valid_url("https://example.com/about", Some("example.com")));
/// assert!(!is_valid_url("https://other.org/about", Some("example.com")));
/// assert!(!is_valid_url("https://example.com/logo.PNG", None));
/// ```
pub fn is_valid_url(url_str: &str, base_domain: Option<&str>) -> bool {
    let url = match Url::parse(url_str) {
        Ok(url) => url,
        Err(_) => return false,
    };

    if url.scheme() != "http" && url.scheme() != "https" {
        return false;
    }

    let authority = match extract_authority(&url) {
        Some(authority) if !authority.is_empty() => authority,
        _ => return false,
    };

    if let Some(base) = base_domain {
        if !authority.eq_ignore_ascii_case(base) {
            return false;
        }
    }

    !has_excluded_extension(url.path())
}

fn has_excluded_extension(path: &str) -> bool {
    let path = path.to_ascii_lowercase();
    EXCLUDED_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}
