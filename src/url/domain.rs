use url::Url;

/// Extracts the domain from a URL
///
/// This function retrieves the host portion of a URL and converts it to lowercase.
/// If the URL has no host (e.g. `mailto:` or `data:` URLs), it returns None.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use site_crawler::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Extracts the authority (`host[:port]`) used to scope a crawl
///
/// The port is only included when it differs from the scheme's default, so
/// `https://example.com:443/` and `https://example.com/` share an authority
/// while two servers on the same host but different ports do not.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use site_crawler::url::extract_authority;
///
/// let url = Url::parse("http://127.0.0.1:8080/page").unwrap();
/// assert_eq!(extract_authority(&url), Some("127.0.0.1:8080".to_string()));
///
/// let url = Url::parse("https://Example.com:443/").unwrap();
/// assert_eq!(extract_authority(&url), Some("example.com".to_string()));
/// ```
pub fn extract_authority(url: &Url) -> Option<String> {
    let domain = extract_domain(url)?;
    match url.port() {
        Some(port) => Some(format!("{}:{}", domain, port)),
        None => Some(domain),
    }
}
