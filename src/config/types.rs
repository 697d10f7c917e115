use serde::Deserialize;

/// Browser-like User-Agent; some sites reject unidentified clients
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Main configuration structure
///
/// Every section is optional in the TOML file and falls back to its defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub extraction: ExtractionConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Maximum link-hops from the start URL (0 = start page only)
    pub max_depth: u32,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Maximum number of links followed from a single page
    pub max_links_per_page: usize,

    /// Pause after each child fetch (milliseconds)
    pub request_delay_ms: u64,

    /// Number of hex characters of the start URL hash used in crawl ids
    pub crawl_id_hash_length: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: 2,
            timeout_secs: 30,
            max_links_per_page: 50,
            request_delay_ms: 500,
            crawl_id_hash_length: 8,
        }
    }
}

/// User agent configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// The full User-Agent header value
    pub value: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            value: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Document format switches
///
/// A format that is compiled out (see the `pdf` and `docx` Cargo features)
/// stays unavailable even when enabled here.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    pub pdf: bool,
    pub docx: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            pdf: true,
            docx: true,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// File to write the result to; stdout when absent
    pub path: Option<String>,

    /// Pretty-print JSON output
    pub pretty: bool,

    /// Output format
    pub format: OutputFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: None,
            pretty: true,
            format: OutputFormat::Json,
        }
    }
}

/// Rendering of a finished crawl
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Markdown,
}
