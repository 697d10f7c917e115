//! Site Crawler main entry point
//!
//! This is the command-line interface for the site crawler.

use anyhow::Context;
use clap::Parser;
use site_crawler::config::{load_config_with_hash, validate, Config, OutputFormat};
use site_crawler::crawl_website;
use site_crawler::output::{
    print_statistics, render, write_markdown_report, CrawlStatistics, ErrorEnvelope,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Request delays below this are allowed but impolite to most servers
const POLITE_DELAY_MS: u64 = 500;

/// Site Crawler: a depth-bounded, domain-scoped content extractor
///
/// Crawls a website from a start URL, stays on that URL's host, extracts
/// text and metadata from HTML, PDF, DOCX and plain-text resources, and
/// prints the visited pages as a nested JSON tree.
#[derive(Parser, Debug)]
#[command(name = "site-crawler")]
#[command(version = "1.0.0")]
#[command(about = "A depth-bounded, domain-scoped web content extractor", long_about = None)]
struct Cli {
    /// URL to start crawling from
    #[arg(value_name = "URL")]
    url: String,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Maximum link-hops from the start URL
    #[arg(short = 'd', long)]
    max_depth: Option<u32>,

    /// Per-request timeout in seconds
    #[arg(short, long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Maximum links followed from each page
    #[arg(long)]
    max_links: Option<usize>,

    /// Pause after each child page, in milliseconds
    #[arg(long, value_name = "MS")]
    delay_ms: Option<u64>,

    /// Write output to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Emit compact JSON
    #[arg(long)]
    compact: bool,

    /// Print crawl statistics to stderr after the crawl
    #[arg(long)]
    stats: bool,

    /// Show the effective settings without crawling
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = load_effective_config(&cli)?;

    if cli.dry_run {
        handle_dry_run(&cli.url, &config);
        return Ok(ExitCode::SUCCESS);
    }

    handle_crawl(&cli.url, &config, cli.stats).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr; stdout carries the crawl output.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_crawler=info,warn"),
            1 => EnvFilter::new("site_crawler=debug,info"),
            2 => EnvFilter::new("site_crawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file (if any) and applies command-line overrides
fn load_effective_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(max_depth) = cli.max_depth {
        config.crawler.max_depth = max_depth;
    }
    if let Some(timeout) = cli.timeout {
        config.crawler.timeout_secs = timeout;
    }
    if let Some(max_links) = cli.max_links {
        config.crawler.max_links_per_page = max_links;
    }
    if let Some(delay_ms) = cli.delay_ms {
        config.crawler.request_delay_ms = delay_ms;
    }
    if let Some(output) = &cli.output {
        config.output.path = Some(output.display().to_string());
    }
    if let Some(format) = cli.format {
        config.output.format = format;
    }
    if cli.compact {
        config.output.pretty = false;
    }

    validate(&config).context("invalid settings")?;

    if config.crawler.request_delay_ms < POLITE_DELAY_MS {
        tracing::warn!(
            "Request delay of {}ms is below the recommended {}ms",
            config.crawler.request_delay_ms,
            POLITE_DELAY_MS
        );
    }

    Ok(config)
}

/// Handles the --dry-run mode: shows what would be crawled
fn handle_dry_run(url: &str, config: &Config) {
    println!("=== Site Crawler Dry Run ===\n");

    println!("Start URL: {}", url);

    println!("\nCrawler Configuration:");
    println!("  Max depth: {}", config.crawler.max_depth);
    println!("  Timeout: {}s", config.crawler.timeout_secs);
    println!("  Max links per page: {}", config.crawler.max_links_per_page);
    println!("  Request delay: {}ms", config.crawler.request_delay_ms);

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.value);

    println!("\nExtraction:");
    println!("  PDF: {}", config.extraction.pdf);
    println!("  DOCX: {}", config.extraction.docx);

    println!("\nOutput:");
    println!("  Format: {:?}", config.output.format);
    println!("  Pretty: {}", config.output.pretty);
    println!(
        "  Destination: {}",
        config.output.path.as_deref().unwrap_or("stdout")
    );

    match site_crawler::url::validate_start_url(url) {
        Ok(start) => println!("\n✓ Would start crawling at {}", start),
        Err(e) => println!("\n✗ Start URL rejected: {}", e),
    }
}

/// Handles the main crawl operation
async fn handle_crawl(url: &str, config: &Config, show_stats: bool) -> anyhow::Result<ExitCode> {
    let pretty = config.output.pretty;

    let run = match crawl_website(url, config).await {
        Ok(run) => run,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            emit(&ErrorEnvelope::new(url, &e).to_json(pretty), config.output.path.as_deref())?;
            return Ok(ExitCode::FAILURE);
        }
    };

    if show_stats {
        print_statistics(&CrawlStatistics::from_result(&run.data));
    }

    match (config.output.format, config.output.path.as_deref()) {
        (OutputFormat::Markdown, Some(path)) => {
            write_markdown_report(&run, Path::new(path))
                .with_context(|| format!("failed to write {}", path))?;
            tracing::info!("Markdown report written to: {}", path);
        }
        (format, path) => emit(&render(&run, format, pretty)?, path)?,
    }

    Ok(ExitCode::SUCCESS)
}

/// Writes output to the configured file, or stdout when none is set
fn emit(content: &str, path: Option<&str>) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            std::fs::write(Path::new(path), content)
                .with_context(|| format!("failed to write {}", path))?;
            tracing::info!("Output written to: {}", path);
        }
        None => println!("{}", content),
    }
    Ok(())
}
