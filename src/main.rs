//! Site-Discovery main entry point
//!
//! This is the command-line interface for the Site-Discovery URL extractor.

use anyhow::Context;
use clap::Parser;
use site_discovery::config::{load_config_with_hash, Config};
use site_discovery::output::{render, write_report, ExtractionReport, OutputFormat};
use site_discovery::telemetry::TracingTelemetry;
use site_discovery::{ExtractionRequest, Extractor, Phase};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Site-Discovery: a polite same-domain URL extractor
///
/// Site-Discovery lists the URLs of one website. Sitemaps are read first;
/// when they yield nothing the site is crawled breadth-first, respecting
/// robots.txt and a delay between requests.
#[derive(Parser, Debug)]
#[command(name = "site-discovery")]
#[command(version = "1.0.0")]
#[command(about = "A polite same-domain URL extractor", long_about = None)]
struct Cli {
    /// Site to extract, with or without a scheme
    #[arg(value_name = "URL")]
    url: String,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Maximum number of URLs to discover (1-10000)
    #[arg(long)]
    max_urls: Option<usize>,

    /// Overall timeout in seconds (1-600)
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// User agent sent with every request
    #[arg(long)]
    user_agent: Option<String>,

    /// Delay between crawl requests in milliseconds (0-5000)
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Crawl even when sitemaps produced URLs
    #[arg(long)]
    force_crawl: bool,

    /// Group discovered URLs into page categories
    #[arg(long)]
    categorize: bool,

    /// Report format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Write the report to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Validate settings and show the request without extracting
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    let (config, config_hash) = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (config, Some(hash))
        }
        None => (Config::default(), None),
    };

    let request = build_request(&cli, &config);
    let format = cli.format.unwrap_or(config.output.format);
    let categorize = cli.categorize || config.output.categorize;

    if cli.dry_run {
        handle_dry_run(&request, format, categorize)?;
        return Ok(());
    }

    // Ctrl-C stops the extraction; whatever was found is still reported
    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, finishing with a partial result");
            on_signal.cancel();
        }
    });

    let extractor = Extractor::new()
        .with_telemetry(Arc::new(TracingTelemetry))
        .with_progress(Arc::new(|count: usize, phase: Phase| {
            tracing::debug!("[{}] {} URLs", phase, count);
        }));

    let result = extractor
        .extract_with_cancel(&request, cancel)
        .await
        .with_context(|| format!("Extraction of {} failed", request.seed))?;

    let mut report = ExtractionReport::new(result);
    if categorize {
        report = report.with_categories();
    }
    if let Some(hash) = config_hash {
        report = report.with_config_hash(hash);
    }

    match &cli.output {
        Some(path) => {
            write_report(&report, format, path)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            tracing::info!("Report written to {}", path.display());
        }
        None => print!("{}", render(&report, format)?),
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so stdout carries only the report.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_discovery=info,warn"),
            1 => EnvFilter::new("site_discovery=debug,info"),
            2 => EnvFilter::new("site_discovery=trace,debug"),
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

/// Merges config file values with command-line overrides
fn build_request(cli: &Cli, config: &Config) -> ExtractionRequest {
    let mut request = ExtractionRequest::from_settings(&cli.url, &config.extraction);

    if let Some(max_urls) = cli.max_urls {
        request = request.with_max_urls(max_urls);
    }
    if let Some(timeout) = cli.timeout {
        request = request.with_timeout(Duration::from_secs(timeout));
    }
    if let Some(user_agent) = &cli.user_agent {
        request = request.with_user_agent(user_agent.clone());
    }
    if let Some(delay_ms) = cli.delay_ms {
        request = request.with_delay_ms(delay_ms);
    }
    if cli.force_crawl {
        request = request.with_force_crawl(true);
    }

    request
}

/// Handles the --dry-run mode: validates settings and shows the request
fn handle_dry_run(
    request: &ExtractionRequest,
    format: OutputFormat,
    categorize: bool,
) -> anyhow::Result<()> {
    site_discovery::config::validate_request(request).context("Invalid settings")?;
    let seed = site_discovery::normalize_seed(&request.seed).context("Invalid URL")?;

    println!("=== Site-Discovery Dry Run ===\n");
    println!("Seed: {}", seed);
    println!("  Max URLs: {}", request.max_urls);
    println!("  Timeout: {}s", request.timeout.as_secs());
    println!("  Delay: {}ms", request.delay_ms);
    println!("  User agent: {}", request.user_agent);
    println!("  Force crawl: {}", request.force_crawl);
    println!("\nOutput:");
    println!("  Format: {:?}", format);
    println!("  Categorize: {}", categorize);

    Ok(())
}
