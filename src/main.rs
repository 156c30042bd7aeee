//! Leadsift main entry point
//!
//! Command-line interface for the Leadsift business-site contact crawler.

use anyhow::Context;
use clap::Parser;
use leadsift::config::{load_config_with_hash, Config};
use leadsift::output::JsonlSink;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Leadsift: a contact-signal crawler for small-business websites
///
/// Leadsift fetches each configured seed site's homepage plus a handful of
/// relevant internal pages, extracts visible text and contact identifiers,
/// filters parked placeholder domains, and appends one JSON record per
/// seed to the results file.
#[derive(Parser, Debug)]
#[command(name = "leadsift")]
#[command(version = "1.0.0")]
#[command(about = "A contact-signal crawler for business websites", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without fetching
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_crawl(config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("leadsift=info,warn"),
            1 => EnvFilter::new("leadsift=debug,info"),
            2 => EnvFilter::new("leadsift=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows what would run
fn handle_dry_run(config: &Config) {
    println!("=== Leadsift Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Max concurrency: {}", config.crawler.max_concurrency);
    println!("  Max subpages per site: {}", config.crawler.max_subpages);

    println!("\nFetcher:");
    println!(
        "  Request timeout: {}s (connect {}s)",
        config.fetcher.request_timeout_secs, config.fetcher.connect_timeout_secs
    );
    println!("  Max redirects: {}", config.fetcher.max_redirects);
    println!(
        "  Accept invalid certs: {}",
        config.fetcher.accept_invalid_certs
    );

    println!("\nOutput:");
    println!("  Results file: {}", config.output.results_path);

    println!("\nSeed Sites ({}):", config.start_urls.len());
    for seed in &config.start_urls {
        println!("  - {}", seed.url());
    }

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would crawl {} seed sites with up to {} in flight",
        config.start_urls.len(),
        config.crawler.max_concurrency
    );
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config) -> anyhow::Result<()> {
    let results_path = config.output.results_path.clone();
    let sink = Arc::new(
        JsonlSink::create(Path::new(&results_path))
            .with_context(|| format!("failed to open results file {}", results_path))?,
    );

    tracing::info!(
        "Crawling {} seed sites (max {} in flight)",
        config.start_urls.len(),
        config.crawler.max_concurrency
    );

    let start = std::time::Instant::now();
    let stats = leadsift::crawl(config, sink).await?;

    tracing::info!(
        "Crawl completed: {} sites ({} ok, {} failed) in {:?}",
        stats.total,
        stats.ok,
        stats.failed,
        start.elapsed()
    );
    println!(
        "✓ {} sites processed ({} ok, {} failed), results in {}",
        stats.total, stats.ok, stats.failed, results_path
    );

    Ok(())
}
