//! Linkloom main entry point
//!
//! Command-line interface for the linkloom web crawler.

use anyhow::Context;
use clap::Parser;
use linkloom::config::{load_config_with_hash, Config};
use linkloom::crawler::crawl;
use linkloom::state::PageStatus;
use linkloom::storage::{PageStore, SqliteStore};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Linkloom: a bounded-concurrency web crawler
///
/// Crawls the link graph reachable from the configured seed URLs up to a
/// fixed depth, persisting page content and link edges to SQLite.
#[derive(Parser, Debug)]
#[command(name = "linkloom")]
#[command(version)]
#[command(about = "A bounded-concurrency web crawler", long_about = None)]
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

    /// Validate config and show what would be crawled without crawling
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show statistics from the database and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.stats {
        handle_stats(&config)?;
    } else {
        handle_crawl(config).await?;
    }

    Ok(())
}

/// Sets up the tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("linkloom=info,warn"),
            1 => EnvFilter::new("linkloom=debug,info"),
            2 => EnvFilter::new("linkloom=trace,debug"),
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

/// Handles --dry-run: validates config and shows the crawl plan
fn handle_dry_run(config: &Config) {
    println!("=== Linkloom Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Max depth: {}", config.crawler.max_depth);
    println!("  Workers: {}", config.crawler.num_workers);
    println!("  Frontier capacity: {}", config.crawler.frontier_capacity);
    println!("  Fetch timeout: {}ms", config.crawler.fetch_timeout_ms);
    println!(
        "  Politeness delay: {}ms",
        config.crawler.politeness_delay_ms
    );

    println!("\nUser Agent:");
    println!("  Name: {}", config.user_agent.crawler_name);
    println!("  Version: {}", config.user_agent.crawler_version);
    println!("  Contact URL: {}", config.user_agent.contact_url);
    println!("  Contact Email: {}", config.user_agent.contact_email);

    println!("\nOutput:");
    println!("  Database: {}", config.output.database_path);

    println!("\nSeed URLs ({}):", config.crawler.seed_urls.len());
    for seed in &config.crawler.seed_urls {
        println!("  - {}", seed);
    }

    println!("\n✓ Configuration is valid");
}

/// Handles --stats: shows statistics from the database
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    let store = SqliteStore::open(Path::new(&config.output.database_path))
        .with_context(|| format!("failed to open {}", config.output.database_path))?;

    println!("Database: {}\n", config.output.database_path);
    println!("Total URLs: {}", store.count_urls()?);
    for status in PageStatus::ALL {
        println!("  {}: {}", status, store.count_by_status(status)?);
    }
    println!("Edges: {}", store.count_edges()?);

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config) -> anyhow::Result<()> {
    tracing::info!(
        "Starting crawl: {} seeds, max depth {}, {} workers",
        config.crawler.seed_urls.len(),
        config.crawler.max_depth,
        config.crawler.num_workers
    );

    let summary = crawl(config).await.context("crawl failed")?;

    println!("Crawl finished in {:?}", summary.elapsed);
    println!("  URLs recorded: {}", summary.total_urls);
    println!("  Crawled: {}", summary.crawled);
    println!("  Failed: {}", summary.failed);
    println!("  Edges: {}", summary.edges);

    Ok(())
}
