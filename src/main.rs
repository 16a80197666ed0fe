//! site-census main entry point
//!
//! This is the command-line interface for the single-domain link census.

use anyhow::Context;
use clap::Parser;
use site_census::config::{load_config, Config};
use site_census::crawler::{Coordinator, CrawlOutcome};
use site_census::output::{print_report, print_statistics};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// site-census: count the internal links of a website
///
/// Crawls every page reachable through anchor tags from the root of DOMAIN,
/// then prints each internal URL with the number of times it was linked,
/// shortest URLs first.
#[derive(Parser, Debug)]
#[command(name = "site-census")]
#[command(version)]
#[command(about = "Count the internal links of a website", long_about = None)]
struct Cli {
    /// Domain or root URL to crawl (https is assumed when no scheme is given)
    #[arg(value_name = "DOMAIN")]
    domain: String,

    /// Number of concurrent fetch workers [default: 4]
    #[arg(short, long, value_name = "N")]
    threads: Option<usize>,

    /// Path to a TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Print crawl statistics after the results
    #[arg(long)]
    summary: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("failed to load configuration from {}", path.display()))?
        }
        None => Config::default(),
    };

    if let Some(threads) = cli.threads {
        config.crawler.workers = threads;
    }

    let mut coordinator = Coordinator::with_config(&cli.domain, &config)
        .with_context(|| format!("failed to create crawler for {}", cli.domain))?;

    let cancel = CancellationToken::new();
    tokio::spawn(cancel_on_signal(cancel.clone()));

    let outcome = coordinator.run(cancel).await.context("crawl failed")?;

    match outcome {
        CrawlOutcome::SpaDetected => {
            tracing::info!("SPA website detected, links cannot be crawled from static HTML");
            return Ok(());
        }
        CrawlOutcome::Cancelled => {
            tracing::warn!("Crawl interrupted, printing partial results");
        }
        CrawlOutcome::Completed => {
            tracing::info!("Crawl completed successfully");
        }
    }

    print_report(coordinator.results());

    if cli.summary {
        print_statistics(coordinator.stats());
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_census=info,warn"),
            1 => EnvFilter::new("site_census=debug,info"),
            2 => EnvFilter::new("site_census=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Cancels the crawl on Ctrl-C, or SIGTERM on Unix
async fn cancel_on_signal(cancel: CancellationToken) {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    result = tokio::signal::ctrl_c() => {
                        if let Err(e) = result {
                            tracing::warn!("Failed to listen for Ctrl-C: {}", e);
                            return;
                        }
                    }
                    _ = terminate.recv() => {}
                }
            }
            Err(e) => {
                tracing::warn!("Failed to listen for SIGTERM: {}", e);
                if tokio::signal::ctrl_c().await.is_err() {
                    return;
                }
            }
        }
    }

    #[cfg(not(unix))]
    {
        if tokio::signal::ctrl_c().await.is_err() {
            return;
        }
    }

    tracing::info!("Interrupt received, stopping crawl");
    cancel.cancel();
}
