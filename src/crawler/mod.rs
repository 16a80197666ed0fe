//! Crawler module for web page fetching and crawl coordination
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching and anchor extraction
//! - The intake loop that deduplicates and counts discovered links
//! - The fixed pool of fetch workers
//! - Pending-work tracking for quiescence detection
//! - Up-front single-page application detection
//! - Overall crawl coordination

mod coordinator;
mod errors;
mod fetcher;
mod frontier;
mod parser;
mod pending;
mod spa;
mod worker;

pub use coordinator::{Coordinator, CrawlOutcome};
pub use errors::ErrorSink;
pub use fetcher::{build_http_client, fetch_anchors, Fetcher, HttpFetcher, Page};
pub use frontier::{Discovery, Frontier};
pub use parser::extract_anchor_hrefs;
pub use pending::PendingWork;
pub use spa::{detect_spa, looks_like_spa};

use crate::config::Config;
use crate::CrawlError;
use std::collections::HashMap;
use tokio_util::sync::CancellationToken;

/// Runs a complete crawl of `domain` over HTTP
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Canonicalize the domain and build the HTTP client
/// 2. Check the root page for single-page application markers
/// 3. Crawl every reachable in-domain page with the configured workers
/// 4. Return the outcome together with the URL → count table
///
/// # Arguments
///
/// * `domain` - The domain or root URL to crawl
/// * `config` - The crawler configuration
/// * `cancel` - Token that ends the crawl early when cancelled
pub async fn crawl(
    domain: &str,
    config: &Config,
    cancel: CancellationToken,
) -> Result<(CrawlOutcome, HashMap<String, u64>), CrawlError> {
    let mut coordinator = Coordinator::with_config(domain, config)?;
    let outcome = coordinator.run(cancel).await?;
    Ok((outcome, coordinator.results().clone()))
}
