//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the coordinator that drives one crawl run:
//! - Classifying the root page as a single-page application or not
//! - Spawning the worker pool, the intake loop and the error loop
//! - Seeding the crawl and detecting quiescence
//! - Shutting everything down and collecting the results

use crate::config::{validate, Config, CrawlerConfig};
use crate::crawler::errors::{run_error_loop, ErrorSink};
use crate::crawler::fetcher::{Fetcher, HttpFetcher};
use crate::crawler::frontier::{Frontier, IntakeLoop};
use crate::crawler::pending::PendingWork;
use crate::crawler::spa::detect_spa;
use crate::crawler::worker::{CrawlCounters, Worker};
use crate::output::CrawlStats;
use crate::url::CrawlDomain;
use crate::CrawlError;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// How a crawl run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlOutcome {
    /// All reachable in-domain URLs were processed
    Completed,
    /// The caller cancelled, or `stop` was called; results are partial
    Cancelled,
    /// The root page looked like a single-page application; nothing was crawled
    SpaDetected,
}

/// Main crawler coordinator structure
///
/// The visited set and results table are owned by the intake loop while a
/// run is in progress and are moved back here when it finishes, so
/// [`Coordinator::results`] only ever shows a finished (or cancelled) run.
pub struct Coordinator<F = HttpFetcher> {
    domain: CrawlDomain,
    config: CrawlerConfig,
    spa_markers: Vec<String>,
    fetcher: Arc<F>,
    visited: HashSet<String>,
    results: HashMap<String, u64>,
    stats: CrawlStats,
    shutdown: CancellationToken,
    stopped: AtomicBool,
    has_run: bool,
}

impl Coordinator<HttpFetcher> {
    /// Creates a coordinator for `domain` with `workers` fetch workers
    ///
    /// All other settings use their defaults.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use site_census::crawler::Coordinator;
    /// use tokio_util::sync::CancellationToken;
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut coordinator = Coordinator::start("example.com", 4)?;
    /// coordinator.run(CancellationToken::new()).await?;
    /// for (url, count) in coordinator.results() {
    ///     println!("{} ({})", url, count);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub fn start(domain: &str, workers: usize) -> Result<Self, CrawlError> {
        let mut config = Config::default();
        config.crawler.workers = workers;
        Self::with_config(domain, &config)
    }

    /// Creates a coordinator from a full configuration
    pub fn with_config(domain: &str, config: &Config) -> Result<Self, CrawlError> {
        let domain = CrawlDomain::parse(domain)?;
        validate(config)?;
        let fetcher = HttpFetcher::new(&config.http)?;
        Ok(Self::build(domain, config, fetcher))
    }
}

impl<F: Fetcher> Coordinator<F> {
    /// Creates a coordinator that fetches pages through `fetcher`
    pub fn with_fetcher(domain: &str, config: &Config, fetcher: F) -> Result<Self, CrawlError> {
        let domain = CrawlDomain::parse(domain)?;
        validate(config)?;
        Ok(Self::build(domain, config, fetcher))
    }

    fn build(domain: CrawlDomain, config: &Config, fetcher: F) -> Self {
        Self {
            domain,
            config: config.crawler.clone(),
            spa_markers: config.spa.markers.clone(),
            fetcher: Arc::new(fetcher),
            visited: HashSet::new(),
            results: HashMap::new(),
            stats: CrawlStats::default(),
            shutdown: CancellationToken::new(),
            stopped: AtomicBool::new(false),
            has_run: false,
        }
    }

    /// The canonical crawl domain
    pub fn domain(&self) -> &CrawlDomain {
        &self.domain
    }

    /// Runs the crawl until quiescence or cancellation
    ///
    /// # Run Flow
    ///
    /// 1. Fetch the root page and check it for SPA markers
    ///    - Unreachable → `CrawlError::Fetch`
    ///    - SPA → `CrawlOutcome::SpaDetected`, no workers started
    /// 2. Spawn the error loop, the intake loop and the worker pool
    /// 3. Seed the intake queue with the normalized root URL
    /// 4. Wait until pending work reaches and holds zero, or `cancel` fires
    /// 5. Stop the loops, join every task and collect the results
    ///
    /// A coordinator runs at most once.
    pub async fn run(&mut self, cancel: CancellationToken) -> Result<CrawlOutcome, CrawlError> {
        if self.has_run {
            return Err(CrawlError::AlreadyRun);
        }
        self.has_run = true;

        let start_time = Instant::now();
        let seed = self.domain.seed_url().map_err(|source| CrawlError::Url {
            link: self.domain.to_string(),
            source,
        })?;

        tracing::info!("Checking {} for single-page application markers", seed);
        let spa_check = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            _ = self.shutdown.cancelled() => None,
            result = detect_spa(self.fetcher.as_ref(), &seed, &self.spa_markers) => Some(result),
        };

        match spa_check {
            None => {
                tracing::info!("Crawl cancelled before it started");
                self.stop();
                return Ok(CrawlOutcome::Cancelled);
            }
            Some(Err(source)) => {
                self.stop();
                return Err(CrawlError::Fetch { url: seed, source });
            }
            Some(Ok(true)) => {
                tracing::info!("SPA website detected at {}, nothing to crawl", seed);
                self.stop();
                self.stats.elapsed = start_time.elapsed();
                return Ok(CrawlOutcome::SpaDetected);
            }
            Some(Ok(false)) => {}
        }

        let (intake_tx, intake_rx) = mpsc::channel(self.config.intake_capacity);
        let (frontier_tx, frontier_rx) = mpsc::channel(self.config.frontier_capacity);
        let (errors, errors_rx) = ErrorSink::channel(self.config.error_capacity);
        let pending = PendingWork::new();
        let counters = Arc::new(CrawlCounters::default());

        let error_loop = tokio::spawn(run_error_loop(errors_rx, self.shutdown.clone()));

        let intake_loop = tokio::spawn(
            IntakeLoop {
                frontier: Frontier::new(self.domain.clone()),
                intake: intake_rx,
                queue: frontier_tx.clone(),
                pending: pending.clone(),
                errors: errors.clone(),
                shutdown: self.shutdown.clone(),
            }
            .run(),
        );

        let frontier_rx = Arc::new(Mutex::new(frontier_rx));
        let mut workers = JoinSet::new();
        for id in 1..=self.config.workers {
            workers.spawn(
                Worker {
                    id,
                    domain: self.domain.clone(),
                    fetcher: Arc::clone(&self.fetcher),
                    frontier: Arc::clone(&frontier_rx),
                    intake: intake_tx.clone(),
                    pending: pending.clone(),
                    errors: errors.clone(),
                    counters: Arc::clone(&counters),
                    shutdown: self.shutdown.clone(),
                }
                .run(),
            );
        }
        drop(errors);

        tracing::info!("Crawling {} with {} workers", seed, self.config.workers);
        pending.begin();
        if intake_tx.send(seed).await.is_err() {
            pending.finish();
        }

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => CrawlOutcome::Cancelled,
            _ = self.shutdown.cancelled() => CrawlOutcome::Cancelled,
            _ = wait_for_quiescence(
                &pending,
                &intake_tx,
                &frontier_tx,
                self.config.quiescence_recheck(),
            ) => CrawlOutcome::Completed,
        };

        if outcome == CrawlOutcome::Cancelled {
            tracing::info!(
                "Crawl cancelled with {} units of work pending",
                pending.pending()
            );
        }

        self.stop();
        drop(intake_tx);
        drop(frontier_tx);

        while let Some(joined) = workers.join_next().await {
            joined?;
        }
        let frontier = intake_loop.await?;
        let errors_reported = error_loop.await?;

        let (visited, results) = frontier.into_parts();
        self.visited = visited;
        self.results = results;
        self.stats = CrawlStats {
            pages_fetched: CrawlCounters::get(&counters.pages_fetched),
            fetch_failures: CrawlCounters::get(&counters.fetch_failures),
            links_submitted: CrawlCounters::get(&counters.links_submitted),
            errors_reported,
            unique_urls: self.results.len(),
            total_occurrences: self.results.values().sum(),
            elapsed: start_time.elapsed(),
        };

        tracing::info!(
            "Crawl finished ({:?}): {} unique URLs, {} pages fetched in {:?}",
            outcome,
            self.stats.unique_urls,
            self.stats.pages_fetched,
            self.stats.elapsed
        );

        Ok(outcome)
    }

    /// Occurrence count per normalized URL
    ///
    /// Empty until [`Coordinator::run`] has returned.
    pub fn results(&self) -> &HashMap<String, u64> {
        &self.results
    }

    /// Every normalized URL seen by the last run
    pub fn visited(&self) -> &HashSet<String> {
        &self.visited
    }

    /// Statistics of the last run
    pub fn stats(&self) -> &CrawlStats {
        &self.stats
    }

    /// Shuts down the intake and error loops
    ///
    /// Safe to call any number of times; only the first call has an effect.
    pub fn stop(&self) {
        if self.stopped.swap(true, Ordering::SeqCst) {
            return;
        }
        tracing::debug!("Stopping crawl loops");
        self.shutdown.cancel();
    }
}

/// Waits until pending work reaches zero and holds there
///
/// After the counter drops to zero the wait is confirmed once more after
/// `recheck`, together with both queues being empty.
async fn wait_for_quiescence(
    pending: &PendingWork,
    intake: &mpsc::Sender<String>,
    frontier: &mpsc::Sender<String>,
    recheck: Duration,
) {
    loop {
        pending.wait_idle().await;
        tokio::time::sleep(recheck).await;

        if pending.pending() == 0 && is_drained(intake) && is_drained(frontier) {
            return;
        }

        tracing::debug!("Work resumed during quiescence recheck");
    }
}

fn is_drained(queue: &mpsc::Sender<String>) -> bool {
    queue.capacity() == queue.max_capacity()
}
