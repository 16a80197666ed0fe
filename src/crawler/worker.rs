//! Fetch workers
//!
//! Workers are interchangeable and hold no crawl state of their own. Each one
//! takes a URL from the frontier, fetches it, and submits every in-domain
//! anchor back to the intake queue.

use crate::crawler::errors::ErrorSink;
use crate::crawler::fetcher::{fetch_anchors, Fetcher};
use crate::crawler::pending::PendingWork;
use crate::url::{is_same_domain, CrawlDomain};
use crate::CrawlError;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;

/// Counters shared by all workers of a run
#[derive(Debug, Default)]
pub(crate) struct CrawlCounters {
    pub pages_fetched: AtomicUsize,
    pub fetch_failures: AtomicUsize,
    pub links_submitted: AtomicUsize,
}

impl CrawlCounters {
    pub fn get(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::Relaxed)
    }

    fn bump(counter: &AtomicUsize) {
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

/// Shared end of the frontier queue
pub(crate) type FrontierReceiver = Arc<Mutex<mpsc::Receiver<String>>>;

pub(crate) struct Worker<F> {
    pub id: usize,
    pub domain: CrawlDomain,
    pub fetcher: Arc<F>,
    pub frontier: FrontierReceiver,
    pub intake: mpsc::Sender<String>,
    pub pending: PendingWork,
    pub errors: ErrorSink,
    pub counters: Arc<CrawlCounters>,
    pub shutdown: CancellationToken,
}

impl<F: Fetcher> Worker<F> {
    /// Processes frontier URLs until shutdown or until the frontier closes
    ///
    /// A URL taken from the frontier releases its unit of pending work only
    /// after everything found on it was submitted. A fetch interrupted by
    /// shutdown is abandoned.
    pub async fn run(self) {
        tracing::debug!(worker = self.id, "Worker started");

        loop {
            let url = tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => break,
                next = next_url(&self.frontier) => match next {
                    Some(url) => url,
                    None => break,
                },
            };

            let completed = tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => false,
                _ = self.crawl(&url) => true,
            };

            if !completed {
                tracing::debug!(worker = self.id, "Abandoned {} at shutdown", url);
                break;
            }

            self.pending.finish();
        }

        tracing::debug!(worker = self.id, "Worker stopped");
    }

    async fn crawl(&self, url: &str) {
        tracing::debug!(worker = self.id, "Crawling {}", url);

        let hrefs = match fetch_anchors(self.fetcher.as_ref(), url).await {
            Ok(hrefs) => hrefs,
            Err(source) => {
                CrawlCounters::bump(&self.counters.fetch_failures);
                self.errors.report(CrawlError::Fetch {
                    url: url.to_string(),
                    source,
                });
                return;
            }
        };

        CrawlCounters::bump(&self.counters.pages_fetched);

        for href in hrefs {
            if !is_same_domain(&href, &self.domain) {
                continue;
            }

            // Taken before the send so the count never dips to zero while
            // this link is on its way.
            self.pending.begin();
            if self.intake.send(href).await.is_err() {
                self.pending.finish();
                return;
            }
            CrawlCounters::bump(&self.counters.links_submitted);
        }
    }
}

async fn next_url(frontier: &FrontierReceiver) -> Option<String> {
    frontier.lock().await.recv().await
}
