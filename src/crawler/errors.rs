//! Error sink
//!
//! Per-link and per-page failures are funneled through one bounded queue and
//! logged by a single loop. Nothing reported here stops the crawl.

use crate::CrawlError;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio_util::sync::CancellationToken;

/// Producer handle for the error queue
#[derive(Debug, Clone)]
pub struct ErrorSink {
    tx: mpsc::Sender<CrawlError>,
}

impl ErrorSink {
    /// Creates a sink and the receiver consumed by [`run_error_loop`]
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<CrawlError>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }

    /// Reports an error without waiting
    ///
    /// When the queue is full the error is logged here instead of queued.
    pub fn report(&self, error: CrawlError) {
        match self.tx.try_send(error) {
            Ok(()) => {}
            Err(TrySendError::Full(error)) => {
                tracing::warn!("Crawl error (error queue full): {}", error);
            }
            Err(TrySendError::Closed(error)) => {
                tracing::warn!("Crawl error (reported after shutdown): {}", error);
            }
        }
    }
}

/// Logs every reported error until shutdown
///
/// On shutdown the queue is closed and whatever is still buffered is logged.
/// Returns the number of errors received through the queue.
pub async fn run_error_loop(
    mut rx: mpsc::Receiver<CrawlError>,
    shutdown: CancellationToken,
) -> usize {
    let mut count = 0;

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            received = rx.recv() => match received {
                Some(error) => {
                    count += 1;
                    log_error(&error);
                }
                None => break,
            },
        }
    }

    rx.close();
    while let Ok(error) = rx.try_recv() {
        count += 1;
        log_error(&error);
    }

    count
}

fn log_error(error: &CrawlError) {
    match error {
        CrawlError::Fetch { .. } => tracing::warn!("Fetch error: {}", error),
        CrawlError::Url { .. } => tracing::warn!("Link rejected: {}", error),
        _ => tracing::warn!("Crawler error: {}", error),
    }
}
