//! Pending-work accounting used to detect quiescence
//!
//! A unit of work is taken before a link is submitted to the intake queue and
//! released once that link can no longer produce more work: either the intake
//! loop dropped it as a duplicate or malformed link, or a worker finished
//! fetching it and submitted everything it found.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// Shared counter of in-flight work units
#[derive(Debug, Clone, Default)]
pub struct PendingWork {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    count: AtomicUsize,
    idle: Notify,
}

impl PendingWork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes one unit of work
    pub fn begin(&self) {
        self.inner.count.fetch_add(1, Ordering::SeqCst);
    }

    /// Releases one unit of work, waking idle waiters when none remain
    pub fn finish(&self) {
        let previous = self
            .inner
            .count
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));

        match previous {
            Ok(1) => self.inner.idle.notify_waiters(),
            Ok(_) => {}
            Err(_) => tracing::error!("pending work released more times than taken"),
        }
    }

    /// Current number of in-flight units
    pub fn pending(&self) -> usize {
        self.inner.count.load(Ordering::SeqCst)
    }

    /// Waits until the counter is zero
    ///
    /// Returns immediately if nothing is pending.
    pub async fn wait_idle(&self) {
        loop {
            let notified = self.inner.idle.notified();
            tokio::pin!(notified);
            // Register before checking so a release between the check and the
            // await is not missed.
            notified.as_mut().enable();

            if self.pending() == 0 {
                return;
            }

            notified.await;
        }
    }
}
