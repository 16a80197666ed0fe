//! Link intake and deduplication
//!
//! The intake loop is the only code that touches the visited set and the
//! results table. It owns them for the whole run and hands them back to the
//! coordinator when it exits, so no locking is needed.

use crate::crawler::errors::ErrorSink;
use crate::crawler::pending::PendingWork;
use crate::url::{normalize_url, CrawlDomain};
use crate::{CrawlError, UrlError};
use std::collections::{HashMap, HashSet, VecDeque};
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio_util::sync::CancellationToken;

/// What recording a discovered link did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Discovery {
    /// First sighting; the normalized URL must be fetched
    New(String),
    /// Already visited; only its count went up
    Seen,
}

/// Visited set and occurrence counts for one crawl run
#[derive(Debug, Clone)]
pub struct Frontier {
    domain: CrawlDomain,
    visited: HashSet<String>,
    results: HashMap<String, u64>,
}

impl Frontier {
    pub fn new(domain: CrawlDomain) -> Self {
        Self {
            domain,
            visited: HashSet::new(),
            results: HashMap::new(),
        }
    }

    /// Normalizes a raw link and records one occurrence of it
    ///
    /// A new URL enters the visited set with a count of 1. A known URL only
    /// has its count incremented.
    pub fn record(&mut self, raw: &str) -> Result<Discovery, UrlError> {
        let url = normalize_url(raw, &self.domain)?;

        if self.visited.insert(url.clone()) {
            self.results.insert(url.clone(), 1);
            Ok(Discovery::New(url))
        } else {
            *self.results.entry(url).or_insert(0) += 1;
            Ok(Discovery::Seen)
        }
    }

    pub fn visited(&self) -> &HashSet<String> {
        &self.visited
    }

    pub fn results(&self) -> &HashMap<String, u64> {
        &self.results
    }

    pub fn into_parts(self) -> (HashSet<String>, HashMap<String, u64>) {
        (self.visited, self.results)
    }
}

/// The single consumer of the intake queue
pub(crate) struct IntakeLoop {
    pub frontier: Frontier,
    pub intake: mpsc::Receiver<String>,
    pub queue: mpsc::Sender<String>,
    pub pending: PendingWork,
    pub errors: ErrorSink,
    pub shutdown: CancellationToken,
}

impl IntakeLoop {
    /// Drains discovered links until shutdown, then returns the frontier
    ///
    /// New URLs that do not fit in the bounded frontier queue wait in a local
    /// backlog, so intake keeps draining while workers are blocked submitting
    /// links. Every backlog entry is already in the visited set.
    pub async fn run(self) -> Frontier {
        let IntakeLoop {
            mut frontier,
            mut intake,
            queue,
            pending,
            errors,
            shutdown,
        } = self;
        let mut backlog: VecDeque<String> = VecDeque::new();

        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                permit = queue.reserve(), if !backlog.is_empty() => match permit {
                    Ok(permit) => {
                        if let Some(url) = backlog.pop_front() {
                            permit.send(url);
                        }
                    }
                    Err(_) => break,
                },
                received = intake.recv() => match received {
                    Some(link) => {
                        accept(&mut frontier, &link, &queue, &mut backlog, &pending, &errors);
                    }
                    None => break,
                },
            }
        }

        intake.close();
        if !backlog.is_empty() {
            tracing::debug!("{} queued URLs abandoned at shutdown", backlog.len());
        }

        frontier
    }
}

fn accept(
    frontier: &mut Frontier,
    link: &str,
    queue: &mpsc::Sender<String>,
    backlog: &mut VecDeque<String>,
    pending: &PendingWork,
    errors: &ErrorSink,
) {
    match frontier.record(link) {
        Ok(Discovery::New(url)) => {
            tracing::trace!("New URL queued: {}", url);
            if !backlog.is_empty() {
                backlog.push_back(url);
                return;
            }
            match queue.try_send(url) {
                Ok(()) => {}
                Err(TrySendError::Full(url)) => backlog.push_back(url),
                Err(TrySendError::Closed(_)) => pending.finish(),
            }
        }
        Ok(Discovery::Seen) => pending.finish(),
        Err(source) => {
            errors.report(CrawlError::Url {
                link: link.to_string(),
                source,
            });
            pending.finish();
        }
    }
}
