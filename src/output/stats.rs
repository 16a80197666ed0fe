//! Crawl statistics
//!
//! Counters collected during a run, for logging and the optional summary.

use std::time::Duration;

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStats {
    /// Pages fetched with a 2xx status
    pub pages_fetched: usize,

    /// Fetches that failed with a status or transport error
    pub fetch_failures: usize,

    /// In-domain links submitted by workers
    pub links_submitted: usize,

    /// Errors logged through the error queue
    pub errors_reported: usize,

    /// Distinct normalized URLs
    pub unique_urls: usize,

    /// Sum of all occurrence counts
    pub total_occurrences: u64,

    /// Wall-clock duration of the run
    pub elapsed: Duration,
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStats) {
    println!();
    println!("=== Crawl Statistics ===");
    println!("  Unique URLs: {}", stats.unique_urls);
    println!("  Total link occurrences: {}", stats.total_occurrences);
    println!("  Pages fetched: {}", stats.pages_fetched);
    println!("  Failed fetches: {}", stats.fetch_failures);
    println!("  Links submitted: {}", stats.links_submitted);
    println!("  Errors reported: {}", stats.errors_reported);

    let secs = stats.elapsed.as_secs_f64();
    let rate = if secs > 0.0 {
        stats.pages_fetched as f64 / secs
    } else {
        0.0
    };
    println!("  Elapsed: {:.2}s ({:.2} pages/sec)", secs, rate);
}
