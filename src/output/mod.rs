//! Output module for presenting crawl results
//!
//! This module handles:
//! - Rendering the URL → count table in report order
//! - Printing crawl statistics

mod report;
pub mod stats;

pub use report::{print_report, render_report, sorted_entries};
pub use stats::{print_statistics, CrawlStats};
