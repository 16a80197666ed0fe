//! URL handling module
//!
//! This module provides the crawl domain, URL normalization and the
//! same-domain check that decides which discovered links are followed.

mod domain;
mod matcher;
mod normalize;

// Re-export main functions
pub use domain::CrawlDomain;
pub use matcher::{host_matches, is_same_domain};
pub use normalize::normalize_url;
