//! site-census: a single-domain link census
//!
//! This crate crawls one web domain from its root URL with a fixed pool of
//! fetch workers, and counts how often every internal URL is linked to.

pub mod config;
pub mod crawler;
pub mod output;
pub mod url;

use thiserror::Error;

/// Main error type for crawl operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Invalid crawl domain '{domain}': {reason}")]
    InvalidDomain { domain: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error for '{link}': {source}")]
    Url { link: String, source: UrlError },

    #[error("Fetch failed for {url}: {source}")]
    Fetch { url: String, source: FetchError },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Crawl task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Crawl run has already been executed")]
    AlreadyRun,
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(#[from] ::url::ParseError),

    #[error("URL is empty after normalization")]
    Empty,
}

/// Page fetch errors
///
/// A non-2xx status and a transport failure are kept apart so they can be
/// logged differently; the crawl treats both the same way.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("Unexpected HTTP status {status}")]
    Status { status: u16 },

    #[error("Transport error: {0}")]
    Transport(String),
}

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Coordinator, CrawlOutcome};
pub use output::CrawlStats;
pub use url::{is_same_domain, normalize_url, CrawlDomain};
