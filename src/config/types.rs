use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub http: HttpConfig,
    pub spa: SpaConfig,
}

/// Crawl coordination settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Number of concurrent fetch workers
    pub workers: usize,

    /// Capacity of the queue of normalized URLs waiting for a worker
    #[serde(rename = "frontier-capacity")]
    pub frontier_capacity: usize,

    /// Capacity of the queue of raw discovered links
    #[serde(rename = "intake-capacity")]
    pub intake_capacity: usize,

    /// Capacity of the error queue
    #[serde(rename = "error-capacity")]
    pub error_capacity: usize,

    /// How long pending work must stay at zero before the crawl is done (milliseconds)
    #[serde(rename = "quiescence-recheck-ms")]
    pub quiescence_recheck_ms: u64,
}

impl CrawlerConfig {
    pub fn quiescence_recheck(&self) -> Duration {
        Duration::from_millis(self.quiescence_recheck_ms)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            workers: 4,
            frontier_capacity: 1000,
            intake_capacity: 1000,
            error_capacity: 10,
            quiescence_recheck_ms: 50,
        }
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Total time allowed for one request (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Time allowed to establish a connection (seconds)
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("site-census/{}", env!("CARGO_PKG_VERSION")),
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

/// Single-page application detection
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SpaConfig {
    /// Substrings that mark a root page as client-side rendered
    pub markers: Vec<String>,
}

impl Default for SpaConfig {
    fn default() -> Self {
        Self {
            markers: vec!["react".to_string(), "angular".to_string(), "vue".to_string()],
        }
    }
}
