//! HTTP fetcher implementation
//!
//! This module handles the page fetch capability used by the crawler:
//! - The `Fetcher` trait, so the coordinator can run against any page source
//! - `HttpFetcher`, the reqwest-backed implementation
//! - `fetch_anchors`, which turns a fetched page into its anchor hrefs

use crate::config::HttpConfig;
use crate::crawler::parser::extract_anchor_hrefs;
use crate::FetchError;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// A fetched page
#[derive(Debug, Clone)]
pub struct Page {
    /// HTTP status code
    pub status: u16,

    /// Page body content
    pub body: String,
}

impl Page {
    /// Returns true for 2xx statuses
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Source of pages for the crawler
///
/// `get` returns the page whatever its status; callers decide what a non-2xx
/// status means for them.
#[async_trait]
pub trait Fetcher: Send + Sync + 'static {
    async fn get(&self, url: &str) -> Result<Page, FetchError>;
}

/// Fetcher backed by a reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher with a client built from the HTTP configuration
    pub fn new(config: &HttpConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }

    /// Wraps an existing client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn get(&self, url: &str) -> Result<Page, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Transport(describe_transport_error(&e)))?;

        let status = response.status().as_u16();

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Transport(describe_transport_error(&e)))?;

        Ok(Page { status, body })
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use site_census::config::HttpConfig;
/// use site_census::crawler::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a page and extracts its anchor hrefs
///
/// A non-2xx status is reported as `FetchError::Status` and yields no links.
pub async fn fetch_anchors<F>(fetcher: &F, url: &str) -> Result<Vec<String>, FetchError>
where
    F: Fetcher + ?Sized,
{
    let page = fetcher.get(url).await?;

    if !page.is_success() {
        return Err(FetchError::Status {
            status: page.status,
        });
    }

    Ok(extract_anchor_hrefs(&page.body))
}

/// Classifies a reqwest error into a short description
fn describe_transport_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "Request timeout".to_string()
    } else if e.is_connect() {
        format!("Connection failed: {}", e)
    } else {
        e.to_string()
    }
}
