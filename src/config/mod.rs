//! Configuration module
//!
//! Every setting has a default, so a configuration file is optional. When one
//! is given it is loaded from TOML and validated before the crawl starts.
//!
//! # Example
//!
//! ```no_run
//! use site_census::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("census.toml")).unwrap();
//! println!("Crawler will use {} workers", config.crawler.workers);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, HttpConfig, SpaConfig};

// Re-export parser and validation functions
pub use parser::{load_config, parse_config};
pub use validation::validate;
