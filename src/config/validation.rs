use crate::config::types::{Config, CrawlerConfig, HttpConfig, SpaConfig};
use crate::ConfigError;

/// Upper bound on the worker pool size
pub const MAX_WORKERS: usize = 256;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_http_config(&config.http)?;
    validate_spa_config(&config.spa)?;
    Ok(())
}

/// Validates crawler configuration
pub(crate) fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.workers < 1 || config.workers > MAX_WORKERS {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and {}, got {}",
            MAX_WORKERS, config.workers
        )));
    }

    for (name, capacity) in [
        ("frontier_capacity", config.frontier_capacity),
        ("intake_capacity", config.intake_capacity),
        ("error_capacity", config.error_capacity),
    ] {
        if capacity < 1 {
            return Err(ConfigError::Validation(format!(
                "{} must be >= 1, got {}",
                name, capacity
            )));
        }
    }

    if config.quiescence_recheck_ms < 1 || config.quiescence_recheck_ms > 10_000 {
        return Err(ConfigError::Validation(format!(
            "quiescence_recheck_ms must be between 1 and 10000, got {}",
            config.quiescence_recheck_ms
        )));
    }

    Ok(())
}

/// Validates HTTP client configuration
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request_timeout_secs must be >= 1, got {}",
            config.request_timeout_secs
        )));
    }

    if config.connect_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "connect_timeout_secs must be >= 1, got {}",
            config.connect_timeout_secs
        )));
    }

    Ok(())
}

/// Validates SPA markers
fn validate_spa_config(config: &SpaConfig) -> Result<(), ConfigError> {
    if config.markers.is_empty() {
        return Err(ConfigError::Validation(
            "at least one SPA marker is required".to_string(),
        ));
    }

    if config.markers.iter().any(|m| m.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "SPA markers cannot be empty strings".to_string(),
        ));
    }

    Ok(())
}
