//! Registry client for fetching package release metadata
//!
//! This module provides:
//! - HTTP client shared foundation with retry logic
//! - PyPI JSON API adapter

mod client;
mod pypi;

pub use client::{HttpClient, DEFAULT_TIMEOUT};
pub use pypi::{PyPIAdapter, PYPI_API_URL};

use crate::domain::ReleaseInfo;
use crate::error::{ConfigError, FetchError};
use async_trait::async_trait;
use std::time::Duration;

/// Trait for package index clients
#[async_trait]
pub trait RegistryClient: Send + Sync {
    /// Get the registry name
    fn registry_name(&self) -> &'static str;

    /// Fetch all usable releases of a package, sorted ascending by version
    ///
    /// An unknown package yields an empty list.
    async fn fetch_releases(&self, package: &str) -> Result<Vec<ReleaseInfo>, FetchError>;
}

/// Registry configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    /// JSON API base URL
    pub index_url: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Retries after a transient failure
    pub max_retries: u32,
    /// Delay before the first retry
    pub retry_delay: Duration,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            index_url: PYPI_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            max_retries: 1,
            retry_delay: Duration::from_millis(500),
        }
    }
}

impl RegistryConfig {
    /// Validate an index URL given on the command line
    pub fn validate_index_url(value: &str) -> Result<String, ConfigError> {
        let url = reqwest::Url::parse(value).map_err(|e| ConfigError::InvalidIndexUrl {
            value: value.to_string(),
            message: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidIndexUrl {
                value: value.to_string(),
                message: format!("unsupported scheme '{}'", url.scheme()),
            });
        }
        Ok(value.trim_end_matches('/').to_string())
    }
}

/// Create the PyPI client for the given configuration
pub fn create_client(config: &RegistryConfig) -> Result<PyPIAdapter, FetchError> {
    let client = HttpClient::with_timeout(config.timeout)?
        .with_max_retries(config.max_retries)
        .with_retry_delay(config.retry_delay);
    Ok(PyPIAdapter::new(client).with_index_url(config.index_url.as_str()))
}
