//! Configuration types for phc-api.

use std::env;
use std::time::Duration;

use crate::error::ApiError;

/// Default API base path.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/api/v1";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for connecting to the PHC insight API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base path of the API (e.g., "http://localhost:8000/api/v1").
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl ApiConfig {
    /// Create a new configuration with the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `PHC_API_URL` | API base path (alias `PHC_API_BASE_URL`) | `http://127.0.0.1:8000/api/v1` |
    /// | `PHC_API_TIMEOUT_SECS` | Request timeout in seconds | `30` |
    pub fn from_env() -> Result<Self, ApiError> {
        let base_url = env::var("PHC_API_URL")
            .or_else(|_| env::var("PHC_API_BASE_URL"))
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let timeout = match env::var("PHC_API_TIMEOUT_SECS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| ApiError::Config(format!("invalid PHC_API_TIMEOUT_SECS: {}", raw)))?,
            Err(_) => DEFAULT_TIMEOUT,
        };

        Ok(Self { base_url, timeout })
    }

    /// Build the URL for an endpoint path.
    pub fn endpoint_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
