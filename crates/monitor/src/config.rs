//! Configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use phc_api::{ApiConfig, ApiError};

/// Default location of the persisted local state.
pub const DEFAULT_STATE_PATH: &str = "./data/phc-monitor.db";

/// Alert feed refresh interval.
pub const DEFAULT_FEED_INTERVAL: Duration = Duration::from_secs(5);

/// Outbreak list refresh interval.
pub const DEFAULT_OUTBREAK_INTERVAL: Duration = Duration::from_secs(30);

/// Underserved ranking refresh interval.
pub const DEFAULT_UNDERSERVED_INTERVAL: Duration = Duration::from_secs(60);

/// Monitor configuration.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// API connection settings.
    pub api: ApiConfig,
    /// SQLite file holding simulated and resolved alerts.
    pub state_path: PathBuf,
    /// How often the alert feed is polled.
    pub feed_interval: Duration,
    /// How often the outbreak list is polled.
    pub outbreak_interval: Duration,
    /// How often the underserved ranking is polled.
    pub underserved_interval: Duration,
}

impl MonitorConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `PHC_API_URL` | API base path (alias `PHC_API_BASE_URL`) | `http://127.0.0.1:8000/api/v1` |
    /// | `PHC_API_TIMEOUT_SECS` | Request timeout in seconds | `30` |
    /// | `PHC_STATE_PATH` | SQLite file for local state | `./data/phc-monitor.db` |
    /// | `PHC_FEED_POLL_SECS` | Alert feed poll interval | `5` |
    /// | `PHC_OUTBREAK_POLL_SECS` | Outbreak list poll interval | `30` |
    /// | `PHC_UNDERSERVED_POLL_SECS` | Underserved ranking poll interval | `60` |
    pub fn from_env() -> Result<Self, ConfigError> {
        let api = ApiConfig::from_env()?;

        let state_path = env::var("PHC_STATE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_STATE_PATH));

        Ok(Self {
            api,
            state_path,
            feed_interval: interval_from_env("PHC_FEED_POLL_SECS", DEFAULT_FEED_INTERVAL)?,
            outbreak_interval: interval_from_env(
                "PHC_OUTBREAK_POLL_SECS",
                DEFAULT_OUTBREAK_INTERVAL,
            )?,
            underserved_interval: interval_from_env(
                "PHC_UNDERSERVED_POLL_SECS",
                DEFAULT_UNDERSERVED_INTERVAL,
            )?,
        })
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            state_path: PathBuf::from(DEFAULT_STATE_PATH),
            feed_interval: DEFAULT_FEED_INTERVAL,
            outbreak_interval: DEFAULT_OUTBREAK_INTERVAL,
            underserved_interval: DEFAULT_UNDERSERVED_INTERVAL,
        }
    }
}

fn interval_from_env(var: &'static str, default: Duration) -> Result<Duration, ConfigError> {
    match env::var(var) {
        Ok(raw) => parse_interval(var, &raw),
        Err(_) => Ok(default),
    }
}

/// Parse a positive number of seconds.
fn parse_interval(var: &'static str, raw: &str) -> Result<Duration, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidInterval {
            var,
            value: raw.to_string(),
        }),
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be a positive number of seconds, got {value:?}")]
    InvalidInterval { var: &'static str, value: String },

    #[error(transparent)]
    Api(#[from] ApiError),
}
