//! Error types for the monitor.

use alert_store::StoreError;
use phc_api::ApiError;
use thiserror::Error;

/// Errors raised by dashboard operations.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// No facility in the current list matches the id.
    #[error("Unknown facility: {0}")]
    UnknownFacility(String),

    /// Local state could not be written.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// An API call without a fallback failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

/// Result type for monitor operations.
pub type Result<T> = std::result::Result<T, MonitorError>;
