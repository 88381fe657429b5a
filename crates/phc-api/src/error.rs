//! Error types for phc-api.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when calling the PHC insight API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response.
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// Response body was not JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// The error shape handed to the rendering layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorShape {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ApiError {
    /// Flatten this error into `{message, status?, code?}`.
    pub fn shape(&self) -> ErrorShape {
        match self {
            ApiError::Http(e) => {
                let code = if e.is_timeout() {
                    "ETIMEDOUT"
                } else if e.is_connect() {
                    "ERR_NETWORK"
                } else if e.is_decode() {
                    "ERR_BAD_RESPONSE"
                } else {
                    "ERR_REQUEST"
                };
                ErrorShape {
                    message: e.to_string(),
                    status: e.status().map(|s| s.as_u16()),
                    code: Some(code.to_string()),
                }
            }
            ApiError::Status { status, message } => ErrorShape {
                message: message.clone(),
                status: Some(*status),
                code: Some(
                    if *status >= 500 {
                        "ERR_BAD_RESPONSE"
                    } else {
                        "ERR_BAD_REQUEST"
                    }
                    .to_string(),
                ),
            },
            ApiError::Json(e) => ErrorShape {
                message: format!("Malformed JSON response: {}", e),
                status: None,
                code: Some("ERR_BAD_RESPONSE".to_string()),
            },
            ApiError::Config(message) => ErrorShape {
                message: message.clone(),
                status: None,
                code: Some("ERR_CONFIG".to_string()),
            },
        }
    }
}

impl From<&ApiError> for ErrorShape {
    fn from(error: &ApiError) -> Self {
        error.shape()
    }
}

/// Pull a human-readable message out of an error response body.
///
/// Prefers `detail`, then `message`, then the raw body.
pub(crate) fn status_message(status: u16, body: &str) -> String {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
    parsed
        .as_ref()
        .and_then(|v| v.get("detail").or_else(|| v.get("message")))
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .or_else(|| Some(body.trim().to_string()).filter(|b| !b.is_empty()))
        .unwrap_or_else(|| format!("Request failed with status code {}", status))
}
