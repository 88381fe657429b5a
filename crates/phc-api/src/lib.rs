//! Client for the PHC insight API.
//!
//! This crate fetches the dashboard endpoints over HTTP and hands back
//! normalized [`phc_core`] types:
//!
//! - Facility lists, underserved rankings and the alert feed
//! - Telecom advice for a single facility
//! - Pass-through resource warnings, metrics and health
//!
//! Failures surface as [`ApiError`], which flattens to the
//! `{message, status?, code?}` [`ErrorShape`] the UI renders. The
//! [`fixtures`] module carries mock responses to fall back on.
//!
//! # Example
//!
//! ```no_run
//! use phc_api::{ApiConfig, ApiParams, PhcApi, PhcApiClient};
//!
//! # async fn example() -> Result<(), phc_api::ApiError> {
//! let client = PhcApiClient::new(ApiConfig::from_env()?)?;
//!
//! let ranking = client.underserved(&ApiParams::new().top_n(10)).await?;
//! for row in ranking.summary.top_underserved_facilities {
//!     println!("{}: {:.2}", row.display_name, row.underserved_index);
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod fixtures;
pub mod params;

pub use api::{HealthStatus, PhcApi};
pub use client::PhcApiClient;
pub use config::{ApiConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use error::{ApiError, ErrorShape};
pub use params::ApiParams;
