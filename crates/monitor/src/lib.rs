//! PHC alert monitor.
//!
//! Ties the API client and local alert state together for the operator
//! surface:
//!
//! - [`DashboardService`]: reads with live, cached or mock data, the merged
//!   alert feed, and simulated-alert outreach
//! - [`Poller`]: cancellable periodic refresh
//! - [`MonitorConfig`]: environment configuration
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use alert_store::{AlertSignals, MemoryStore};
//! use monitor::DashboardService;
//! use phc_api::{ApiConfig, ApiParams, PhcApiClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let api = PhcApiClient::new(ApiConfig::default())?;
//! let service = DashboardService::new(
//!     Arc::new(api),
//!     Arc::new(MemoryStore::new()),
//!     AlertSignals::new(),
//! );
//!
//! let feed = service.alerts_feed(&ApiParams::new()).await;
//! if feed.using_mock_data() {
//!     eprintln!("API unavailable, showing fallback data");
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod console;
pub mod error;
pub mod poller;
pub mod render;
pub mod service;

pub use config::{ConfigError, MonitorConfig};
pub use error::{MonitorError, Result};
pub use poller::{PollHandle, Poller};
pub use service::{DashboardService, Fetched, Origin};
