//! Local alert state for the PHC monitor.
//!
//! This crate provides:
//!
//! - A [`KeyValueStore`] abstraction with in-memory and SQLite backends
//! - The [`SimulatedAlertStore`], a capped newest-first log of operator
//!   outreach alerts that broadcasts [`AlertSignal`]s on change
//! - [`merge_feed`], which prepends simulated alerts to the API feed
//! - [`ResolvedAlerts`], the set of acknowledged feed entries
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use alert_store::{AlertSignals, MemoryStore, SimulatedAlertStore, SimulatedKind};
//! use phc_core::normalize_facility;
//! use serde_json::json;
//!
//! # fn main() -> Result<(), alert_store::StoreError> {
//! let store = SimulatedAlertStore::new(Arc::new(MemoryStore::new()), AlertSignals::new());
//! let mut signals = store.signals().subscribe();
//!
//! let facility = normalize_facility(&json!({"name": "Kuje PHC"}), 0);
//! store.record(&facility, SimulatedKind::Outbreak)?;
//!
//! assert!(signals.try_recv().is_ok());
//! assert_eq!(store.load().len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod kv;
pub mod merge;
pub mod resolved;
pub mod signals;
pub mod simulated;

pub use error::{Result, StoreError};
pub use kv::{KeyValueStore, MemoryStore, SqliteStore};
pub use merge::merge_feed;
pub use resolved::{ResolvedAlerts, RESOLVED_ALERTS_KEY};
pub use signals::{AlertSignal, AlertSignals};
pub use simulated::{
    Severity, SimulatedAlert, SimulatedAlertStore, SimulatedKind, MAX_SIMULATED_ALERTS,
    SIMULATED_ALERTS_KEY,
};
