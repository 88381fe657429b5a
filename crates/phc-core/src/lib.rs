//! Canonical PHC monitoring types and normalizers.
//!
//! The upstream API and the bundled fixtures describe the same entities with
//! drifting field names and loosely-typed values. This crate turns those raw
//! JSON payloads into canonical shapes that downstream code can read without
//! shape checks:
//!
//! - [`normalize_facility`] - one raw record into a [`Facility`]
//! - [`classify_alert_type`] - free text into an [`AlertKind`]
//! - [`normalize_facility_list`], [`normalize_underserved_response`] and
//!   [`normalize_alert_feed`] - whole responses
//!
//! All normalizers are pure and total: malformed input degrades to defaults,
//! never to an error.
//!
//! # Example
//!
//! ```rust
//! use phc_core::{normalize_facility, AlertLevel};
//! use serde_json::json;
//!
//! let raw = json!({"PHC Name": "Asokoro PHC", "PHC LGA": "AMAC", "shortage_score": "3.2"});
//! let facility = normalize_facility(&raw, 0);
//!
//! assert_eq!(facility.id, "asokoro phc");
//! assert_eq!(facility.alert_level, AlertLevel::High);
//! ```

pub mod areas;
pub mod classifier;
pub mod coerce;
pub mod facility;
pub mod feed;
pub mod response;

pub use areas::{AreaCentroid, AreaResolver, CentroidTable, Coordinates, LGA_CENTROIDS};
pub use classifier::{classify_alert_type, label_for, AlertKind};
pub use coerce::RawRecord;
pub use facility::{normalize_facility, normalize_facility_with, AlertLevel, Facility};
pub use feed::{
    iso_timestamp, normalize_alert_feed, normalize_alert_feed_at, AlertFeedEntry, CHANNEL_API,
    CHANNEL_SIMULATED,
};
pub use response::{
    compute_top_underserved, mean_underserved_index, normalize_facility_list,
    normalize_telecom_advice, normalize_underserved_response,
    normalize_underserved_response_with, unwrap_collection, TelecomAdvice, TopUnderserved,
    UnderservedResponse, UnderservedSummary, DEFAULT_TOP_N,
};
