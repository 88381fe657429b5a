//! Bundled mock responses, shaped like live API payloads.
//!
//! Used as the fallback when the API cannot be reached.

use phc_core::{
    normalize_alert_feed, normalize_facility_list, normalize_underserved_response_with,
    AlertFeedEntry, Facility, UnderservedResponse,
};
use serde_json::Value;
use tracing::error;

const OUTBREAK_ALERTS: &str = include_str!("../fixtures/outbreak_alerts.json");
const UNDERSERVED: &str = include_str!("../fixtures/underserved.json");
const ALERTS_FEED: &str = include_str!("../fixtures/alerts_feed.json");

fn parse(name: &str, raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|e| {
        error!("Bundled fixture {} is not valid JSON: {}", name, e);
        Value::Null
    })
}

/// Mock `GET /outbreak-alerts` payload.
pub fn outbreak_alerts_payload() -> Value {
    parse("outbreak_alerts.json", OUTBREAK_ALERTS)
}

/// Mock `GET /underserved` payload.
pub fn underserved_payload() -> Value {
    parse("underserved.json", UNDERSERVED)
}

/// Mock `GET /alerts-feed` payload.
pub fn alerts_feed_payload() -> Value {
    parse("alerts_feed.json", ALERTS_FEED)
}

/// Normalized mock facility list.
pub fn mock_outbreak_alerts() -> Vec<Facility> {
    normalize_facility_list(&outbreak_alerts_payload())
}

/// Normalized mock underserved response.
pub fn mock_underserved(top_n: usize) -> UnderservedResponse {
    normalize_underserved_response_with(&underserved_payload(), top_n)
}

/// Normalized mock alert feed.
pub fn mock_alerts_feed() -> Vec<AlertFeedEntry> {
    normalize_alert_feed(&alerts_feed_payload())
}
