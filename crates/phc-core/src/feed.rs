//! Alert feed entries and the feed normalizer.

use std::collections::HashSet;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::classifier::{classify_alert_type, AlertKind};
use crate::coerce::{self, RawRecord};
use crate::facility::AlertLevel;
use crate::response::unwrap_collection;

/// Channel name for locally simulated entries.
pub const CHANNEL_SIMULATED: &str = "Simulated";
/// Channel name for API entries that do not declare one.
pub const CHANNEL_API: &str = "API";

/// One entry of the alert feed, API-sourced or simulated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertFeedEntry {
    pub id: String,
    pub facility_id: String,
    pub display_name: String,
    pub local_government_area: String,
    pub state: String,
    pub kind: AlertKind,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<AlertLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    pub message: String,
    pub timestamp: String,
    pub channel: String,
    pub simulated: bool,
}

/// Format a time the way feed timestamps are written.
pub fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Normalize an alert feed, stamping missing timestamps with the current time.
pub fn normalize_alert_feed(payload: &Value) -> Vec<AlertFeedEntry> {
    normalize_alert_feed_at(payload, Utc::now())
}

/// Normalize an alert feed with an explicit fallback time.
///
/// The output depends only on `payload` and `now`.
pub fn normalize_alert_feed_at(payload: &Value, now: DateTime<Utc>) -> Vec<AlertFeedEntry> {
    let fallback_time = iso_timestamp(now);
    let items = unwrap_collection(payload, &["feed", "data"]);

    // Generated ids must not collide with ids the source already uses.
    let mut taken: HashSet<String> = items
        .iter()
        .filter_map(Value::as_object)
        .filter_map(source_id)
        .collect();

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let empty = RawRecord::new();
            let record = item.as_object().unwrap_or(&empty);
            let mut entry = normalize_entry(record, index, &fallback_time);
            if source_id(record).is_none() {
                entry.id = claim_id(&mut taken, entry.id);
            }
            entry
        })
        .collect()
}

fn source_id(record: &RawRecord) -> Option<String> {
    coerce::first_string(record, &["id"])
}

/// Reserve `base`, or the first free `base_<n>` if it is already taken.
fn claim_id(taken: &mut HashSet<String>, base: String) -> String {
    let mut id = base.clone();
    let mut n = 2;
    while taken.contains(&id) {
        id = format!("{}_{}", base, n);
        n += 1;
    }
    taken.insert(id.clone());
    id
}

fn normalize_entry(record: &RawRecord, index: usize, fallback_time: &str) -> AlertFeedEntry {
    let kind_raw = coerce::first_string(record, &["type", "alert_type", "category"]);
    let kind = classify_alert_type(kind_raw.as_deref());
    let label = kind.label();

    let display_name = coerce::first_string(
        record,
        &["display_name", "phc_name", "phc", "facility_name", "name"],
    )
    .unwrap_or_else(|| format!("Facility {}", index + 1));

    let id = source_id(record)
        .unwrap_or_else(|| format!("{}_{}_{}", kind, index, slug(&display_name)));

    let score = match record.get("score").filter(|v| !v.is_null()) {
        Some(value) => coerce::as_number(value),
        None => coerce::first_present(record, &["risk_score", "value"]).and_then(coerce::as_number),
    };

    let simulated = coerce::first_present(record, &["simulated"])
        .and_then(coerce::as_boolean)
        .unwrap_or(false);
    let channel = coerce::first_string(record, &["channel", "source"]).unwrap_or_else(|| {
        if simulated {
            CHANNEL_SIMULATED.to_string()
        } else {
            CHANNEL_API.to_string()
        }
    });

    let message = coerce::first_string(record, &["message", "description"])
        .unwrap_or_else(|| format!("{} reported at {}", label, display_name));

    AlertFeedEntry {
        id,
        facility_id: coerce::first_string(record, &["phc_id", "phcId", "facility_id"])
            .unwrap_or_default(),
        local_government_area: coerce::first_string(record, &["lga", "phc_lga", "LGA"])
            .unwrap_or_default(),
        state: coerce::first_string(record, &["state", "phc_state", "State"]).unwrap_or_default(),
        level: coerce::first_string(record, &["level", "severity"])
            .and_then(|level| AlertLevel::parse(&level)),
        timestamp: record
            .get("timestamp")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|ts| !ts.is_empty())
            .map_or_else(|| fallback_time.to_string(), str::to_string),
        kind,
        label,
        display_name,
        score,
        message,
        channel,
        simulated,
    }
}

fn slug(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join("_")
}
