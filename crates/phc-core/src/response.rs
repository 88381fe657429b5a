//! Normalizers for whole API responses.
//!
//! Every normalizer accepts either a bare array or an object wrapping the
//! collection under a known key. Anything else is an empty collection.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::coerce::{self, RawRecord};
use crate::facility::{normalize_facility, Facility};

/// Default size of the computed underserved ranking.
pub const DEFAULT_TOP_N: usize = 5;

const COLLECTION_KEYS: &[&str] = &["data", "feed"];
const TOP_LIST_KEYS: &[&str] = &["top_underserved_phcs", "top", "top_n"];

/// Return the records of a payload, unwrapping the first matching key.
pub fn unwrap_collection<'a>(payload: &'a Value, keys: &[&str]) -> &'a [Value] {
    let source = keys
        .iter()
        .filter_map(|key| payload.get(*key))
        .find(|value| value.is_array())
        .unwrap_or(payload);

    source.as_array().map(Vec::as_slice).unwrap_or(&[])
}

/// Normalize a facility list (`GET /outbreak-alerts`).
pub fn normalize_facility_list(payload: &Value) -> Vec<Facility> {
    unwrap_collection(payload, COLLECTION_KEYS)
        .iter()
        .enumerate()
        .map(|(index, raw)| normalize_facility(raw, index))
        .collect()
}

/// One row of the underserved ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopUnderserved {
    pub canonical_name: String,
    pub display_name: String,
    pub underserved_index: f64,
}

/// Aggregates over the underserved collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnderservedSummary {
    pub average_underserved_index: f64,
    pub top_underserved_facilities: Vec<TopUnderserved>,
}

/// Normalized `GET /underserved` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnderservedResponse {
    pub summary: UnderservedSummary,
    pub count: usize,
    pub data: Vec<Facility>,
}

/// Normalize an underserved response with the default ranking size.
pub fn normalize_underserved_response(payload: &Value) -> UnderservedResponse {
    normalize_underserved_response_with(payload, DEFAULT_TOP_N)
}

/// Normalize an underserved response, computing missing aggregates.
pub fn normalize_underserved_response_with(payload: &Value, top_n: usize) -> UnderservedResponse {
    let data: Vec<Facility> = unwrap_collection(payload, COLLECTION_KEYS)
        .iter()
        .enumerate()
        .map(|(index, raw)| normalize_facility(raw, index))
        .collect();

    let summary = payload.get("summary").and_then(Value::as_object);

    let average_underserved_index = summary
        .and_then(|s| s.get("avg_underserved_index").or_else(|| s.get("average_underserved_index")))
        .and_then(coerce::as_number)
        .unwrap_or_else(|| mean_underserved_index(&data));

    let top_underserved_facilities = summary
        .map(source_top_list)
        .filter(|top| !top.is_empty())
        .unwrap_or_else(|| compute_top_underserved(&data, top_n));

    let count = payload
        .get("count")
        .and_then(Value::as_u64)
        .map(|c| c as usize)
        .unwrap_or(data.len());

    UnderservedResponse {
        summary: UnderservedSummary {
            average_underserved_index,
            top_underserved_facilities,
        },
        count,
        data,
    }
}

/// Mean of the present underserved indices, rounded to 3 places.
pub fn mean_underserved_index(facilities: &[Facility]) -> f64 {
    let present: Vec<f64> = facilities.iter().filter_map(|f| f.underserved_index).collect();
    if present.is_empty() {
        return 0.0;
    }
    let mean = present.iter().sum::<f64>() / present.len() as f64;
    coerce::round_to(mean, 3)
}

/// Rank facilities by underserved index, highest first.
///
/// Missing indices rank as 0. The sort is stable so equal scores keep their
/// original order.
pub fn compute_top_underserved(facilities: &[Facility], top_n: usize) -> Vec<TopUnderserved> {
    let mut ranked: Vec<&Facility> = facilities.iter().collect();
    ranked.sort_by(|a, b| {
        let a = a.underserved_index.unwrap_or(0.0);
        let b = b.underserved_index.unwrap_or(0.0);
        b.total_cmp(&a)
    });

    ranked
        .into_iter()
        .take(top_n)
        .map(|f| TopUnderserved {
            canonical_name: f.canonical_name.clone(),
            display_name: f.display_name.clone(),
            underserved_index: f.underserved_index.unwrap_or(0.0),
        })
        .collect()
}

fn source_top_list(summary: &RawRecord) -> Vec<TopUnderserved> {
    let Some(items) = coerce::first_present(summary, TOP_LIST_KEYS).and_then(Value::as_array)
    else {
        return Vec::new();
    };

    items
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            let empty = RawRecord::new();
            let record = item.as_object().unwrap_or(&empty);
            let display_name = coerce::first_string(record, &["display_name", "name", "phc_name"])
                .unwrap_or_else(|| format!("Facility {}", idx + 1));
            let canonical_name = coerce::first_string(record, &["name", "phc_name"])
                .unwrap_or_else(|| display_name.clone())
                .to_lowercase();
            TopUnderserved {
                canonical_name,
                display_name,
                underserved_index: record
                    .get("underserved_index")
                    .and_then(coerce::as_number)
                    .unwrap_or(0.0),
            }
        })
        .collect()
}

/// Connectivity advice for one facility (`GET /telecom-advice`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelecomAdvice {
    pub facility_id: String,
    pub facility_name: String,
    pub network_quality: String,
    pub recommended_provider: String,
    pub signal_strength: f64,
    pub advice: String,
}

/// Normalize a telecom advice list.
pub fn normalize_telecom_advice(payload: &Value) -> Vec<TelecomAdvice> {
    unwrap_collection(payload, &["data"])
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let empty = RawRecord::new();
            let record = item.as_object().unwrap_or(&empty);
            let advice = coerce::first_string(record, &["advice"]).unwrap_or_else(|| {
                let channel = coerce::first_string(record, &["preferred_channel"])
                    .unwrap_or_else(|| "SMS".to_string());
                format!("Preferred channel: {}", channel)
            });

            TelecomAdvice {
                facility_id: coerce::first_string(record, &["phc_id", "id", "name"])
                    .unwrap_or_else(|| format!("telecom_{}", index)),
                facility_name: coerce::first_string(record, &["display_name", "phc_name", "name"])
                    .unwrap_or_else(|| format!("Facility {}", index + 1)),
                network_quality: coerce::first_string(record, &["network_quality", "telecom_notes"])
                    .unwrap_or_default(),
                recommended_provider: coerce::first_string(
                    record,
                    &["recommended_provider", "preferred_provider"],
                )
                .unwrap_or_default(),
                signal_strength: record
                    .get("signal_strength")
                    .and_then(coerce::as_number)
                    .unwrap_or(0.0),
                advice,
            }
        })
        .collect()
}
