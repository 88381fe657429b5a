//! Canonical facility record and the field normalizer.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::areas::{AreaResolver, CentroidTable, Coordinates};
use crate::coerce::{self, RawRecord};

const DISPLAY_NAME_KEYS: &[&str] = &[
    "display_name",
    "displayName",
    "Name of Primary Health Center",
    "Name of Primary Health Centre",
    "PHC Name",
    "phc_name",
    "name",
];
const CANONICAL_NAME_KEYS: &[&str] = &["name", "phc_name"];
const AREA_KEYS: &[&str] = &["lga", "PHC LGA", "phc_lga", "local_government_area"];
const STATE_KEYS: &[&str] = &["state", "State of PHC", "phc_state"];
const UNDERSERVED_INDEX_KEYS: &[&str] = &["underserved_index", "underservedIndex", "index"];
const UNDERSERVED_FLAG_KEYS: &[&str] = &["underserved_flag", "underservedFlag", "underserved"];
const SHORTAGE_SCORE_KEYS: &[&str] = &["shortage_score", "shortageScore", "score"];
const RESOURCE_RISK_KEYS: &[&str] = &["resource_risk_score", "resourceRiskScore", "risk_score"];
const ALERT_LEVEL_KEYS: &[&str] = &["alert_level", "alertLevel"];

/// Output field names; raw keys with these names are not passed through.
const CANONICAL_FIELDS: &[&str] = &[
    "id",
    "canonical_name",
    "display_name",
    "local_government_area",
    "state",
    "coordinates",
    "underserved_index",
    "underserved_flag",
    "shortage_score",
    "resource_risk_score",
    "alert_level",
];

/// Three-step alert level shared by facilities and feed entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlertLevel {
    Low,
    Medium,
    High,
}

impl AlertLevel {
    /// Parse a free-text level. `critical` folds into `High`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" | "critical" => Some(Self::High),
            _ => None,
        }
    }

    /// Derive a level from a shortage score.
    pub fn from_shortage_score(score: f64) -> Self {
        if score >= 3.0 {
            Self::High
        } else if score >= 2.0 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A canonical Primary Health Center record.
///
/// Every field listed here is always present and well-typed; only the
/// `Option` fields may be missing. Raw fields that are not part of the
/// canonical shape are kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    pub id: String,
    pub canonical_name: String,
    pub display_name: String,
    pub local_government_area: String,
    pub state: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underserved_index: Option<f64>,
    #[serde(default)]
    pub underserved_flag: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shortage_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_risk_score: Option<f64>,
    pub alert_level: AlertLevel,
    #[serde(flatten)]
    pub extra: RawRecord,
}

/// Normalize one raw facility record using the built-in centroid table.
pub fn normalize_facility(raw: &Value, index: usize) -> Facility {
    normalize_facility_with(raw, index, &CentroidTable::default())
}

/// Normalize one raw facility record with a caller-supplied area resolver.
///
/// Never fails: non-object input is treated as an empty record.
pub fn normalize_facility_with(
    raw: &Value,
    index: usize,
    resolver: &dyn AreaResolver,
) -> Facility {
    let empty = RawRecord::new();
    let record = raw.as_object().unwrap_or(&empty);

    let display_name = coerce::first_string(record, DISPLAY_NAME_KEYS)
        .unwrap_or_else(|| format!("Facility {}", index + 1));

    let canonical_name = coerce::first_string(record, CANONICAL_NAME_KEYS)
        .unwrap_or_else(|| display_name.clone())
        .to_lowercase();

    let id = coerce::first_string(record, &["id"])
        .or_else(|| Some(canonical_name.clone()).filter(|name| !name.is_empty()))
        .unwrap_or_else(|| format!("facility_{}", index));

    let local_government_area = coerce::first_string(record, AREA_KEYS).unwrap_or_default();
    let state = coerce::first_string(record, STATE_KEYS).unwrap_or_default();

    let coordinates =
        raw_coordinates(record).or_else(|| resolver.resolve(&local_government_area));

    let shortage_score = coerce::optional_number(record, SHORTAGE_SCORE_KEYS);
    let alert_level = coerce::first_string(record, ALERT_LEVEL_KEYS)
        .and_then(|level| AlertLevel::parse(&level))
        .unwrap_or_else(|| AlertLevel::from_shortage_score(shortage_score.unwrap_or(0.0)));

    let mut extra = record.clone();
    for field in CANONICAL_FIELDS {
        extra.remove(*field);
    }

    Facility {
        id,
        canonical_name,
        display_name,
        local_government_area,
        state,
        coordinates,
        underserved_index: coerce::optional_number(record, UNDERSERVED_INDEX_KEYS),
        underserved_flag: coerce::first_present(record, UNDERSERVED_FLAG_KEYS)
            .and_then(coerce::as_boolean)
            .unwrap_or(false),
        shortage_score,
        resource_risk_score: coerce::optional_number(record, RESOURCE_RISK_KEYS),
        alert_level,
        extra,
    }
}

fn raw_coordinates(record: &RawRecord) -> Option<Coordinates> {
    let number = |keys: &[&str]| coerce::first_present(record, keys).and_then(coerce::as_number);
    let lat = number(&["lat", "latitude"])?;
    let lon = number(&["lon", "lng", "longitude"])?;
    Some(Coordinates::new(lat, lon))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scenario_asokoro() {
        let raw = json!({
            "PHC Name": "Asokoro PHC",
            "PHC LGA": "AMAC",
            "shortage_score": "3.2"
        });
        let facility = normalize_facility(&raw, 0);

        assert_eq!(facility.id, "asokoro phc");
        assert_eq!(facility.canonical_name, "asokoro phc");
        assert_eq!(facility.display_name, "Asokoro PHC");
        assert_eq!(facility.local_government_area, "AMAC");
        assert_eq!(facility.state, "");
        assert_eq!(facility.shortage_score, Some(3.2));
        assert_eq!(facility.alert_level, AlertLevel::High);
        assert_eq!(facility.underserved_index, None);
        assert!(!facility.underserved_flag);
        // AMAC resolves through the centroid table.
        assert_eq!(facility.coordinates, Some(Coordinates::new(9.0579, 7.4951)));
    }

    #[test]
    fn test_missing_names_fall_back_to_index() {
        let facility = normalize_facility(&json!({}), 0);
        assert_eq!(facility.display_name, "Facility 1");
        assert_eq!(facility.canonical_name, "facility 1");
        assert_eq!(facility.id, "facility 1");

        let facility = normalize_facility(&json!({"name": "   "}), 6);
        assert_eq!(facility.display_name, "Facility 7");
    }

    #[test]
    fn test_non_object_input() {
        let facility = normalize_facility(&json!("garbage"), 2);
        assert_eq!(facility.display_name, "Facility 3");
        assert_eq!(facility.local_government_area, "");
        assert!(facility.coordinates.is_none());
        assert!(facility.extra.is_empty());
    }

    #[test]
    fn test_invalid_number_becomes_zero() {
        let facility = normalize_facility(&json!({"underserved_index": "not-a-number"}), 0);
        assert_eq!(facility.underserved_index, Some(0.0));
    }

    #[test]
    fn test_alert_level_derivation() {
        let level = |score: f64| normalize_facility(&json!({"shortageScore": score}), 0).alert_level;
        assert_eq!(level(2.5), AlertLevel::Medium);
        assert_eq!(level(3.0), AlertLevel::High);
        assert_eq!(level(1.0), AlertLevel::Low);
        assert_eq!(level(0.5), AlertLevel::Low);
    }

    #[test]
    fn test_source_alert_level_wins() {
        let facility = normalize_facility(&json!({"alert_level": "hIGH", "shortage_score": 0.1}), 0);
        assert_eq!(facility.alert_level, AlertLevel::High);

        let facility = normalize_facility(&json!({"alertLevel": "critical"}), 0);
        assert_eq!(facility.alert_level, AlertLevel::High);

        // Unknown levels are ignored in favour of the derived one.
        let facility = normalize_facility(&json!({"alert_level": "purple", "score": 2}), 0);
        assert_eq!(facility.alert_level, AlertLevel::Medium);
    }

    #[test]
    fn test_canonical_name_prefers_raw_name() {
        let facility = normalize_facility(
            &json!({"display_name": "Kuje General PHC", "phc_name": " KUJE PHC "}),
            0,
        );
        assert_eq!(facility.display_name, "Kuje General PHC");
        assert_eq!(facility.canonical_name, "kuje phc");
    }

    #[test]
    fn test_numeric_id_and_flags() {
        let facility = normalize_facility(
            &json!({"id": 42, "name": "Bwari PHC", "underserved": "yes", "risk_score": 0.4}),
            0,
        );
        assert_eq!(facility.id, "42");
        assert!(facility.underserved_flag);
        assert_eq!(facility.resource_risk_score, Some(0.4));
    }

    #[test]
    fn test_explicit_coordinates_take_precedence() {
        let facility = normalize_facility(
            &json!({"name": "X", "lga": "AMAC", "latitude": "9.1", "longitude": 7.3}),
            0,
        );
        assert_eq!(facility.coordinates, Some(Coordinates::new(9.1, 7.3)));

        let facility = normalize_facility(&json!({"name": "X", "lga": "Nowhere"}), 0);
        assert_eq!(facility.coordinates, None);
    }

    #[test]
    fn test_custom_resolver() {
        struct Fixed;
        impl AreaResolver for Fixed {
            fn resolve(&self, _area: &str) -> Option<Coordinates> {
                Some(Coordinates::new(1.0, 2.0))
            }
        }
        let facility = normalize_facility_with(&json!({"name": "X"}), 0, &Fixed);
        assert_eq!(facility.coordinates, Some(Coordinates::new(1.0, 2.0)));
    }

    #[test]
    fn test_extra_fields_pass_through() {
        let facility = normalize_facility(
            &json!({"name": "X", "ward": "Garki II", "display_name": "X PHC"}),
            0,
        );
        assert_eq!(facility.extra.get("ward"), Some(&json!("Garki II")));
        assert!(!facility.extra.contains_key("display_name"));

        let serialized = serde_json::to_value(&facility).unwrap();
        assert_eq!(serialized["ward"], json!("Garki II"));
        assert_eq!(serialized["display_name"], json!("X PHC"));
        assert_eq!(serialized["alert_level"], json!("Low"));
    }

    #[test]
    fn test_normalization_is_pure() {
        let raw = json!({"PHC Name": "Asokoro PHC", "shortage_score": "2.2", "x": [1, 2]});
        assert_eq!(normalize_facility(&raw, 3), normalize_facility(&raw, 3));
    }
}
