//! Permissive coercion of untyped JSON values.
//!
//! Upstream payloads drift in shape: a score may arrive as `3.2` or `"3.2"`,
//! a flag as `true`, `1` or `"yes"`. These helpers never fail; they return
//! `None` when a value cannot be read as the requested type and let callers
//! pick the fallback.

use serde_json::{Map, Value};

/// A raw, loosely-typed record as received from the API or a fixture.
pub type RawRecord = Map<String, Value>;

/// Read a value as a trimmed string.
///
/// Strings are trimmed, numbers and booleans are rendered. `null`, arrays and
/// objects yield `None`.
pub fn as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Read a value as a finite number.
///
/// Numeric-looking strings are parsed. Non-finite results are rejected.
pub fn as_number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                trimmed.parse::<f64>().ok()
            }
        }
        _ => None,
    };
    parsed.filter(|n| n.is_finite())
}

/// Read a value as a boolean.
///
/// Accepts booleans, `1`/`0`, and the strings `true/false`, `1/0`, `yes/no`,
/// `y/n` in any case.
pub fn as_boolean(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_f64() {
            Some(x) if x == 1.0 => Some(true),
            Some(x) if x == 0.0 => Some(false),
            _ => None,
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "y" => Some(true),
            "false" | "0" | "no" | "n" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Return the first alias whose value is present and not `null`.
pub fn first_present<'a>(record: &'a RawRecord, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| record.get(*key))
        .find(|value| !value.is_null())
}

/// Return the first alias that coerces to a non-empty string.
pub fn first_string(record: &RawRecord, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| record.get(*key))
        .filter_map(as_string)
        .find(|s| !s.is_empty())
}

/// Read an optional numeric field.
///
/// Returns `None` when no alias is present, `Some(0.0)` when the field is
/// present but unparsable, and the parsed value otherwise.
pub fn optional_number(record: &RawRecord, keys: &[&str]) -> Option<f64> {
    first_present(record, keys).map(|value| as_number(value).unwrap_or(0.0))
}

/// Uppercase the first character, leaving the rest untouched.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Round to a fixed number of decimal places.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
