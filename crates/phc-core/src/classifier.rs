//! Alert type classification.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::coerce;

/// Canonical alert category.
///
/// Unrecognized server categories are carried verbatim in `Other` so that
/// new upstream kinds still render.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AlertKind {
    Outbreak,
    Resource,
    Underserved,
    Connectivity,
    /// Catch-all for empty or missing input.
    Alert,
    Other(String),
}

impl AlertKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Outbreak => "outbreak",
            Self::Resource => "resource",
            Self::Underserved => "underserved",
            Self::Connectivity => "connectivity",
            Self::Alert => "alert",
            Self::Other(kind) => kind,
        }
    }

    /// Human-readable label for this kind.
    pub fn label(&self) -> String {
        match self {
            Self::Outbreak => "Outbreak Alert".to_string(),
            Self::Resource => "Resource Warning".to_string(),
            Self::Underserved => "Underserved Facility".to_string(),
            Self::Connectivity => "Connectivity Alert".to_string(),
            other => coerce::capitalize(other.as_str()),
        }
    }
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for AlertKind {
    fn from(raw: String) -> Self {
        classify_alert_type(Some(&raw))
    }
}

impl From<AlertKind> for String {
    fn from(kind: AlertKind) -> Self {
        kind.as_str().to_string()
    }
}

/// Fold a free-text alert type into its canonical kind.
///
/// Lookup is trimmed and case-insensitive. Unknown non-empty input passes
/// through lowercased; empty or missing input is `Alert`.
pub fn classify_alert_type(raw: Option<&str>) -> AlertKind {
    let normalized = raw.unwrap_or_default().trim().to_lowercase();
    match normalized.as_str() {
        "outbreak alert" | "outbreak" => AlertKind::Outbreak,
        "resource risk" | "resource warning" | "resource" | "warning" => AlertKind::Resource,
        "underserved facility" | "underserved" => AlertKind::Underserved,
        "connectivity" | "connectivity alert" => AlertKind::Connectivity,
        "" | "alert" => AlertKind::Alert,
        _ => AlertKind::Other(normalized),
    }
}

/// Label for a kind. See [`AlertKind::label`].
pub fn label_for(kind: &AlertKind) -> String {
    kind.label()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synonym_folding() {
        assert_eq!(classify_alert_type(Some("Resource Warning")), AlertKind::Resource);
        assert_eq!(classify_alert_type(Some("resource")), AlertKind::Resource);
        assert_eq!(classify_alert_type(Some("  RESOURCE  ")), AlertKind::Resource);
        assert_eq!(classify_alert_type(Some("warning")), AlertKind::Resource);
        assert_eq!(classify_alert_type(Some("Resource Risk")), AlertKind::Resource);
        assert_eq!(classify_alert_type(Some("Outbreak Alert")), AlertKind::Outbreak);
        assert_eq!(
            classify_alert_type(Some("underserved facility")),
            AlertKind::Underserved
        );
        assert_eq!(classify_alert_type(Some("Connectivity")), AlertKind::Connectivity);
    }

    #[test]
    fn test_empty_is_generic_alert() {
        assert_eq!(classify_alert_type(None), AlertKind::Alert);
        assert_eq!(classify_alert_type(Some("   ")), AlertKind::Alert);
    }

    #[test]
    fn test_unknown_passes_through() {
        let kind = classify_alert_type(Some(" Flood "));
        assert_eq!(kind, AlertKind::Other("flood".to_string()));
        assert_eq!(kind.as_str(), "flood");
        assert_eq!(label_for(&kind), "Flood");
    }

    #[test]
    fn test_labels() {
        assert_eq!(label_for(&AlertKind::Outbreak), "Outbreak Alert");
        assert_eq!(label_for(&AlertKind::Resource), "Resource Warning");
        assert_eq!(label_for(&AlertKind::Underserved), "Underserved Facility");
        assert_eq!(label_for(&AlertKind::Connectivity), "Connectivity Alert");
        assert_eq!(label_for(&AlertKind::Alert), "Alert");
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&AlertKind::Underserved).unwrap();
        assert_eq!(json, "\"underserved\"");
        let kind: AlertKind = serde_json::from_str("\"Outbreak Alert\"").unwrap();
        assert_eq!(kind, AlertKind::Outbreak);
    }
}
