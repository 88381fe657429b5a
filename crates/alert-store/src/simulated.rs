//! The simulated alert log.
//!
//! Operators can "send" an outreach alert for a facility from the dashboard.
//! Those alerts never reach a server; they are kept newest-first in the local
//! key-value store under [`SIMULATED_ALERTS_KEY`], capped at
//! [`MAX_SIMULATED_ALERTS`] entries.

use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use phc_core::{iso_timestamp, AlertKind, AlertLevel, Facility};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::Result;
use crate::kv::KeyValueStore;
use crate::signals::{AlertSignal, AlertSignals};

/// Storage key for the simulated alert list.
pub const SIMULATED_ALERTS_KEY: &str = "simulatedAlerts";

/// Maximum number of retained simulated alerts.
pub const MAX_SIMULATED_ALERTS: usize = 100;

/// The alert kinds an operator can trigger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimulatedKind {
    #[default]
    Outbreak,
    Resource,
    Underserved,
}

impl SimulatedKind {
    /// Fixed severity for each kind.
    pub fn severity(&self) -> Severity {
        match self {
            Self::Outbreak => Severity::High,
            Self::Resource => Severity::Medium,
            Self::Underserved => Severity::Low,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Outbreak => "outbreak",
            Self::Resource => "resource",
            Self::Underserved => "underserved",
        }
    }

    /// Outreach message template for a facility name.
    pub fn message_for(&self, facility_name: &str) -> String {
        match self {
            Self::Outbreak => format!(
                "Malaria outbreak detected at {}. Cases increased significantly.",
                facility_name
            ),
            Self::Resource => format!(
                "Resource shortage at {}. Critical drug stock levels reported.",
                facility_name
            ),
            Self::Underserved => format!(
                "{} flagged as underserved. Requires immediate attention.",
                facility_name
            ),
        }
    }
}

impl fmt::Display for SimulatedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SimulatedKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "outbreak" => Ok(Self::Outbreak),
            "resource" => Ok(Self::Resource),
            "underserved" => Ok(Self::Underserved),
            other => Err(format!(
                "unknown alert kind '{}' (expected outbreak, resource or underserved)",
                other
            )),
        }
    }
}

impl From<SimulatedKind> for AlertKind {
    fn from(kind: SimulatedKind) -> Self {
        match kind {
            SimulatedKind::Outbreak => AlertKind::Outbreak,
            SimulatedKind::Resource => AlertKind::Resource,
            SimulatedKind::Underserved => AlertKind::Underserved,
        }
    }
}

/// Severity of a simulated alert.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    #[default]
    High,
}

impl From<Severity> for AlertLevel {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Low => AlertLevel::Low,
            Severity::Medium => AlertLevel::Medium,
            Severity::High => AlertLevel::High,
        }
    }
}

/// A locally recorded outreach alert. Immutable once created.
///
/// Field names on disk match the dashboard's existing `simulatedAlerts`
/// entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulatedAlert {
    pub id: String,
    #[serde(rename = "phc_id")]
    pub facility_id: String,
    #[serde(rename = "phc_name")]
    pub facility_name: String,
    #[serde(rename = "phc_lga", default)]
    pub local_government_area: String,
    #[serde(rename = "phc_state", default)]
    pub state: String,
    #[serde(rename = "alert_type", alias = "type", default)]
    pub kind: SimulatedKind,
    #[serde(default)]
    pub severity: Severity,
    pub message: String,
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
}

impl SimulatedAlert {
    /// Build a new alert for a facility, stamped with the current time.
    pub fn new(facility: &Facility, kind: SimulatedKind) -> Self {
        let now = Utc::now();
        Self {
            id: generate_id(now.timestamp_millis()),
            facility_id: facility.id.clone(),
            facility_name: facility.display_name.clone(),
            local_government_area: facility.local_government_area.clone(),
            state: facility.state.clone(),
            kind,
            severity: kind.severity(),
            message: kind.message_for(&facility.display_name),
            timestamp: iso_timestamp(now),
            channel: None,
        }
    }
}

/// `sim_<millis>_<9 random base-36 chars>`.
fn generate_id(millis: i64) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(9)
        .map(|b| (b as char).to_ascii_lowercase())
        .collect();
    format!("sim_{}_{}", millis, suffix)
}

/// Persisted log of simulated alerts.
///
/// `record` and `clear` each do one read-modify-write against the backing
/// store and then broadcast a signal. Listeners should call [`load`] again
/// on any signal.
///
/// [`load`]: SimulatedAlertStore::load
#[derive(Clone)]
pub struct SimulatedAlertStore {
    kv: Arc<dyn KeyValueStore>,
    signals: AlertSignals,
}

impl SimulatedAlertStore {
    pub fn new(kv: Arc<dyn KeyValueStore>, signals: AlertSignals) -> Self {
        Self { kv, signals }
    }

    /// The signal channel this store notifies.
    pub fn signals(&self) -> &AlertSignals {
        &self.signals
    }

    /// Read the log, newest first.
    ///
    /// Unreadable or corrupt storage is logged and reads as empty.
    pub fn load(&self) -> Vec<SimulatedAlert> {
        let stored = match self.kv.get(SIMULATED_ALERTS_KEY) {
            Ok(Some(stored)) => stored,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!("Failed to read simulated alerts: {}", e);
                return Vec::new();
            }
        };

        let entries: Vec<serde_json::Value> = match serde_json::from_str(&stored) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Discarding corrupt simulated alert log: {}", e);
                return Vec::new();
            }
        };

        let total = entries.len();
        let alerts: Vec<SimulatedAlert> = entries
            .into_iter()
            .filter_map(|entry| serde_json::from_value(entry).ok())
            .collect();

        if alerts.len() < total {
            warn!(
                skipped = total - alerts.len(),
                "Skipping unreadable simulated alert entries"
            );
        }
        alerts
    }

    /// Record a new alert for `facility` and notify listeners.
    pub fn record(&self, facility: &Facility, kind: SimulatedKind) -> Result<SimulatedAlert> {
        let alert = SimulatedAlert::new(facility, kind);

        let mut alerts = self.load();
        alerts.insert(0, alert.clone());
        alerts.truncate(MAX_SIMULATED_ALERTS);

        self.kv
            .set(SIMULATED_ALERTS_KEY, &serde_json::to_string(&alerts)?)?;

        info!(
            alert_id = %alert.id,
            facility = %alert.facility_name,
            kind = %kind,
            "Recorded simulated alert"
        );
        self.signals.notify(AlertSignal::AlertSimulated);
        Ok(alert)
    }

    /// Remove the whole log and notify listeners.
    pub fn clear(&self) -> Result<()> {
        self.kv.remove(SIMULATED_ALERTS_KEY)?;
        info!("Cleared simulated alert log");
        self.signals.notify(AlertSignal::AlertsCleared);
        Ok(())
    }
}

impl fmt::Debug for SimulatedAlertStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimulatedAlertStore")
            .field("signals", &self.signals)
            .finish_non_exhaustive()
    }
}
