//! Acknowledged ("resolved") feed entries.

use std::collections::BTreeSet;
use std::sync::Arc;

use phc_core::AlertFeedEntry;
use tracing::warn;

use crate::error::Result;
use crate::kv::KeyValueStore;

/// Storage key for the resolved id set.
pub const RESOLVED_ALERTS_KEY: &str = "resolvedAlerts";

/// Set of alert ids an operator has acknowledged, stored as a JSON array.
#[derive(Clone)]
pub struct ResolvedAlerts {
    kv: Arc<dyn KeyValueStore>,
}

impl ResolvedAlerts {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Load the resolved set. Corrupt storage reads as empty.
    pub fn load(&self) -> BTreeSet<String> {
        match self.kv.get(RESOLVED_ALERTS_KEY) {
            Ok(Some(stored)) => serde_json::from_str(&stored).unwrap_or_else(|e| {
                warn!("Discarding corrupt resolved alert set: {}", e);
                BTreeSet::new()
            }),
            Ok(None) => BTreeSet::new(),
            Err(e) => {
                warn!("Failed to read resolved alerts: {}", e);
                BTreeSet::new()
            }
        }
    }

    pub fn is_resolved(&self, id: &str) -> bool {
        self.load().contains(id)
    }

    /// Mark an alert resolved. Returns false if it already was.
    pub fn resolve(&self, id: &str) -> Result<bool> {
        let mut ids = self.load();
        let inserted = ids.insert(id.to_string());
        if inserted {
            self.save(&ids)?;
        }
        Ok(inserted)
    }

    /// Reopen a resolved alert. Returns false if it was not resolved.
    pub fn unresolve(&self, id: &str) -> Result<bool> {
        let mut ids = self.load();
        let removed = ids.remove(id);
        if removed {
            self.save(&ids)?;
        }
        Ok(removed)
    }

    /// Drop resolved entries from a feed, keeping order.
    pub fn retain_unresolved(&self, entries: Vec<AlertFeedEntry>) -> Vec<AlertFeedEntry> {
        let ids = self.load();
        entries
            .into_iter()
            .filter(|entry| !ids.contains(&entry.id))
            .collect()
    }

    fn save(&self, ids: &BTreeSet<String>) -> Result<()> {
        self.kv.set(RESOLVED_ALERTS_KEY, &serde_json::to_string(ids)?)
    }
}
