//! Merging simulated alerts into the API feed.

use phc_core::{AlertFeedEntry, AlertKind, CHANNEL_SIMULATED};

use crate::simulated::SimulatedAlert;

impl SimulatedAlert {
    /// Project this alert into the feed shape.
    pub fn to_feed_entry(&self) -> AlertFeedEntry {
        let kind = AlertKind::from(self.kind);
        AlertFeedEntry {
            id: self.id.clone(),
            facility_id: self.facility_id.clone(),
            display_name: self.facility_name.clone(),
            local_government_area: self.local_government_area.clone(),
            state: self.state.clone(),
            label: kind.label(),
            kind,
            level: Some(self.severity.into()),
            score: None,
            message: self.message.clone(),
            timestamp: self.timestamp.clone(),
            channel: self
                .channel
                .clone()
                .unwrap_or_else(|| CHANNEL_SIMULATED.to_string()),
            simulated: true,
        }
    }
}

/// Build the combined feed: simulated alerts (store order) then API entries
/// (source order).
///
/// Entries are neither re-sorted nor de-duplicated.
pub fn merge_feed(
    api_entries: Vec<AlertFeedEntry>,
    simulated: &[SimulatedAlert],
) -> Vec<AlertFeedEntry> {
    let mut merged = Vec::with_capacity(simulated.len() + api_entries.len());
    merged.extend(simulated.iter().map(SimulatedAlert::to_feed_entry));
    merged.extend(api_entries);
    merged
}
