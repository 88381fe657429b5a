//! Area centroid lookup for facilities without coordinates.

use serde::{Deserialize, Serialize};

/// A latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Resolves an administrative area name to approximate coordinates.
pub trait AreaResolver {
    fn resolve(&self, area: &str) -> Option<Coordinates>;
}

/// A named area with its reference coordinate.
#[derive(Debug, Clone, Copy)]
pub struct AreaCentroid {
    pub area: &'static str,
    pub lat: f64,
    pub lon: f64,
}

/// Built-in local government area centroids.
pub const LGA_CENTROIDS: &[AreaCentroid] = &[
    AreaCentroid { area: "AMAC", lat: 9.0579, lon: 7.4951 },
    AreaCentroid { area: "Bwari", lat: 9.2833, lon: 7.3833 },
    AreaCentroid { area: "Gwagwalada", lat: 8.9430, lon: 7.0820 },
    AreaCentroid { area: "Kuje", lat: 8.8794, lon: 7.2276 },
    AreaCentroid { area: "Kwali", lat: 8.8839, lon: 7.0137 },
    AreaCentroid { area: "Abaji", lat: 8.4750, lon: 6.9450 },
    AreaCentroid { area: "Ikeja", lat: 6.6018, lon: 3.3515 },
    AreaCentroid { area: "Surulere", lat: 6.5000, lon: 3.3500 },
    AreaCentroid { area: "Kano Municipal", lat: 12.0000, lon: 8.5167 },
    AreaCentroid { area: "Ibadan North", lat: 7.4000, lon: 3.9000 },
    AreaCentroid { area: "Port Harcourt", lat: 4.8156, lon: 7.0498 },
    AreaCentroid { area: "Enugu North", lat: 6.4500, lon: 7.5000 },
    AreaCentroid { area: "Kaduna North", lat: 10.5264, lon: 7.4381 },
    AreaCentroid { area: "Jos North", lat: 9.9285, lon: 8.8921 },
    AreaCentroid { area: "Maiduguri", lat: 11.8333, lon: 13.1500 },
];

/// Fuzzy centroid lookup over a fixed table.
///
/// Matching is case-insensitive substring containment in either direction;
/// the first matching entry wins.
#[derive(Debug, Clone, Copy)]
pub struct CentroidTable {
    entries: &'static [AreaCentroid],
}

impl CentroidTable {
    pub fn new(entries: &'static [AreaCentroid]) -> Self {
        Self { entries }
    }
}

impl Default for CentroidTable {
    fn default() -> Self {
        Self::new(LGA_CENTROIDS)
    }
}

impl AreaResolver for CentroidTable {
    fn resolve(&self, area: &str) -> Option<Coordinates> {
        let needle = area.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }

        self.entries
            .iter()
            .find(|entry| {
                let name = entry.area.trim().to_lowercase();
                name == needle || name.contains(&needle) || needle.contains(&name)
            })
            .map(|entry| Coordinates::new(entry.lat, entry.lon))
    }
}
