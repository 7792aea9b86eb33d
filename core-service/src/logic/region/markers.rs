//! Map Markers
//!
//! Coordinates are not part of the dataset. They come from a
//! [`RegionDirectory`], by default the six Apulian provinces.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::classifier::classify_with_thresholds;
use super::rules::RiskThresholds;
use super::types::{Coordinates, RegionMarker, RegionStat};
use crate::logic::error::ConfigError;

const APULIA_PROVINCES: &[(&str, f64, f64)] = &[
    ("Lecce", 40.3515, 18.1750),
    ("Brindisi", 40.6327, 17.9418),
    ("Taranto", 40.4644, 17.2470),
    ("Bari", 41.1171, 16.8719),
    ("BAT", 41.2279, 16.2956),
    ("Foggia", 41.4622, 15.5446),
];

/// Region id → coordinates lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionDirectory {
    entries: HashMap<String, Coordinates>,
}

impl Default for RegionDirectory {
    fn default() -> Self {
        Self::apulia()
    }
}

impl RegionDirectory {
    /// The six Apulian provinces
    pub fn apulia() -> Self {
        let entries = APULIA_PROVINCES
            .iter()
            .map(|&(name, lat, lon)| (name.to_string(), Coordinates::new(lat, lon)))
            .collect();
        Self { entries }
    }

    /// Load `{ "Region": { "lat": .., "lon": .. }, .. }` from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&contents)?)
    }

    pub fn get(&self, region_id: &str) -> Option<Coordinates> {
        self.entries.get(region_id).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Tooltip shown on hover
pub fn tooltip(stat: &RegionStat) -> String {
    format!("{}: {:.2} infected trees", stat.region_id, stat.mean_infected)
}

/// Build one marker per region that has coordinates
pub fn build_markers(
    stats: &[RegionStat],
    directory: &RegionDirectory,
    thresholds: &RiskThresholds,
) -> Vec<RegionMarker> {
    stats
        .iter()
        .filter_map(|stat| {
            let Some(coordinates) = directory.get(&stat.region_id) else {
                log::warn!("No coordinates for region '{}', marker skipped", stat.region_id);
                return None;
            };
            let band = classify_with_thresholds(stat, thresholds);
            Some(RegionMarker {
                region_id: stat.region_id.clone(),
                coordinates,
                band,
                mean_infected: stat.mean_infected,
                colour: band.colour().to_string(),
                tooltip: tooltip(stat),
            })
        })
        .collect()
}
