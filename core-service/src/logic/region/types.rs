//! Region Types
//!
//! Data structures only, no aggregation logic.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::rules::{HIGH_RISK_COLOUR, LOW_RISK_COLOUR};

// ============================================================================
// RISK BAND
// ============================================================================

/// Infection risk band of a region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskBand {
    Low,
    High,
}

impl RiskBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskBand::Low => "low",
            RiskBand::High => "high",
        }
    }

    /// Marker colour on the map
    pub fn colour(&self) -> &'static str {
        match self {
            RiskBand::Low => LOW_RISK_COLOUR,
            RiskBand::High => HIGH_RISK_COLOUR,
        }
    }
}

impl std::fmt::Display for RiskBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// REGION STAT
// ============================================================================

/// Mean infection load of one region over all its records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionStat {
    pub region_id: String,
    pub mean_infected: f64,
    pub record_count: usize,
}

impl RegionStat {
    pub fn new(region_id: impl Into<String>, mean_infected: f64) -> Self {
        Self {
            region_id: region_id.into(),
            mean_infected,
            record_count: 0,
        }
    }
}

// ============================================================================
// MAP OUTPUT
// ============================================================================

/// Latitude / longitude in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// One circle marker for the map layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionMarker {
    pub region_id: String,
    pub coordinates: Coordinates,
    pub band: RiskBand,
    pub mean_infected: f64,
    pub colour: String,
    pub tooltip: String,
}

/// One day of a region's chart series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub temperature: f64,
    pub humidity: f64,
    pub trees_infected: u32,
}
