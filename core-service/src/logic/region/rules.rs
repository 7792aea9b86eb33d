//! Risk Band Rules & Thresholds
//!
//! Constants and config only. Classification logic lives in `classifier.rs`.

use serde::{Deserialize, Serialize};

/// Mean infected trees strictly above this = High risk
pub const HIGH_RISK_THRESHOLD: f64 = 50.0;

/// Map marker colour for High risk regions
pub const HIGH_RISK_COLOUR: &str = "red";

/// Map marker colour for Low risk regions
pub const LOW_RISK_COLOUR: &str = "green";

/// Thresholds for risk banding (configurable)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskThresholds {
    /// Strictly above this mean = High
    pub high_min_exclusive: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            high_min_exclusive: HIGH_RISK_THRESHOLD,
        }
    }
}

impl RiskThresholds {
    pub fn new(high_min_exclusive: f64) -> Self {
        Self { high_min_exclusive }
    }
}
