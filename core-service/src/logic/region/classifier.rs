//! Risk Classifier
//!
//! Input: RegionStat. Output: RiskBand.
//! Recomputed independently on every call: no hysteresis, so a region near
//! the threshold may flip between calls as the data changes.

use super::rules::RiskThresholds;
use super::types::{RegionStat, RiskBand};

/// Classify with the default threshold (> 50 ⇒ High)
pub fn classify(stat: &RegionStat) -> RiskBand {
    classify_with_thresholds(stat, &RiskThresholds::default())
}

/// Classify with custom thresholds
pub fn classify_with_thresholds(stat: &RegionStat, thresholds: &RiskThresholds) -> RiskBand {
    classify_mean(stat.mean_infected, thresholds)
}

/// Classify a raw mean
pub fn classify_mean(mean_infected: f64, thresholds: &RiskThresholds) -> RiskBand {
    if mean_infected > thresholds.high_min_exclusive {
        RiskBand::High
    } else {
        RiskBand::Low
    }
}
