//! Region Module
//!
//! Per-region infection load and risk banding for the map view.
//!
//! ## Structure
//! - `types`: RiskBand, RegionStat, RegionMarker, SeriesPoint
//! - `rules`: threshold and colours
//! - `aggregate`: grouping and means
//! - `classifier`: RegionStat → RiskBand
//! - `markers`: coordinate lookup and map markers
//!
//! ## Usage
//! ```ignore
//! let stats = region::aggregate(dataset.records());
//! for stat in &stats {
//!     println!("{} → {}", stat.region_id, region::classify(stat));
//! }
//! ```

pub mod aggregate;
pub mod classifier;
pub mod markers;
pub mod rules;
pub mod types;

// Re-export main types for convenience
pub use types::{Coordinates, RegionMarker, RegionStat, RiskBand, SeriesPoint};

pub use rules::{RiskThresholds, HIGH_RISK_THRESHOLD};

pub use aggregate::{aggregate, region_series, region_stat};
pub use classifier::{classify, classify_mean, classify_with_thresholds};
pub use markers::{build_markers, RegionDirectory};
