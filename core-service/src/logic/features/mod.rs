//! Features Module - Feature Schema
//!
//! Single named-field contract shared by request validation and model
//! training. Nothing outside this module maps names to positions.

pub mod layout;
pub mod vector;

#[cfg(test)]
mod tests;

// Re-export common types
pub use layout::{LayoutInfo, FEATURE_COUNT, FEATURE_LAYOUT, FEATURE_VERSION, TARGET_NAME};
pub use vector::{build_feature_vector, FeatureVector, FeatureVectorBuilder, RawInputs};
