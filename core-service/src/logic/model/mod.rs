//! Model Module - Regression engine
//!
//! Trains a seeded random forest once from the historical records and
//! exposes a pure prediction function over schema-built feature vectors.

pub mod forest;
pub mod inference;
pub mod tree;

// Re-export common types
pub use forest::{FitStats, ForestConfig, RandomForestRegressor};
pub use inference::{train, train_dataset, ModelMetadata, TrainedModel};

/// Seam between fitted estimators and the model wrapper
pub trait Regressor: Send + Sync {
    /// Predict one row given in feature layout order.
    ///
    /// A panic here is caught by `TrainedModel::predict` and reported as
    /// `ModelError::EstimatorPanicked`.
    fn predict_row(&self, features: &[f64]) -> f64;

    /// Number of features the estimator was fitted on
    fn n_features(&self) -> usize;
}
