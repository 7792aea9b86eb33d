//! Error taxonomy
//!
//! Startup errors (`DataError`, `TrainingError`, `ConfigError`) abort service
//! construction. Request errors (`SchemaError`, `ModelError`) are folded into
//! `PredictionError` at the prediction service boundary.

use std::path::PathBuf;

use thiserror::Error;

use super::features::layout::LayoutMismatchError;

/// Dataset could not be read into records.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("dataset unavailable ({source_name}): {reason}")]
    DataUnavailable { source_name: String, reason: String },
}

impl DataError {
    pub fn unavailable(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        DataError::DataUnavailable {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }
}

/// Model could not be fitted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrainingError {
    #[error("training failed: {0}")]
    TrainingFailed(String),
}

/// Raw user input does not satisfy the feature schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("missing field: {0}")]
    MissingField(&'static str),

    #[error("invalid value for {field}: {reason}")]
    InvalidType { field: &'static str, reason: String },

    #[error("expected {expected} feature values, got {actual}")]
    FeatureCount { expected: usize, actual: usize },
}

impl SchemaError {
    /// Name of the offending field, when there is one
    pub fn field(&self) -> Option<&'static str> {
        match self {
            SchemaError::MissingField(field) => Some(field),
            SchemaError::InvalidType { field, .. } => Some(field),
            SchemaError::FeatureCount { .. } => None,
        }
    }
}

/// Internal inference fault.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error(transparent)]
    LayoutMismatch(#[from] LayoutMismatchError),

    #[error("model produced a non-finite estimate ({0})")]
    NonFinite(f64),

    #[error("model expects {expected} features, got {actual}")]
    FeatureCount { expected: usize, actual: usize },

    #[error("estimator panicked: {0}")]
    EstimatorPanicked(String),
}

/// Outcome of a failed `predict_yield` call.
#[derive(Debug, Error)]
pub enum PredictionError {
    /// User-correctable: the form is incomplete or holds a non-numeric value
    #[error("incomplete input: {0}")]
    IncompleteInput(#[from] SchemaError),

    /// Internal fault, original cause kept as `source()`
    #[error("prediction failed: {0}")]
    PredictionFailed(#[source] ModelError),
}

impl PredictionError {
    pub fn is_incomplete_input(&self) -> bool {
        matches!(self, PredictionError::IncompleteInput(_))
    }
}

/// Configuration file or environment could not be used.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Anything that prevents the service from starting.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Training(#[from] TrainingError),
}
