//! Inference Engine - Trained model and prediction
//!
//! `train` turns historical records into a [`TrainedModel`] exactly once at
//! startup. The model is immutable afterwards and is shared by reference
//! (usually an `Arc`) with every request handler.
//!
//! Predictions are not clamped: an out-of-distribution input can in
//! principle produce any real value, and it is returned as computed so a
//! degenerate model/input pair stays visible.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use chrono::{DateTime, Utc};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::forest::{ForestConfig, RandomForestRegressor};
use super::Regressor;
use crate::logic::dataset::{target_range, Dataset, HistoricalRecord};
use crate::logic::error::{ModelError, TrainingError};
use crate::logic::features::layout::{layout_hash, validate_layout_against};
use crate::logic::features::{FeatureVector, FEATURE_COUNT, FEATURE_VERSION};

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Model metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub model_id: Uuid,
    pub model_type: String,
    pub trained_at: DateTime<Utc>,
    pub n_samples: usize,
    pub n_trees: usize,
    pub seed: u64,

    // ✅ Feature contract
    pub feature_version: u8,
    pub layout_hash: u32,

    /// SHA-256 of the training source, when trained from a loaded dataset
    pub dataset_fingerprint: Option<String>,

    // ✅ Observed target range (litres/hectare)
    pub target_min: f64,
    pub target_max: f64,

    // ✅ Fit quality
    pub train_mse: f64,
    pub oob_mse: Option<f64>,
    pub avg_depth: f64,
}

/// Fitted regressor plus the contract it was trained under
pub struct TrainedModel {
    estimator: Box<dyn Regressor>,
    metadata: ModelMetadata,
}

impl std::fmt::Debug for TrainedModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrainedModel")
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

impl TrainedModel {
    /// Wrap any estimator (tests use this to inject faulty ones)
    pub(crate) fn from_parts(estimator: Box<dyn Regressor>, metadata: ModelMetadata) -> Self {
        Self { estimator, metadata }
    }

    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    /// Predict litres/hectare for one feature vector.
    ///
    /// Pure: the same model and vector always give the same value.
    pub fn predict(&self, features: &FeatureVector) -> Result<f64, ModelError> {
        validate_layout_against(
            self.metadata.feature_version,
            self.metadata.layout_hash,
            features.version,
            features.layout_hash,
        )?;

        let values = features.as_slice();
        if values.len() != self.estimator.n_features() {
            return Err(ModelError::FeatureCount {
                expected: self.estimator.n_features(),
                actual: values.len(),
            });
        }

        let estimate = panic::catch_unwind(AssertUnwindSafe(|| self.estimator.predict_row(values)))
            .map_err(|payload| ModelError::EstimatorPanicked(panic_message(payload.as_ref())))?;
        if !estimate.is_finite() {
            return Err(ModelError::NonFinite(estimate));
        }

        Ok(estimate)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

// ============================================================================
// TRAINING
// ============================================================================

/// Train on a loaded dataset and record its fingerprint
pub fn train_dataset(dataset: &Dataset, config: &ForestConfig) -> Result<TrainedModel, TrainingError> {
    let mut model = train(dataset.records(), config)?;
    model.metadata.dataset_fingerprint = Some(dataset.fingerprint().to_string());
    Ok(model)
}

/// Fit the forest on every record.
///
/// Fails with `TrainingFailed` when the set is empty, smaller than
/// `config.min_training_samples` (never below 2), has fewer than two
/// distinct feature rows, or holds non-finite values.
pub fn train(records: &[HistoricalRecord], config: &ForestConfig) -> Result<TrainedModel, TrainingError> {
    if records.is_empty() {
        return Err(TrainingError::TrainingFailed("no records to train on".to_string()));
    }

    let min_samples = config.min_training_samples.max(2);
    if records.len() < min_samples {
        return Err(TrainingError::TrainingFailed(format!(
            "{} record(s), need at least {}",
            records.len(),
            min_samples
        )));
    }

    config
        .validate(FEATURE_COUNT)
        .map_err(|reason| TrainingError::TrainingFailed(format!("invalid forest config: {}", reason)))?;

    let (x, y) = training_matrix(records)?;

    let distinct_rows = count_distinct_rows(&x);
    if distinct_rows < 2 {
        return Err(TrainingError::TrainingFailed(
            "fewer than 2 distinct feature rows (degenerate fit)".to_string(),
        ));
    }

    log::info!(
        "Training random forest: {} samples ({} distinct), {} trees, seed {}",
        records.len(),
        distinct_rows,
        config.n_trees,
        config.seed
    );

    let (forest, stats) = RandomForestRegressor::fit(&x, &y, config);
    let (target_min, target_max) = target_range(records).unwrap_or((0.0, 0.0));

    let metadata = ModelMetadata {
        model_id: Uuid::new_v4(),
        model_type: "random_forest".to_string(),
        trained_at: Utc::now(),
        n_samples: records.len(),
        n_trees: forest.n_trees(),
        seed: config.seed,
        feature_version: FEATURE_VERSION,
        layout_hash: layout_hash(),
        dataset_fingerprint: None,
        target_min,
        target_max,
        train_mse: stats.train_mse,
        oob_mse: stats.oob_mse,
        avg_depth: forest.avg_depth(),
    };

    match stats.oob_mse {
        Some(oob) => log::info!(
            "Model {} trained: train MSE {:.3}, OOB MSE {:.3} over {} rows",
            metadata.model_id,
            stats.train_mse,
            oob,
            stats.oob_samples
        ),
        None => log::info!(
            "Model {} trained: train MSE {:.3}, no out-of-bag rows",
            metadata.model_id,
            stats.train_mse
        ),
    }

    Ok(TrainedModel::from_parts(Box::new(forest), metadata))
}

/// Feature matrix (n × FEATURE_COUNT) and target vector, built through the schema
fn training_matrix(records: &[HistoricalRecord]) -> Result<(Array2<f64>, Array1<f64>), TrainingError> {
    let mut values = Vec::with_capacity(records.len() * FEATURE_COUNT);
    let mut targets = Vec::with_capacity(records.len());

    for (i, record) in records.iter().enumerate() {
        let vector = record.feature_vector();
        if vector.as_slice().iter().any(|v| !v.is_finite()) || !record.target().is_finite() {
            return Err(TrainingError::TrainingFailed(format!(
                "record {} ({} {}) holds a non-finite value",
                i, record.region_id, record.date
            )));
        }
        values.extend_from_slice(vector.as_slice());
        targets.push(record.target());
    }

    let x = Array2::from_shape_vec((records.len(), FEATURE_COUNT), values)
        .map_err(|e| TrainingError::TrainingFailed(format!("matrix error: {}", e)))?;
    Ok((x, Array1::from(targets)))
}

fn count_distinct_rows(x: &Array2<f64>) -> usize {
    let mut rows: Vec<Vec<u64>> = x
        .rows()
        .into_iter()
        .map(|row| row.iter().map(|v| v.to_bits()).collect())
        .collect();
    rows.sort_unstable();
    rows.dedup();
    rows.len()
}

// ============================================================================
// TESTS
// ============================================================================
