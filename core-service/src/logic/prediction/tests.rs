//! End-to-end prediction tests on a seeded synthetic dataset

use std::error::Error as _;
use std::sync::Arc;

use once_cell::sync::Lazy;
use serde_json::{json, Value};

use super::service::{PredictionRequest, PredictionService, RequestState};
use crate::logic::dataset::fixtures::synthetic_records;
use crate::logic::dataset::Dataset;
use crate::logic::error::{ModelError, PredictionError, SchemaError};
use crate::logic::features::{RawInputs, FEATURE_COUNT, FEATURE_LAYOUT};
use crate::logic::model::{train_dataset, ForestConfig, Regressor, TrainedModel};

static DATASET: Lazy<Dataset> =
    Lazy::new(|| Dataset::from_records("synthetic", synthetic_records(365, 42)));

static MODEL: Lazy<Arc<TrainedModel>> = Lazy::new(|| {
    let config = ForestConfig {
        n_trees: 30,
        ..Default::default()
    };
    Arc::new(train_dataset(&DATASET, &config).unwrap())
});

fn service() -> PredictionService {
    PredictionService::new(Arc::clone(&MODEL))
}

fn inputs(value: Value) -> RawInputs {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {}", other),
    }
}

fn golden() -> RawInputs {
    inputs(json!({
        "temperature": 20,
        "humidity": 60,
        "precipitation": 10,
        "trees_replanted": 200,
        "trees_infected": 150
    }))
}

#[test]
fn test_golden_input_lands_in_observed_range() {
    let estimate = service().predict_yield(&golden()).unwrap();
    let (lo, hi) = DATASET.target_range().unwrap();

    assert!(
        estimate.litres_per_hectare >= lo && estimate.litres_per_hectare <= hi,
        "{} outside [{}, {}]",
        estimate.litres_per_hectare,
        lo,
        hi
    );
    assert_eq!(estimate.features.as_array(), &[20.0, 60.0, 10.0, 200.0, 150.0]);
}

#[test]
fn test_prediction_is_deterministic() {
    let service = service();
    let a = service.predict_yield(&golden()).unwrap();
    let b = service.predict_yield(&golden()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_each_missing_key_is_incomplete_input() {
    let service = service();
    for &name in FEATURE_LAYOUT {
        let mut raw = golden();
        raw.remove(name);

        match service.predict_yield(&raw) {
            Err(PredictionError::IncompleteInput(SchemaError::MissingField(field))) => {
                assert_eq!(field, name)
            }
            other => panic!("{}: expected MissingField, got {:?}", name, other),
        }
    }
}

#[test]
fn test_non_numeric_value_is_incomplete_input() {
    let mut raw = golden();
    raw.insert("humidity".to_string(), json!("wet"));

    let err = service().predict_yield(&raw).unwrap_err();
    assert!(err.is_incomplete_input());
}

#[test]
fn test_handle_done_response() {
    let response = service().handle(&golden());

    assert_eq!(response.state, RequestState::Done);
    let estimate = response.estimate.unwrap();
    assert_eq!(
        response.message,
        format!("Predicted oil production: {:.2} litres/hectare", estimate)
    );
}

#[test]
fn test_handle_rejected_response() {
    let mut raw = golden();
    raw.insert("precipitation".to_string(), Value::Null);

    let response = service().handle(&raw);
    assert_eq!(response.state, RequestState::Rejected);
    assert_eq!(response.estimate, None);
    assert_eq!(
        response.message,
        "Please fill in all values to compute the prediction (missing or invalid: precipitation)."
    );
}

#[test]
fn test_empty_form_is_rejected() {
    let response = service().handle(&RawInputs::new());
    assert_eq!(response.state, RequestState::Rejected);
    assert!(response.message.contains("temperature"));
}

struct NanRegressor;

impl Regressor for NanRegressor {
    fn predict_row(&self, _features: &[f64]) -> f64 {
        f64::NAN
    }

    fn n_features(&self) -> usize {
        FEATURE_COUNT
    }
}

fn faulty_service() -> PredictionService {
    let model = TrainedModel::from_parts(Box::new(NanRegressor), MODEL.metadata().clone());
    PredictionService::new(Arc::new(model))
}

#[test]
fn test_model_fault_is_prediction_failed() {
    let err = faulty_service().predict_yield(&golden()).unwrap_err();

    assert!(matches!(
        err,
        PredictionError::PredictionFailed(ModelError::NonFinite(_))
    ));
    assert!(err.source().is_some());
}

struct PanickingRegressor;

impl Regressor for PanickingRegressor {
    fn predict_row(&self, _features: &[f64]) -> f64 {
        panic!("corrupt tree")
    }

    fn n_features(&self) -> usize {
        FEATURE_COUNT
    }
}

#[test]
fn test_estimator_panic_is_prediction_failed() {
    let model = TrainedModel::from_parts(Box::new(PanickingRegressor), MODEL.metadata().clone());
    let service = PredictionService::new(Arc::new(model));

    let err = service.predict_yield(&golden()).unwrap_err();
    assert!(matches!(
        err,
        PredictionError::PredictionFailed(ModelError::EstimatorPanicked(_))
    ));

    let response = service.handle(&golden());
    assert_eq!(response.state, RequestState::Failed);
    assert_eq!(response.message, "Internal prediction error: estimator panicked: corrupt tree");
}

#[test]
fn test_handle_failed_response() {
    let response = faulty_service().handle(&golden());

    assert_eq!(response.state, RequestState::Failed);
    assert_eq!(response.estimate, None);
    assert!(response.message.starts_with("Internal prediction error: "));
}

#[test]
fn test_state_machine_edges() {
    use RequestState::*;

    assert_eq!(PredictionRequest::new().state(), AwaitingInput);
    assert!(AwaitingInput.can_transition_to(Validating));
    assert!(Validating.can_transition_to(Rejected));
    assert!(Predicting.can_transition_to(Failed));
    assert!(!AwaitingInput.can_transition_to(Done));
    assert!(!Rejected.can_transition_to(Predicting));
    assert!(!Done.can_transition_to(Validating));
    assert!(Done.is_terminal() && Rejected.is_terminal() && Failed.is_terminal());
    assert!(!Predicting.is_terminal());
}

#[test]
fn test_service_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<PredictionService>();
}
