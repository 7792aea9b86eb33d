//! Prediction Service - request handling
//!
//! Every request runs through the same state machine:
//!
//! ```text
//! AwaitingInput → Validating → Predicting → Done
//!                     │             │
//!                     ▼             ▼
//!                 Rejected        Failed
//! ```
//!
//! `Rejected` is user-correctable (incomplete form). `Failed` is an internal
//! fault and is logged with its cause. Nothing is retried.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::format::{failure_message, format_estimate, rejection_message};
use crate::logic::error::PredictionError;
use crate::logic::features::{build_feature_vector, FeatureVector, RawInputs};
use crate::logic::model::TrainedModel;

// ============================================================================
// REQUEST STATE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestState {
    AwaitingInput,
    Validating,
    Predicting,
    Done,
    Rejected,
    Failed,
}

impl RequestState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RequestState::Done | RequestState::Rejected | RequestState::Failed)
    }

    /// Allowed edges of the request state machine
    pub fn can_transition_to(&self, next: RequestState) -> bool {
        use RequestState::*;
        matches!(
            (self, next),
            (AwaitingInput, Validating)
                | (Validating, Predicting)
                | (Validating, Rejected)
                | (Predicting, Done)
                | (Predicting, Failed)
        )
    }
}

/// One prediction request. The state only moves forward along the allowed
/// edges; callers can observe it but not set it.
#[derive(Debug, Clone)]
pub struct PredictionRequest {
    id: Uuid,
    state: RequestState,
}

impl Default for PredictionRequest {
    fn default() -> Self {
        Self::new()
    }
}

impl PredictionRequest {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            state: RequestState::AwaitingInput,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> RequestState {
        self.state
    }

    fn advance(&mut self, next: RequestState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "invalid transition {:?} -> {:?}",
            self.state,
            next
        );
        log::trace!("Request {}: {:?} -> {:?}", self.id, self.state, next);
        self.state = next;
    }
}

// ============================================================================
// OUTPUT
// ============================================================================

/// Successful prediction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YieldEstimate {
    pub litres_per_hectare: f64,
    pub features: FeatureVector,
}

/// What the UI renders for one request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub request_id: Uuid,
    pub state: RequestState,
    pub message: String,
    pub estimate: Option<f64>,
}

// ============================================================================
// SERVICE
// ============================================================================

/// Stateless wrapper around the shared trained model
#[derive(Debug, Clone)]
pub struct PredictionService {
    model: Arc<TrainedModel>,
}

impl PredictionService {
    pub fn new(model: Arc<TrainedModel>) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &TrainedModel {
        &self.model
    }

    /// Validate the raw form values and predict litres/hectare
    pub fn predict_yield(&self, raw_inputs: &RawInputs) -> Result<YieldEstimate, PredictionError> {
        let mut request = PredictionRequest::new();
        self.run(&mut request, raw_inputs)
    }

    /// Run one request through the state machine and render the outcome
    pub fn handle(&self, raw_inputs: &RawInputs) -> PredictionResponse {
        let mut request = PredictionRequest::new();
        let outcome = self.run(&mut request, raw_inputs);

        let (message, estimate) = match outcome {
            Ok(estimate) => (
                format_estimate(estimate.litres_per_hectare),
                Some(estimate.litres_per_hectare),
            ),
            Err(PredictionError::IncompleteInput(ref e)) => (rejection_message(e), None),
            Err(PredictionError::PredictionFailed(ref e)) => (failure_message(e), None),
        };

        PredictionResponse {
            request_id: request.id(),
            state: request.state(),
            message,
            estimate,
        }
    }

    fn run(
        &self,
        request: &mut PredictionRequest,
        raw_inputs: &RawInputs,
    ) -> Result<YieldEstimate, PredictionError> {
        request.advance(RequestState::Validating);

        let features = match build_feature_vector(raw_inputs) {
            Ok(features) => features,
            Err(e) => {
                request.advance(RequestState::Rejected);
                log::debug!("Request {} rejected: {}", request.id(), e);
                return Err(PredictionError::IncompleteInput(e));
            }
        };

        request.advance(RequestState::Predicting);

        match self.model.predict(&features) {
            Ok(litres_per_hectare) => {
                request.advance(RequestState::Done);
                log::debug!(
                    "Request {} predicted {:.2} l/ha for {}",
                    request.id(),
                    litres_per_hectare,
                    features.to_log_entry()
                );
                Ok(YieldEstimate {
                    litres_per_hectare,
                    features,
                })
            }
            Err(e) => {
                request.advance(RequestState::Failed);
                log::error!("Request {} failed: {}", request.id(), e);
                Err(PredictionError::PredictionFailed(e))
            }
        }
    }
}
