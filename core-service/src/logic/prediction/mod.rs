//! Prediction Module
//!
//! Turns a raw form payload into a yield estimate or a user-facing message.

pub mod format;
pub mod service;

#[cfg(test)]
mod tests;

pub use format::{failure_message, format_estimate, rejection_message};
pub use service::{
    PredictionRequest, PredictionResponse, PredictionService, RequestState, YieldEstimate,
};
