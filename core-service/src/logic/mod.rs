//! Logic Module - Business Logic
//!
//! ## Structure
//! - `dataset/` - Historical CSV loader
//! - `features/` - Named feature schema (layout, vector, request validation)
//! - `model/` - Random forest regressor and trained model
//! - `prediction/` - Request state machine and user-facing messages
//! - `region/` - Regional infection aggregation and risk bands
//! - `config` - Layered service configuration
//! - `startup` - Dataset load and one-time training
//! - `error` - Error taxonomy

pub mod config;
pub mod dataset;
pub mod error;
pub mod features;
pub mod model;
pub mod prediction;
pub mod region;
pub mod startup;
