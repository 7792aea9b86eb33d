//! Olive oil yield prediction and regional Xylella risk aggregation.
//!
//! Startup loads the historical dataset, trains the model once and shares it
//! read-only with every prediction request:
//!
//! ```ignore
//! let config = ServiceConfig::load(None)?;
//! let (dataset, model) = startup(&config)?;
//! let service = PredictionService::new(model);
//! ```

pub mod constants;
pub mod logic;

pub use logic::config::ServiceConfig;
pub use logic::dataset::{Dataset, HistoricalRecord};
pub use logic::error::{
    ConfigError, DataError, ModelError, PredictionError, SchemaError, ServiceError, TrainingError,
};
pub use logic::features::{build_feature_vector, FeatureVector, RawInputs};
pub use logic::model::{ForestConfig, ModelMetadata, TrainedModel};
pub use logic::prediction::{PredictionResponse, PredictionService, YieldEstimate};
pub use logic::region::{aggregate, classify, RegionMarker, RegionStat, RiskBand};
pub use logic::startup::startup;
