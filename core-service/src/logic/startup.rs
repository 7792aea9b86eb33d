//! Service startup
//!
//! Loads the dataset and trains the model exactly once. Every failure here is
//! a `ServiceError` and aborts startup.

use std::sync::Arc;

use super::config::ServiceConfig;
use super::dataset::{self, Dataset};
use super::error::ServiceError;
use super::model::{train_dataset, TrainedModel};
use super::region::RegionDirectory;

/// Dataset only (region views need no model)
pub fn load_dataset(config: &ServiceConfig) -> Result<Dataset, ServiceError> {
    Ok(dataset::load(&config.dataset_path)?)
}

/// Dataset plus the shared trained model
pub fn startup(config: &ServiceConfig) -> Result<(Dataset, Arc<TrainedModel>), ServiceError> {
    let dataset = load_dataset(config)?;
    let model = train_dataset(&dataset, &config.forest)?;
    log::info!(
        "Service ready: {} records, model {}",
        dataset.len(),
        model.metadata().model_id
    );
    Ok((dataset, Arc::new(model)))
}

/// Configured coordinate file, or the Apulian provinces
pub fn region_directory(config: &ServiceConfig) -> Result<RegionDirectory, ServiceError> {
    match &config.regions_path {
        Some(path) => Ok(RegionDirectory::from_file(path)?),
        None => Ok(RegionDirectory::default()),
    }
}
