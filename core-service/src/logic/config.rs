//! Service Configuration
//!
//! Layered: built-in defaults, then an optional JSON file, then environment
//! variables (`OLIVE_*`). Missing keys in the file keep their defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use super::features::FEATURE_COUNT;
use super::model::ForestConfig;
use super::region::RiskThresholds;
use crate::constants::{self, APP_NAME, DEFAULT_DATASET_FILE};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Historical CSV
    pub dataset_path: PathBuf,
    /// Random forest hyper-parameters
    pub forest: ForestConfig,
    /// Risk banding
    pub risk: RiskThresholds,
    /// Optional JSON region → coordinates file (default: Apulian provinces)
    pub regions_path: Option<PathBuf>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            dataset_path: default_dataset_path(),
            forest: ForestConfig::default(),
            risk: RiskThresholds::default(),
            regions_path: None,
        }
    }
}

impl ServiceConfig {
    /// Defaults overridden by the environment
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Read a JSON config file (no environment overrides)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&contents)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// File (if given) then environment, validated
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => {
                let mut config = Self::from_file(path)?;
                config.apply_env();
                config
            }
            None => Self::from_env(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Apply `OLIVE_*` variables that are set
    pub fn apply_env(&mut self) {
        if let Some(path) = constants::get_dataset_path() {
            self.dataset_path = PathBuf::from(path);
        }
        if std::env::var_os("OLIVE_FOREST_TREES").is_some() {
            self.forest.n_trees = constants::get_n_trees();
        }
        if std::env::var_os("OLIVE_FOREST_SEED").is_some() {
            self.forest.seed = constants::get_seed();
        }
        if let Some(depth) = constants::get_max_depth() {
            self.forest.max_depth = Some(depth);
        }
        if std::env::var_os("OLIVE_MIN_TRAINING_SAMPLES").is_some() {
            self.forest.min_training_samples = constants::get_min_training_samples();
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dataset_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("dataset_path is empty".to_string()));
        }
        self.forest
            .validate(FEATURE_COUNT)
            .map_err(|reason| ConfigError::Invalid(format!("forest: {}", reason)))?;
        if !self.risk.high_min_exclusive.is_finite() || self.risk.high_min_exclusive < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "risk threshold must be a non-negative number, got {}",
                self.risk.high_min_exclusive
            )));
        }
        Ok(())
    }
}

/// `./dati_simulati_xylella.csv` when present, else the platform data dir
pub fn default_dataset_path() -> PathBuf {
    let local = PathBuf::from(DEFAULT_DATASET_FILE);
    if local.exists() {
        return local;
    }
    dirs::data_local_dir()
        .map(|dir| dir.join(APP_NAME).join(DEFAULT_DATASET_FILE))
        .unwrap_or(local)
}
