//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.
//! Environment variables override them; see `logic::config` for the file layer.

/// Dataset file looked up in the working directory
pub const DEFAULT_DATASET_FILE: &str = "dati_simulati_xylella.csv";

/// Trees in the random forest
pub const DEFAULT_N_TREES: usize = 100;

/// Seed for bootstrap and feature sampling
pub const DEFAULT_SEED: u64 = 42;

/// Smallest training set accepted (a fit needs at least two rows)
pub const DEFAULT_MIN_TRAINING_SAMPLES: usize = 2;

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "olive-yield";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Dataset path from `OLIVE_DATASET_PATH`, if set
pub fn get_dataset_path() -> Option<String> {
    std::env::var("OLIVE_DATASET_PATH")
        .ok()
        .filter(|s| !s.trim().is_empty())
}

/// Get forest size from environment or use default
pub fn get_n_trees() -> usize {
    std::env::var("OLIVE_FOREST_TREES")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_N_TREES)
}

/// Get forest seed from environment or use default
pub fn get_seed() -> u64 {
    std::env::var("OLIVE_FOREST_SEED")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_SEED)
}

/// Depth limit from `OLIVE_FOREST_MAX_DEPTH` (unset = unlimited)
pub fn get_max_depth() -> Option<usize> {
    std::env::var("OLIVE_FOREST_MAX_DEPTH")
        .ok()
        .and_then(|s| s.parse().ok())
}

/// Get minimum training set size from environment or use default
pub fn get_min_training_samples() -> usize {
    std::env::var("OLIVE_MIN_TRAINING_SAMPLES")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_MIN_TRAINING_SAMPLES)
}
