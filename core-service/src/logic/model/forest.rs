//! Random Forest Regressor
//!
//! Bagged ensemble of [`RegressionTree`]s. Each tree is grown on a bootstrap
//! sample of the training rows; the forest predicts the mean of its trees.
//!
//! All randomness comes from one `StdRng` seeded from `ForestConfig::seed`.
//! Every tree draws its own seed from that master generator, so identical
//! data and config always give an identical forest.

use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::tree::{RegressionTree, TreeParams};
use super::Regressor;
use crate::constants::{DEFAULT_MIN_TRAINING_SAMPLES, DEFAULT_N_TREES, DEFAULT_SEED};

// ============================================================================
// CONFIG
// ============================================================================

/// Forest hyper-parameters (can be loaded from config file)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestConfig {
    /// Number of trees
    pub n_trees: usize,
    /// Seed for bootstrap and feature sampling
    pub seed: u64,
    /// Depth limit per tree (`None` = grow until pure)
    pub max_depth: Option<usize>,
    /// Minimum samples required to split a node
    pub min_samples_split: usize,
    /// Minimum samples per leaf
    pub min_samples_leaf: usize,
    /// Features considered per split (`None` = all)
    pub max_features: Option<usize>,
    /// Smallest record set `train` accepts
    pub min_training_samples: usize,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_trees: DEFAULT_N_TREES,
            seed: DEFAULT_SEED,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
            min_training_samples: DEFAULT_MIN_TRAINING_SAMPLES,
        }
    }
}

impl ForestConfig {
    /// Check the parameters against a feature count
    pub fn validate(&self, n_features: usize) -> Result<(), String> {
        if self.n_trees == 0 {
            return Err("n_trees must be at least 1".to_string());
        }
        if self.min_samples_split < 2 {
            return Err("min_samples_split must be at least 2".to_string());
        }
        if self.min_samples_leaf == 0 {
            return Err("min_samples_leaf must be at least 1".to_string());
        }
        if self.max_depth == Some(0) {
            return Err("max_depth must be at least 1".to_string());
        }
        if let Some(m) = self.max_features {
            if m == 0 || m > n_features {
                return Err(format!("max_features must be in 1..={}, got {}", n_features, m));
            }
        }
        Ok(())
    }

    fn tree_params(&self, n_features: usize) -> TreeParams {
        TreeParams {
            max_depth: self.max_depth,
            min_samples_split: self.min_samples_split,
            min_samples_leaf: self.min_samples_leaf,
            max_features: self.max_features.unwrap_or(n_features),
        }
    }
}

// ============================================================================
// FOREST
// ============================================================================

/// Fit statistics gathered while growing the forest
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitStats {
    /// In-sample mean squared error
    pub train_mse: f64,
    /// Out-of-bag mean squared error over rows left out by at least one tree
    pub oob_mse: Option<f64>,
    /// Rows that received at least one out-of-bag prediction
    pub oob_samples: usize,
}

/// A fitted random forest
#[derive(Debug, Clone)]
pub struct RandomForestRegressor {
    trees: Vec<RegressionTree>,
    n_features: usize,
}

impl RandomForestRegressor {
    /// Fit a forest on all rows of `x` / `y`.
    ///
    /// Callers validate `config` and guarantee `x` has at least one row.
    pub fn fit(x: &Array2<f64>, y: &Array1<f64>, config: &ForestConfig) -> (Self, FitStats) {
        let n_samples = x.nrows();
        let n_features = x.ncols();
        let params = config.tree_params(n_features);
        let mut master = StdRng::seed_from_u64(config.seed);
        let rows: Vec<Vec<f64>> = x.rows().into_iter().map(|r| r.to_vec()).collect();

        let mut trees = Vec::with_capacity(config.n_trees);
        let mut oob_sum = vec![0.0f64; n_samples];
        let mut oob_count = vec![0usize; n_samples];

        for _ in 0..config.n_trees {
            let mut rng = StdRng::seed_from_u64(master.gen::<u64>());

            let mut in_bag = vec![false; n_samples];
            let bootstrap: Vec<usize> = (0..n_samples)
                .map(|_| {
                    let i = rng.gen_range(0..n_samples);
                    in_bag[i] = true;
                    i
                })
                .collect();

            let tree = RegressionTree::fit(x, y, &bootstrap, &params, &mut rng);

            for (i, row) in rows.iter().enumerate() {
                if !in_bag[i] {
                    oob_sum[i] += tree.predict_row(row);
                    oob_count[i] += 1;
                }
            }

            trees.push(tree);
        }

        let forest = Self { trees, n_features };

        let train_mse = rows
            .iter()
            .zip(y.iter())
            .map(|(row, target)| (forest.predict_row(row) - target).powi(2))
            .sum::<f64>()
            / n_samples as f64;

        let oob_errors: Vec<f64> = (0..n_samples)
            .filter(|&i| oob_count[i] > 0)
            .map(|i| (oob_sum[i] / oob_count[i] as f64 - y[i]).powi(2))
            .collect();
        let oob_mse = if oob_errors.is_empty() {
            None
        } else {
            Some(oob_errors.iter().sum::<f64>() / oob_errors.len() as f64)
        };

        let stats = FitStats {
            train_mse,
            oob_mse,
            oob_samples: oob_errors.len(),
        };

        (forest, stats)
    }

    /// Number of trees in the forest
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Individual tree outputs for one row (debugging / spread)
    pub fn tree_predictions(&self, features: &[f64]) -> Vec<f64> {
        self.trees.iter().map(|t| t.predict_row(features)).collect()
    }

    /// Average tree depth across the forest
    pub fn avg_depth(&self) -> f64 {
        if self.trees.is_empty() {
            return 0.0;
        }
        let total: usize = self.trees.iter().map(RegressionTree::depth).sum();
        total as f64 / self.trees.len() as f64
    }

    /// Total number of nodes across all trees
    pub fn total_nodes(&self) -> usize {
        self.trees.iter().map(RegressionTree::n_nodes).sum()
    }
}

impl Regressor for RandomForestRegressor {
    fn predict_row(&self, features: &[f64]) -> f64 {
        let sum: f64 = self.trees.iter().map(|t| t.predict_row(features)).sum();
        sum / self.trees.len() as f64
    }

    fn n_features(&self) -> usize {
        self.n_features
    }
}

// ============================================================================
// TESTS
// ============================================================================
