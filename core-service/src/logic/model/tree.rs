//! Regression Tree - CART trained on squared error
//!
//! Array-based tree: nodes live in a flat `Vec`, children are indices into
//! it. A sample goes left when `value <= threshold`. Leaves store the mean
//! target of the training samples that reached them.

use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use super::Regressor;

// ============================================================================
// PARAMETERS
// ============================================================================

/// Growth limits for a single tree
#[derive(Debug, Clone, Copy)]
pub struct TreeParams {
    /// Maximum depth (root = depth 0); `None` grows until leaves are pure
    pub max_depth: Option<usize>,
    /// Minimum samples a node needs before a split is attempted
    pub min_samples_split: usize,
    /// Minimum samples on each side of a split
    pub min_samples_leaf: usize,
    /// Candidate features drawn per node
    pub max_features: usize,
}

// ============================================================================
// NODES
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
        samples: usize,
    },
}

impl TreeNode {
    pub fn is_leaf(&self) -> bool {
        matches!(self, TreeNode::Leaf { .. })
    }
}

/// A fitted regression tree
#[derive(Debug, Clone)]
pub struct RegressionTree {
    nodes: Vec<TreeNode>,
    n_features: usize,
}

impl RegressionTree {
    /// Grow a tree on the rows of `x` listed in `sample_indices`.
    ///
    /// `sample_indices` may contain duplicates (bootstrap draws); each copy
    /// counts as one sample. It must not be empty.
    pub fn fit(
        x: &Array2<f64>,
        y: &Array1<f64>,
        sample_indices: &[usize],
        params: &TreeParams,
        rng: &mut StdRng,
    ) -> Self {
        let mut builder = TreeBuilder {
            x,
            y,
            params,
            rng,
            nodes: Vec::new(),
        };
        let mut indices = sample_indices.to_vec();
        builder.grow(&mut indices, 0);

        Self {
            nodes: builder.nodes,
            n_features: x.ncols(),
        }
    }

    /// Number of nodes in the tree
    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of leaves
    pub fn n_leaves(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Depth of the deepest leaf (a single leaf has depth 0)
    pub fn depth(&self) -> usize {
        self.depth_from(0)
    }

    fn depth_from(&self, idx: usize) -> usize {
        match &self.nodes[idx] {
            TreeNode::Leaf { .. } => 0,
            TreeNode::Split { left, right, .. } => {
                1 + self.depth_from(*left).max(self.depth_from(*right))
            }
        }
    }

    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }
}

impl Regressor for RegressionTree {
    fn predict_row(&self, features: &[f64]) -> f64 {
        let mut idx = 0usize;
        loop {
            match &self.nodes[idx] {
                TreeNode::Leaf { value, .. } => return *value,
                TreeNode::Split { feature, threshold, left, right } => {
                    let value = features.get(*feature).copied().unwrap_or(0.0);
                    idx = if value <= *threshold { *left } else { *right };
                }
            }
        }
    }

    fn n_features(&self) -> usize {
        self.n_features
    }
}

// ============================================================================
// TRAINING
// ============================================================================

struct TreeBuilder<'a> {
    x: &'a Array2<f64>,
    y: &'a Array1<f64>,
    params: &'a TreeParams,
    rng: &'a mut StdRng,
    nodes: Vec<TreeNode>,
}

struct BestSplit {
    feature: usize,
    threshold: f64,
    /// sum_l² / n_l + sum_r² / n_r; larger means lower squared error
    score: f64,
}

impl TreeBuilder<'_> {
    /// Grow the subtree for `indices`, returning its node index
    fn grow(&mut self, indices: &mut [usize], depth: usize) -> usize {
        let n = indices.len();
        let sum: f64 = indices.iter().map(|&i| self.y[i]).sum();
        let mean = sum / n as f64;

        let depth_reached = self.params.max_depth.map_or(false, |max| depth >= max);
        let pure = indices.iter().all(|&i| self.y[i] == self.y[indices[0]]);

        if depth_reached || pure || n < self.params.min_samples_split || n < 2 * self.params.min_samples_leaf {
            return self.push_leaf(mean, n);
        }

        let Some(split) = self.best_split(indices, sum) else {
            return self.push_leaf(mean, n);
        };

        // Partition in place: left block = value <= threshold
        let mut boundary = 0;
        for i in 0..n {
            if self.x[[indices[i], split.feature]] <= split.threshold {
                indices.swap(i, boundary);
                boundary += 1;
            }
        }

        let node_idx = self.nodes.len();
        self.nodes.push(TreeNode::Leaf { value: mean, samples: n }); // placeholder

        let (left_indices, right_indices) = indices.split_at_mut(boundary);
        let left = self.grow(left_indices, depth + 1);
        let right = self.grow(right_indices, depth + 1);

        self.nodes[node_idx] = TreeNode::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        };
        node_idx
    }

    fn push_leaf(&mut self, value: f64, samples: usize) -> usize {
        self.nodes.push(TreeNode::Leaf { value, samples });
        self.nodes.len() - 1
    }

    fn best_split(&mut self, indices: &[usize], total_sum: f64) -> Option<BestSplit> {
        let n = indices.len();
        let min_leaf = self.params.min_samples_leaf.max(1);
        let parent_score = total_sum * total_sum / n as f64;

        let mut features: Vec<usize> = (0..self.x.ncols()).collect();
        features.shuffle(&mut *self.rng);
        features.truncate(self.params.max_features.clamp(1, self.x.ncols()));

        let mut best: Option<BestSplit> = None;
        let mut column: Vec<(f64, f64)> = Vec::with_capacity(n);

        for feature in features {
            column.clear();
            column.extend(indices.iter().map(|&i| (self.x[[i, feature]], self.y[i])));
            column.sort_by(|a, b| a.0.total_cmp(&b.0));

            let mut left_sum = 0.0;
            for k in 1..n {
                left_sum += column[k - 1].1;

                if k < min_leaf || n - k < min_leaf {
                    continue;
                }
                let (lo, hi) = (column[k - 1].0, column[k].0);
                if lo == hi {
                    continue;
                }

                let right_sum = total_sum - left_sum;
                let score = left_sum * left_sum / k as f64 + right_sum * right_sum / (n - k) as f64;

                if score > parent_score + 1e-12 && best.as_ref().map_or(true, |b| score > b.score) {
                    let mut threshold = lo + (hi - lo) / 2.0;
                    if threshold >= hi {
                        threshold = lo;
                    }
                    best = Some(BestSplit { feature, threshold, score });
                }
            }
        }

        best
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use rand::SeedableRng;

    fn params() -> TreeParams {
        TreeParams {
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: 2,
        }
    }

    #[test]
    fn test_step_function_is_learned_exactly() {
        let x = array![[1.0, 0.0], [2.0, 0.0], [3.0, 0.0], [10.0, 0.0], [11.0, 0.0]];
        let y = array![5.0, 5.0, 5.0, 20.0, 20.0];
        let mut rng = StdRng::seed_from_u64(1);

        let tree = RegressionTree::fit(&x, &y, &[0, 1, 2, 3, 4], &params(), &mut rng);

        assert_eq!(tree.n_leaves(), 2);
        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.predict_row(&[2.5, 0.0]), 5.0);
        assert_eq!(tree.predict_row(&[9.0, 0.0]), 20.0);
        match &tree.nodes()[0] {
            TreeNode::Split { feature, threshold, .. } => {
                assert_eq!(*feature, 0);
                assert_eq!(*threshold, 6.5);
            }
            other => panic!("expected split at root, got {:?}", other),
        }
    }

    #[test]
    fn test_constant_target_is_single_leaf() {
        let x = array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]];
        let y = array![7.0, 7.0, 7.0];
        let mut rng = StdRng::seed_from_u64(1);

        let tree = RegressionTree::fit(&x, &y, &[0, 1, 2], &params(), &mut rng);
        assert_eq!(tree.n_nodes(), 1);
        assert_eq!(tree.predict_row(&[100.0, -100.0]), 7.0);
    }

    #[test]
    fn test_max_depth_limits_growth() {
        let x = array![[1.0], [2.0], [3.0], [4.0], [5.0], [6.0], [7.0], [8.0]];
        let y = array![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
        let mut rng = StdRng::seed_from_u64(1);
        let shallow = TreeParams { max_depth: Some(1), max_features: 1, ..params() };

        let tree = RegressionTree::fit(&x, &y, &(0..8).collect::<Vec<_>>(), &shallow, &mut rng);
        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.predict_row(&[1.0]), 2.5);
        assert_eq!(tree.predict_row(&[8.0]), 6.5);
    }

    #[test]
    fn test_min_samples_leaf_is_respected() {
        let x = array![[1.0], [2.0], [3.0], [4.0]];
        let y = array![0.0, 0.0, 0.0, 100.0];
        let mut rng = StdRng::seed_from_u64(1);
        let params = TreeParams { min_samples_leaf: 2, max_features: 1, ..params() };

        let tree = RegressionTree::fit(&x, &y, &[0, 1, 2, 3], &params, &mut rng);
        for node in tree.nodes() {
            if let TreeNode::Leaf { samples, .. } = node {
                assert!(*samples >= 2);
            }
        }
    }

    #[test]
    fn test_duplicate_bootstrap_indices_weight_samples() {
        let x = array![[0.0], [1.0]];
        let y = array![0.0, 10.0];
        let mut rng = StdRng::seed_from_u64(1);
        let stump = TreeParams { max_depth: Some(0), max_features: 1, ..params() };

        let tree = RegressionTree::fit(&x, &y, &[0, 0, 0, 1], &stump, &mut rng);
        assert_eq!(tree.predict_row(&[0.0]), 2.5);
    }
}
