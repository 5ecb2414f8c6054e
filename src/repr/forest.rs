//! Forest of boosted trees with a shared base score.

use serde::{Deserialize, Serialize};

use super::tree::{Tree, TreeValidationError};

/// Additive ensemble: `margin = base_score + Σ tree(x)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forest {
    base_score: f32,
    trees: Vec<Tree>,
}

impl Forest {
    pub fn new(base_score: f32) -> Self {
        Self {
            base_score,
            trees: Vec::new(),
        }
    }

    pub fn push_tree(&mut self, tree: Tree) {
        self.trees.push(tree);
    }

    #[inline]
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    #[inline]
    pub fn base_score(&self) -> f32 {
        self.base_score
    }

    #[inline]
    pub fn tree(&self, idx: usize) -> &Tree {
        &self.trees[idx]
    }

    pub fn trees(&self) -> impl Iterator<Item = &Tree> {
        self.trees.iter()
    }

    /// Raw margin (log-odds) for one row.
    pub fn predict_row(&self, features: &[f32]) -> f32 {
        self.trees
            .iter()
            .fold(self.base_score, |acc, tree| acc + tree.predict_row(features))
    }

    /// Total split gain per feature, normalized to sum to 1.
    ///
    /// Features never used for a split get 0. A forest without splits yields
    /// all zeros.
    pub fn feature_importance(&self, n_features: usize) -> Vec<f64> {
        let mut importance = vec![0.0f64; n_features];
        for tree in &self.trees {
            for node in 0..tree.n_nodes() as u32 {
                if !tree.is_leaf(node) {
                    if let Some(slot) = importance.get_mut(tree.split_index(node) as usize) {
                        *slot += tree.gain(node) as f64;
                    }
                }
            }
        }
        let total: f64 = importance.iter().sum();
        if total > 0.0 {
            importance.iter_mut().for_each(|v| *v /= total);
        }
        importance
    }

    /// Validate every tree against `n_features`.
    pub fn validate(&self, n_features: usize) -> Result<(), TreeValidationError> {
        self.trees.iter().try_for_each(|tree| tree.validate(n_features))
    }
}
