//! GBDT trainer: the boosting loop.
//!
//! Each round computes logistic gradients at the current margins, grows one
//! tree on them and adds the tree's (shrunk) output to the margins.

use tracing::{debug, info};

use crate::data::{BinnedDataset, Dataset};
use crate::repr::Forest;
use crate::utils::run_with_threads;

use super::config::{ConfigError, GbdtConfig};
use super::gain::GainParams;
use super::grower::{GrowerParams, TreeGrower};
use super::objective::{GradsTuple, LogisticLoss};

/// Trains binary classification forests.
#[derive(Debug, Clone)]
pub struct GbdtTrainer {
    config: GbdtConfig,
    objective: LogisticLoss,
}

impl GbdtTrainer {
    /// Create a trainer, validating `config`.
    pub fn new(config: GbdtConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            objective: LogisticLoss,
        })
    }

    pub fn config(&self) -> &GbdtConfig {
        &self.config
    }

    /// Train a forest on `dataset`.
    ///
    /// Deterministic for a given dataset and configuration, independent of the
    /// thread count.
    pub fn train(&self, dataset: &Dataset) -> Forest {
        let labels = dataset.labels();
        let targets: Vec<f32> = labels.iter().copied().collect();
        let binned = BinnedDataset::from_dataset(dataset, self.config.max_bins);

        let base_score = self.objective.compute_base_score(&targets);
        let mut forest = Forest::new(base_score);
        let mut predictions = vec![base_score; targets.len()];
        let mut grad_hess = vec![GradsTuple::default(); targets.len()];

        let params = GrowerParams {
            gain: GainParams::from(&self.config.regularization),
            learning_rate: self.config.learning_rate,
            growth_strategy: self.config.tree.growth_strategy,
        };

        debug!(
            n_rows = dataset.n_rows(),
            n_features = dataset.n_features(),
            n_trees = self.config.n_trees,
            base_score,
            "starting boosting"
        );

        run_with_threads(self.config.n_threads, |parallelism| {
            let mut grower = TreeGrower::new(&binned, params, parallelism);
            for round in 0..self.config.n_trees {
                self.objective
                    .compute_gradients(&predictions, &targets, &mut grad_hess);
                let tree = grower.grow_and_update_predictions(&grad_hess, &mut predictions);
                debug!(
                    round,
                    n_leaves = tree.n_leaves(),
                    train_logloss = self.objective.loss(&predictions, &targets),
                    "boosting round"
                );
                forest.push_tree(tree);
            }
        });

        info!(
            n_trees = forest.n_trees(),
            train_logloss = self.objective.loss(&predictions, &targets),
            "training finished"
        );
        forest
    }
}
