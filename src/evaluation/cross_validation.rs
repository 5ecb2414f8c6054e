//! K-fold cross-validation of the GBDT trainer.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::data::{kfold_assignments, Dataset};
use crate::training::{ConfigError, GbdtConfig, GbdtTrainer};

use super::metrics::BinaryClassificationMetrics;

/// Metrics of one held-out fold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoldResult {
    pub fold: usize,
    pub n_train: usize,
    pub n_test: usize,
    pub metrics: BinaryClassificationMetrics,
}

/// Train on `k - 1` folds and evaluate on the remaining one, for every fold.
///
/// Fold assignment is a seeded shuffle, so results are reproducible.
///
/// # Errors
///
/// [`ConfigError::InvalidFolds`] unless `2 <= n_folds <= n_rows`, or any
/// error from validating `config`.
pub fn cross_validate(
    dataset: &Dataset,
    config: &GbdtConfig,
    n_folds: usize,
    seed: u64,
) -> Result<Vec<FoldResult>, ConfigError> {
    let n_rows = dataset.n_rows();
    let assignments = kfold_assignments(n_rows, n_folds, seed)?;
    let trainer = GbdtTrainer::new(config.clone())?;

    info!(n_folds, n_rows, "cross-validating");
    let mut results = Vec::with_capacity(n_folds);
    for fold in 0..n_folds {
        let (test_rows, train_rows): (Vec<usize>, Vec<usize>) =
            (0..n_rows).partition(|&r| assignments[r] == fold);
        let train = dataset.select(&train_rows);
        let test = dataset.select(&test_rows);

        let n_positive = train.n_positive();
        if n_positive == 0 || n_positive == train.n_rows() {
            warn!(fold, "training fold contains a single class");
        }

        let forest = trainer.train(&train);
        let scores: Vec<f32> = (0..test.n_rows())
            .map(|i| {
                let row = test.row(i);
                match row.as_slice() {
                    Some(features) => forest.predict_row(features),
                    None => forest.predict_row(&row.to_vec()),
                }
            })
            .collect();
        let labels: Vec<f32> = test.labels().iter().copied().collect();
        let metrics = BinaryClassificationMetrics::compute(&scores, &labels);

        debug!(fold, accuracy = metrics.accuracy, auc = metrics.auc, "fold evaluated");
        results.push(FoldResult {
            fold,
            n_train: train.n_rows(),
            n_test: test.n_rows(),
            metrics,
        });
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::training::{RegularizationParams, TreeParams};

    fn dataset(n: usize) -> Dataset {
        let features: Vec<f32> = (0..n).map(|i| i as f32).collect();
        let labels: Vec<f32> = (0..n).map(|i| if i >= n / 2 { 1.0 } else { 0.0 }).collect();
        Dataset::from_vec(features, n, 1, labels).unwrap()
    }

    fn config() -> GbdtConfig {
        GbdtConfig::builder()
            .n_trees(5)
            .learning_rate(0.5)
            .tree(TreeParams::depth_wise(2))
            .regularization(RegularizationParams {
                min_samples_leaf: 2,
                ..Default::default()
            })
            .build()
            .unwrap()
    }

    #[test]
    fn folds_cover_every_row_once() {
        let ds = dataset(53);
        let results = cross_validate(&ds, &config(), 5, 1).unwrap();

        assert_eq!(results.len(), 5);
        assert_eq!(results.iter().map(|r| r.n_test).sum::<usize>(), 53);
        for r in &results {
            assert_eq!(r.n_train + r.n_test, 53);
            assert_eq!(r.metrics.confusion.total(), r.n_test);
        }
    }

    #[test]
    fn easy_problem_is_learned() {
        let results = cross_validate(&dataset(100), &config(), 5, 7).unwrap();
        for r in &results {
            assert!(r.metrics.accuracy > 0.9, "fold {} accuracy {}", r.fold, r.metrics.accuracy);
        }
    }

    #[test]
    fn same_seed_same_results() {
        let ds = dataset(40);
        assert_eq!(
            cross_validate(&ds, &config(), 4, 3).unwrap(),
            cross_validate(&ds, &config(), 4, 3).unwrap()
        );
    }

    #[test]
    fn rejects_bad_fold_counts() {
        let ds = dataset(4);
        assert_eq!(
            cross_validate(&ds, &config(), 1, 1),
            Err(ConfigError::InvalidFolds { n_folds: 1, n_rows: 4 })
        );
        assert_eq!(
            cross_validate(&ds, &config(), 5, 1),
            Err(ConfigError::InvalidFolds { n_folds: 5, n_rows: 4 })
        );
    }
}
