//! Cross-validation and report integration tests.

use fraudboost::data::kfold_assignments;
use fraudboost::evaluation::{cross_validate, stats, CrossValidationSummary};
use fraudboost::training::{ConfigError, GbdtConfig, RegularizationParams, TreeParams};
use fraudboost::ConcatenateFeatures;

use crate::common::synthetic_transactions;

fn config() -> GbdtConfig {
    GbdtConfig::builder()
        .n_trees(10)
        .learning_rate(0.3)
        .tree(TreeParams::leaf_wise(6))
        .regularization(RegularizationParams {
            min_samples_leaf: 4,
            ..Default::default()
        })
        .build()
        .unwrap()
}

#[test]
fn five_fold_summary_matches_fold_values() {
    let ds = ConcatenateFeatures::default().apply(&synthetic_transactions(250, 10, 9));
    let folds = cross_validate(&ds, &config(), 5, 1).unwrap();
    let summary = CrossValidationSummary::from_folds(&folds);

    let accuracies: Vec<f64> = folds.iter().map(|f| f.metrics.accuracy).collect();
    assert_eq!(summary.accuracy.mean, stats::mean(&accuracies));
    assert_eq!(summary.accuracy.std_dev, stats::standard_deviation(&accuracies));
    assert_eq!(summary.accuracy.ci95, stats::confidence_interval_95(&accuracies));
    assert!(summary.auc.mean > 0.95);

    let report = summary.to_string();
    assert!(report.contains("Average Accuracy:"));
    assert!(report.contains("Standard deviation:"));
    assert!(report.contains("Confidence Interval 95%:"));
}

#[test]
fn folds_are_balanced_and_seeded() {
    let ds = ConcatenateFeatures::default().apply(&synthetic_transactions(120, 6, 2));
    let folds = cross_validate(&ds, &config(), 3, 1).unwrap();
    assert!(folds.iter().all(|f| f.n_test == 40 && f.n_train == 80));

    assert_eq!(kfold_assignments(120, 3, 1).unwrap(), kfold_assignments(120, 3, 1).unwrap());
    assert_ne!(kfold_assignments(120, 3, 1).unwrap(), kfold_assignments(120, 3, 2).unwrap());
    assert!(kfold_assignments(120, 0, 1).is_err());
}

#[test]
fn more_folds_than_rows_is_rejected() {
    let ds = ConcatenateFeatures::default().apply(&synthetic_transactions(3, 2, 2));
    assert_eq!(
        cross_validate(&ds, &config(), 5, 1),
        Err(ConfigError::InvalidFolds { n_folds: 5, n_rows: 3 })
    );
}
