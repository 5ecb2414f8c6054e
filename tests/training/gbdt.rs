//! GBDT training integration tests.
//!
//! Focused on behavior and invariants of the public training API.

use fraudboost::training::{GbdtConfig, GbdtTrainer, GrowthStrategy, RegularizationParams, TreeParams};
use fraudboost::{ConcatenateFeatures, Dataset};
use rstest::rstest;

use crate::common::synthetic_transactions;

fn dataset(n: usize, seed: u64) -> Dataset {
    ConcatenateFeatures::default().apply(&synthetic_transactions(n, 7, seed))
}

fn log_loss(forest: &fraudboost::repr::Forest, ds: &Dataset) -> f64 {
    let mut total = 0.0;
    for i in 0..ds.n_rows() {
        let p = 1.0 / (1.0 + (-forest.predict_row(&ds.row(i).to_vec()) as f64).exp());
        let p = p.clamp(1e-15, 1.0 - 1e-15);
        let y = ds.labels()[i] as f64;
        total -= y * p.ln() + (1.0 - y) * (1.0 - p).ln();
    }
    total / ds.n_rows() as f64
}

#[rstest]
#[case::depth_wise(TreeParams::depth_wise(3))]
#[case::leaf_wise(TreeParams::leaf_wise(8))]
fn training_beats_base_score(#[case] tree: TreeParams) {
    let ds = dataset(280, 1);
    let config = GbdtConfig::builder()
        .n_trees(15)
        .tree(tree)
        .regularization(RegularizationParams {
            min_samples_leaf: 5,
            ..Default::default()
        })
        .build()
        .unwrap();
    let forest = GbdtTrainer::new(config).unwrap().train(&ds);

    forest.validate(ds.n_features()).expect("trained forest should be structurally valid");

    let base = forest.base_score() as f64;
    let prior = 1.0 / (1.0 + (-base).exp());
    let base_loss = ds
        .labels()
        .iter()
        .map(|&y| -(y as f64 * prior.ln() + (1.0 - y as f64) * (1.0 - prior).ln()))
        .sum::<f64>()
        / ds.n_rows() as f64;
    assert!(log_loss(&forest, &ds) < base_loss * 0.5);
}

#[test]
fn growth_limits_are_respected() {
    let ds = dataset(300, 2);
    for (tree, max_leaves) in [(TreeParams::depth_wise(2), 4), (TreeParams::leaf_wise(5), 5)] {
        let config = GbdtConfig::builder()
            .n_trees(5)
            .tree(tree)
            .regularization(RegularizationParams {
                min_samples_leaf: 1,
                ..Default::default()
            })
            .build()
            .unwrap();
        let forest = GbdtTrainer::new(config).unwrap().train(&ds);
        for t in forest.trees() {
            assert!(t.n_leaves() <= max_leaves, "{:?}: {} leaves", tree.growth_strategy, t.n_leaves());
        }
    }
}

#[test]
fn large_min_samples_leaf_prevents_splits() {
    let ds = dataset(100, 3);
    let config = GbdtConfig::builder()
        .n_trees(3)
        .regularization(RegularizationParams {
            min_samples_leaf: 60,
            ..Default::default()
        })
        .build()
        .unwrap();
    let forest = GbdtTrainer::new(config).unwrap().train(&ds);
    assert!(forest.trees().all(|t| t.n_leaves() == 1));
}

#[test]
fn split_features_are_the_informative_ones() {
    let ds = dataset(400, 4);
    let config = GbdtConfig::builder()
        .n_trees(10)
        .tree(TreeParams {
            growth_strategy: GrowthStrategy::DepthWise { max_depth: 2 },
        })
        .regularization(RegularizationParams {
            min_samples_leaf: 5,
            ..Default::default()
        })
        .build()
        .unwrap();
    let forest = GbdtTrainer::new(config).unwrap().train(&ds);

    let importance = forest.feature_importance(ds.n_features());
    let top = importance
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(i, _)| i)
        .unwrap();
    // V14, V17 and Amount carry the signal
    assert!([14, 17, 29].contains(&top), "top feature {top}");
}

#[test]
fn parallel_training_matches_sequential() {
    let ds = dataset(250, 5);
    let config = GbdtConfig::builder().n_trees(8).tree(TreeParams::leaf_wise(6)).build().unwrap();
    let seq = GbdtTrainer::new(config.clone()).unwrap().train(&ds);
    let par = GbdtTrainer::new(GbdtConfig { n_threads: 4, ..config }).unwrap().train(&ds);
    assert_eq!(seq, par);
}
