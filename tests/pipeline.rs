//! End-to-end tests: CSV -> cross-validation -> model archive -> predictions.

mod common;

use fraudboost::pipeline::{self, PipelineConfig};
use fraudboost::training::{GbdtConfig, RegularizationParams, TreeParams};
use fraudboost::{DataError, Error, FraudModel, ModelInput, FEATURE_COLUMNS};
use tempfile::tempdir;

use common::{synthetic_transactions, write_csv, N_FEATURES};

fn small_config() -> PipelineConfig {
    let gbdt = GbdtConfig::builder()
        .n_trees(20)
        .learning_rate(0.2)
        .tree(TreeParams::leaf_wise(8))
        .regularization(RegularizationParams {
            min_samples_leaf: 5,
            ..Default::default()
        })
        .build()
        .unwrap();
    PipelineConfig::builder().gbdt(gbdt).build().unwrap()
}

#[test]
fn train_save_load_reproduces_predictions() {
    let dir = tempdir().unwrap();
    let inputs = synthetic_transactions(300, 10, 42);
    let csv = write_csv(dir.path(), "creditcard.csv", &inputs);

    let outcome = pipeline::build_model(&csv, &small_config()).unwrap();
    assert_eq!(outcome.folds.len(), 5);
    assert_eq!(outcome.cross_validation.n_folds, 5);
    assert!(outcome.cross_validation.accuracy.mean > 0.95);

    let archive = dir.path().join("CreditCardFraudDetection.zip");
    outcome.model.save(&archive).unwrap();
    let (loaded, schema) = FraudModel::load(&archive).unwrap();

    assert!(schema.is_canonical());
    assert_eq!(loaded, outcome.model);
    assert_eq!(loaded.predict_batch(&inputs), outcome.model.predict_batch(&inputs));
}

#[test]
fn fixed_seed_builds_identical_models() {
    let dir = tempdir().unwrap();
    let csv = write_csv(dir.path(), "data.csv", &synthetic_transactions(200, 8, 7));

    let a = pipeline::build_model(&csv, &small_config()).unwrap();
    let b = pipeline::build_model(&csv, &small_config()).unwrap();

    assert_eq!(a.model, b.model);
    assert_eq!(a.folds, b.folds);
}

#[test]
fn trainer_sees_exactly_the_feature_columns() {
    let outcome = pipeline::build_model_from_inputs(&synthetic_transactions(120, 6, 3), &small_config()).unwrap();
    let model = &outcome.model;

    assert_eq!(model.transform().input_columns(), FEATURE_COLUMNS.map(String::from).as_slice());
    assert_eq!(model.transform().output_column(), "Features");
    assert_eq!(model.meta().n_features, N_FEATURES);
    assert_eq!(model.schema().feature_columns.len(), 30);
}

#[test]
fn fraudulent_row_scores_higher_than_legitimate_row() {
    let outcome = pipeline::build_model_from_inputs(&synthetic_transactions(240, 8, 11), &small_config()).unwrap();

    let mut fraud = [0.0f32; N_FEATURES];
    fraud[0] = 1000.0;
    fraud[14] = -9.0;
    fraud[17] = -8.0;
    fraud[N_FEATURES - 1] = 1800.0;
    let mut legit = [0.1f32; N_FEATURES];
    legit[0] = 1000.0;
    legit[N_FEATURES - 1] = 35.0;

    let fraud_out = outcome.model.predict(&ModelInput::new(fraud, true));
    let legit_out = outcome.model.predict(&ModelInput::new(legit, false));
    assert!(fraud_out.score > legit_out.score);
    assert!(fraud_out.prediction);
    assert!(!legit_out.prediction);
    assert!(fraud_out.probability() > 0.5);
}

#[test]
fn predictor_prints_one_line_per_test_row() {
    let dir = tempdir().unwrap();
    let inputs = synthetic_transactions(300, 10, 5);
    let csv = write_csv(dir.path(), "creditcard.csv", &inputs);
    let config = small_config();

    let archive = dir.path().join("model.zip");
    pipeline::build_model(&csv, &config).unwrap().model.save(&archive).unwrap();

    let mut out = Vec::new();
    let n = pipeline::run_predictor(&archive, &csv, &config, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();

    assert_eq!(n, 30);
    assert_eq!(text.lines().count(), 30);
    for line in text.lines() {
        let (actual, predicted) = line.split_once(" | ").unwrap();
        assert!(matches!(actual, "Actual value: true" | "Actual value: false"), "{line}");
        assert!(matches!(predicted, "Predicted value: true" | "Predicted value: false"), "{line}");
    }

    let mut again = Vec::new();
    pipeline::run_predictor(&archive, &csv, &config, &mut again).unwrap();
    assert_eq!(String::from_utf8(again).unwrap(), text);
}

#[test]
fn malformed_csv_is_fatal() {
    let dir = tempdir().unwrap();
    let inputs = synthetic_transactions(20, 5, 1);
    let mut text = common::to_csv(&inputs);
    text = text.replacen("\n", "\nnot-a-number,", 1);
    let path = dir.path().join("bad.csv");
    std::fs::write(&path, text).unwrap();

    let err = pipeline::build_model(&path, &small_config()).unwrap_err();
    assert!(matches!(err, Error::Data(_)), "{err}");
}

#[test]
fn missing_model_archive_is_reported() {
    let dir = tempdir().unwrap();
    let csv = write_csv(dir.path(), "data.csv", &synthetic_transactions(20, 5, 1));
    let archive = dir.path().join("absent.zip");
    let err = pipeline::run_predictor(&archive, &csv, &small_config(), &mut Vec::new()).unwrap_err();
    assert!(matches!(err, Error::Persist(_)));
}

#[test]
fn empty_input_is_rejected() {
    let err = pipeline::build_model_from_inputs(&[], &small_config()).unwrap_err();
    assert!(matches!(err, Error::Data(DataError::Empty)));
}
