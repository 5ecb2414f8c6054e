//! End-to-end flows behind the `train` and `predict` binaries.
//!
//! - [`build_model`]: load CSV, cross-validate, refit on everything
//! - [`run_predictor`]: load a saved model and score a seeded test split
//!
//! # Example
//!
//! ```ignore
//! use fraudboost::pipeline::{self, PipelineConfig};
//!
//! let config = PipelineConfig::builder().n_folds(5).build()?;
//! let outcome = pipeline::build_model("creditcard.csv", &config)?;
//! outcome.cross_validation.print();
//! ```

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use bon::Builder;
use tracing::info;

use crate::data::{load_csv, train_test_split, CsvOptions, DataError, ModelInput, ModelOutput};
use crate::error::Result;
use crate::evaluation::{cross_validate, CrossValidationSummary, FoldResult};
use crate::model::FraudModel;
use crate::training::{ConfigError, GbdtConfig};
use crate::transform::ConcatenateFeatures;

/// File name used when a caller does not pick one.
pub const DEFAULT_MODEL_FILE: &str = "TrainedModel.zip";

// =============================================================================
// PipelineConfig
// =============================================================================

/// Settings shared by the training and prediction flows.
#[derive(Debug, Clone, PartialEq, Builder)]
#[builder(derive(Clone, Debug), finish_fn(vis = "", name = __build_internal))]
pub struct PipelineConfig {
    /// Boosting hyperparameters.
    #[builder(default)]
    pub gbdt: GbdtConfig,

    /// Cross-validation folds. Default: 5.
    #[builder(default = 5)]
    pub n_folds: usize,

    /// Share of rows scored by the predictor. Default: 0.1.
    #[builder(default = 0.1)]
    pub test_fraction: f32,

    /// Seed for fold assignment and the train/test split. Default: 1.
    #[builder(default = 1)]
    pub seed: u64,

    #[builder(default)]
    pub csv: CsvOptions,
}

impl<S: pipeline_config_builder::IsComplete> PipelineConfigBuilder<S> {
    /// Build and validate the configuration.
    pub fn build(self) -> std::result::Result<PipelineConfig, ConfigError> {
        let config = self.__build_internal();
        config.validate()?;
        Ok(config)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::builder().__build_internal()
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.n_folds < 2 {
            return Err(ConfigError::TooFewFolds(self.n_folds));
        }
        if !(self.test_fraction > 0.0 && self.test_fraction < 1.0) {
            return Err(ConfigError::InvalidTestFraction(self.test_fraction));
        }
        self.gbdt.validate()
    }
}

// =============================================================================
// Training
// =============================================================================

/// Result of [`build_model`].
#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    /// Model fitted on the full dataset.
    pub model: FraudModel,
    /// Aggregated fold metrics.
    pub cross_validation: CrossValidationSummary,
    pub folds: Vec<FoldResult>,
}

/// Load `csv_path`, cross-validate the pipeline and refit it on all rows.
///
/// Cross-validation is diagnostic only; the returned model is trained on
/// the complete file.
pub fn build_model(csv_path: impl AsRef<Path>, config: &PipelineConfig) -> Result<TrainingOutcome> {
    config.validate()?;
    let inputs = load_csv(csv_path, &config.csv)?;
    build_model_from_inputs(&inputs, config)
}

/// [`build_model`] over transactions already in memory.
pub fn build_model_from_inputs(inputs: &[ModelInput], config: &PipelineConfig) -> Result<TrainingOutcome> {
    config.validate()?;
    if inputs.is_empty() {
        return Err(DataError::Empty.into());
    }
    let transform = ConcatenateFeatures::default();
    let dataset = transform.apply(inputs);

    let folds = cross_validate(&dataset, &config.gbdt, config.n_folds, config.seed)?;
    let cross_validation = CrossValidationSummary::from_folds(&folds);
    info!(
        accuracy = cross_validation.accuracy.mean,
        auc = cross_validation.auc.mean,
        "cross-validation finished"
    );

    let model = FraudModel::fit_with_transform(inputs, transform, &config.gbdt)?;
    Ok(TrainingOutcome {
        model,
        cross_validation,
        folds,
    })
}

/// Join `relative` onto the directory containing the running executable.
pub fn resolve_relative_to_executable(relative: impl AsRef<Path>) -> io::Result<PathBuf> {
    let exe = std::env::current_exe()?;
    let dir = exe
        .parent()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "executable has no parent directory"))?;
    Ok(dir.join(relative))
}

// =============================================================================
// Prediction
// =============================================================================

/// Score the seeded test partition of `inputs`, in split order.
pub fn predict_test_split<'a>(
    model: &FraudModel,
    inputs: &'a [ModelInput],
    config: &PipelineConfig,
) -> std::result::Result<Vec<(&'a ModelInput, ModelOutput)>, ConfigError> {
    let (_, test) = train_test_split(inputs.len(), config.test_fraction, config.seed)?;
    Ok(test
        .into_iter()
        .map(|row| {
            let input = &inputs[row];
            (input, model.predict(input))
        })
        .collect())
}

/// Write one `Actual value: .. | Predicted value: ..` line per prediction.
pub fn write_predictions<W: Write>(predictions: &[(&ModelInput, ModelOutput)], out: &mut W) -> io::Result<()> {
    for (input, output) in predictions {
        writeln!(out, "Actual value: {} | Predicted value: {}", input.class, output.prediction)?;
    }
    Ok(())
}

/// Load the model at `model_path`, score the test split of `csv_path` and
/// write the per-row report to `out`. Returns the number of scored rows.
pub fn run_predictor<W: Write>(
    model_path: impl AsRef<Path>,
    csv_path: impl AsRef<Path>,
    config: &PipelineConfig,
    out: &mut W,
) -> Result<usize> {
    config.validate()?;
    let (model, _schema) = FraudModel::load(model_path)?;
    let inputs = load_csv(csv_path, &config.csv)?;

    let predictions = predict_test_split(&model, &inputs, config)?;
    info!(n_test = predictions.len(), n_rows = inputs.len(), "scoring test split");
    write_predictions(&predictions, out)?;
    Ok(predictions.len())
}

/// Block until a line (or end of input) arrives on `input`.
pub fn wait_for_keypress<R: BufRead>(mut input: R) -> io::Result<()> {
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::N_FEATURES;

    #[test]
    fn default_config() {
        let config = PipelineConfig::builder().build().unwrap();
        assert_eq!(config, PipelineConfig::default());
        assert_eq!(config.n_folds, 5);
        assert_eq!(config.test_fraction, 0.1);
        assert_eq!(config.seed, 1);
        assert_eq!(config.csv, CsvOptions::default());
    }

    #[test]
    fn config_validation() {
        assert_eq!(
            PipelineConfig::builder().n_folds(1).build(),
            Err(ConfigError::TooFewFolds(1))
        );
        assert_eq!(
            PipelineConfig::builder().test_fraction(1.0).build(),
            Err(ConfigError::InvalidTestFraction(1.0))
        );
        let gbdt = GbdtConfig {
            n_trees: 0,
            ..Default::default()
        };
        assert_eq!(PipelineConfig::builder().gbdt(gbdt).build(), Err(ConfigError::InvalidNTrees));
    }

    #[test]
    fn prediction_lines() {
        let legit = ModelInput::new([0.0; N_FEATURES], false);
        let fraud = ModelInput::new([0.0; N_FEATURES], true);
        let predictions = vec![
            (&legit, ModelOutput::from_score(-3.0)),
            (&fraud, ModelOutput::from_score(1.5)),
        ];
        let mut out = Vec::new();
        write_predictions(&predictions, &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Actual value: false | Predicted value: false\nActual value: true | Predicted value: true\n"
        );
    }

    #[test]
    fn keypress_accepts_line_or_eof() {
        assert!(wait_for_keypress(&b"\n"[..]).is_ok());
        assert!(wait_for_keypress(&b""[..]).is_ok());
    }

    #[test]
    fn relative_paths_land_next_to_executable() {
        let path = resolve_relative_to_executable(DEFAULT_MODEL_FILE).unwrap();
        assert!(path.ends_with(DEFAULT_MODEL_FILE));
        assert!(path.is_absolute());
    }
}
