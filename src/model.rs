//! The trained pipeline: feature transform plus fitted forest.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::data::{DataError, InputSchema, ModelInput, ModelOutput, LABEL_COLUMN, N_FEATURES};
use crate::error::Result;
use crate::persist::{self, PersistError};
use crate::repr::Forest;
use crate::training::{GbdtConfig, GbdtTrainer};
use crate::transform::ConcatenateFeatures;

/// Version of the on-disk model layout written by [`persist::save`].
pub const FORMAT_VERSION: u32 = 1;

/// Facts about how a model was trained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMeta {
    pub format_version: u32,
    /// Version of this crate that trained the model.
    pub crate_version: String,
    pub n_features: usize,
    pub n_train_rows: usize,
    pub n_positive: usize,
    pub config: GbdtConfig,
}

/// A fitted fraud classifier, ready for scoring and persistence.
#[derive(Debug, Clone, PartialEq)]
pub struct FraudModel {
    transform: ConcatenateFeatures,
    forest: Forest,
    meta: ModelMeta,
}

impl FraudModel {
    /// Fit on all `inputs` with the default transform (every feature column).
    pub fn fit(inputs: &[ModelInput], config: &GbdtConfig) -> Result<Self> {
        Self::fit_with_transform(inputs, ConcatenateFeatures::default(), config)
    }

    /// Fit on all `inputs` using `transform` to build the feature vectors.
    pub fn fit_with_transform(
        inputs: &[ModelInput],
        transform: ConcatenateFeatures,
        config: &GbdtConfig,
    ) -> Result<Self> {
        if inputs.is_empty() {
            return Err(DataError::Empty.into());
        }
        let trainer = GbdtTrainer::new(config.clone())?;
        let dataset = transform.apply(inputs);

        info!(
            n_rows = dataset.n_rows(),
            n_positive = dataset.n_positive(),
            "fitting model on full dataset"
        );
        let forest = trainer.train(&dataset);

        let meta = ModelMeta {
            format_version: FORMAT_VERSION,
            crate_version: env!("CARGO_PKG_VERSION").to_string(),
            n_features: transform.n_outputs(),
            n_train_rows: dataset.n_rows(),
            n_positive: dataset.n_positive(),
            config: config.clone(),
        };
        Ok(Self { transform, forest, meta })
    }

    /// Reassemble a model from its parts, checking that they fit together.
    pub fn from_parts(
        transform: ConcatenateFeatures,
        forest: Forest,
        meta: ModelMeta,
    ) -> std::result::Result<Self, PersistError> {
        if meta.n_features != transform.n_outputs() {
            return Err(PersistError::SchemaMismatch(format!(
                "metadata declares {} features but the transform produces {}",
                meta.n_features,
                transform.n_outputs()
            )));
        }
        forest.validate(transform.n_outputs())?;
        Ok(Self { transform, forest, meta })
    }

    /// Score one transaction.
    pub fn predict(&self, input: &ModelInput) -> ModelOutput {
        let mut features = [0.0f32; N_FEATURES];
        let features = &mut features[..self.transform.n_outputs()];
        self.transform.apply_into(input, features);
        ModelOutput::from_score(self.forest.predict_row(features))
    }

    /// Score many transactions.
    pub fn predict_batch(&self, inputs: &[ModelInput]) -> Vec<ModelOutput> {
        inputs.iter().map(|input| self.predict(input)).collect()
    }

    /// Input columns this model consumes.
    pub fn schema(&self) -> InputSchema {
        InputSchema {
            feature_columns: self.transform.input_columns().to_vec(),
            label_column: LABEL_COLUMN.to_string(),
        }
    }

    pub fn transform(&self) -> &ConcatenateFeatures {
        &self.transform
    }

    pub fn forest(&self) -> &Forest {
        &self.forest
    }

    pub fn meta(&self) -> &ModelMeta {
        &self.meta
    }

    /// Feature columns by descending share of total split gain.
    pub fn feature_importance(&self) -> Vec<(String, f64)> {
        let mut ranked: Vec<(String, f64)> = self
            .transform
            .input_columns()
            .iter()
            .cloned()
            .zip(self.forest.feature_importance(self.transform.n_outputs()))
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked
    }

    /// Write the model and its input schema to a zip archive at `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        persist::save(self, path.as_ref())?;
        Ok(())
    }

    /// Load a model saved with [`FraudModel::save`].
    ///
    /// Returns the model and the input schema stored next to it.
    pub fn load(path: impl AsRef<Path>) -> Result<(Self, InputSchema)> {
        Ok(persist::load(path.as_ref())?)
    }
}
