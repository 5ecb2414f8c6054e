//! Feature concatenation: the single data transform of the pipeline.
//!
//! [`ConcatenateFeatures`] gathers named numeric columns of a [`ModelInput`]
//! into one feature vector. The column list is persisted with the model and
//! checked on load, so training and inference always see the same layout.

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::data::schema::feature_index;
use crate::data::{DataError, Dataset, ModelInput, FEATURES_COLUMN, FEATURE_COLUMNS};

/// Concatenate named input columns into the `Features` vector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TransformPayload", into = "TransformPayload")]
pub struct ConcatenateFeatures {
    output_column: String,
    input_columns: Vec<String>,
    /// Position of each input column in [`ModelInput::features`].
    indices: Vec<usize>,
}

impl Default for ConcatenateFeatures {
    /// All of [`FEATURE_COLUMNS`], in order.
    fn default() -> Self {
        Self {
            output_column: FEATURES_COLUMN.to_string(),
            input_columns: FEATURE_COLUMNS.iter().map(|c| c.to_string()).collect(),
            indices: (0..FEATURE_COLUMNS.len()).collect(),
        }
    }
}

impl ConcatenateFeatures {
    /// Create a transform over the given columns.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::MissingColumn`] for a name that is not a feature
    /// column and [`DataError::Schema`] for duplicates or an empty list.
    pub fn new<S: AsRef<str>>(output_column: &str, input_columns: &[S]) -> Result<Self, DataError> {
        if input_columns.is_empty() {
            return Err(DataError::Schema("no input columns to concatenate".into()));
        }
        let mut indices = Vec::with_capacity(input_columns.len());
        for column in input_columns {
            let column = column.as_ref();
            let idx = feature_index(column).ok_or_else(|| DataError::MissingColumn(column.to_string()))?;
            if indices.contains(&idx) {
                return Err(DataError::Schema(format!("column {column:?} listed twice")));
            }
            indices.push(idx);
        }
        Ok(Self {
            output_column: output_column.to_string(),
            input_columns: input_columns.iter().map(|c| c.as_ref().to_string()).collect(),
            indices,
        })
    }

    pub fn output_column(&self) -> &str {
        &self.output_column
    }

    pub fn input_columns(&self) -> &[String] {
        &self.input_columns
    }

    /// Length of the produced feature vector.
    pub fn n_outputs(&self) -> usize {
        self.indices.len()
    }

    /// Feature vector of a single transaction.
    pub fn apply_one(&self, input: &ModelInput) -> Vec<f32> {
        let features = input.features();
        self.indices.iter().map(|&i| features[i]).collect()
    }

    /// Write the feature vector of `input` into `out`.
    #[inline]
    pub fn apply_into(&self, input: &ModelInput, out: &mut [f32]) {
        debug_assert_eq!(out.len(), self.indices.len());
        let features = input.features();
        for (slot, &i) in out.iter_mut().zip(&self.indices) {
            *slot = features[i];
        }
    }

    /// Feature matrix and labels for a batch of transactions.
    pub fn apply(&self, inputs: &[ModelInput]) -> Dataset {
        let n_features = self.n_outputs();
        let mut features = Array2::<f32>::zeros((inputs.len(), n_features));
        for (mut row, input) in features.rows_mut().into_iter().zip(inputs) {
            let values = input.features();
            for (slot, &i) in row.iter_mut().zip(&self.indices) {
                *slot = values[i];
            }
        }
        let labels = Array1::from_iter(inputs.iter().map(ModelInput::label));
        Dataset::from_arrays(features, labels)
    }
}

/// Serialized form: only the names; indices are re-resolved on load.
#[derive(Serialize, Deserialize)]
struct TransformPayload {
    output_column: String,
    input_columns: Vec<String>,
}

impl TryFrom<TransformPayload> for ConcatenateFeatures {
    type Error = DataError;

    fn try_from(payload: TransformPayload) -> Result<Self, Self::Error> {
        Self::new(&payload.output_column, &payload.input_columns)
    }
}

impl From<ConcatenateFeatures> for TransformPayload {
    fn from(t: ConcatenateFeatures) -> Self {
        Self {
            output_column: t.output_column,
            input_columns: t.input_columns,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::N_FEATURES;

    fn sample(class: bool) -> ModelInput {
        let mut features = [0.0f32; N_FEATURES];
        for (i, f) in features.iter_mut().enumerate() {
            *f = i as f32 * 10.0;
        }
        ModelInput::new(features, class)
    }

    #[test]
    fn default_transform_feeds_all_columns_in_order() {
        let t = ConcatenateFeatures::default();
        assert_eq!(t.output_column(), "Features");
        assert_eq!(t.input_columns(), FEATURE_COLUMNS.map(String::from).as_slice());
        assert_eq!(t, ConcatenateFeatures::new("Features", &FEATURE_COLUMNS).unwrap());
    }

    #[test]
    fn apply_builds_matrix_and_labels() {
        let ds = ConcatenateFeatures::default().apply(&[sample(false), sample(true)]);
        assert_eq!(ds.n_rows(), 2);
        assert_eq!(ds.n_features(), 30);
        assert_eq!(ds.row(1)[29], 290.0);
        assert_eq!(ds.labels().to_vec(), vec![0.0, 1.0]);
    }

    #[test]
    fn subset_transform_selects_columns() {
        let t = ConcatenateFeatures::new("Features", &["Amount", "Time"]).unwrap();
        assert_eq!(t.apply_one(&sample(false)), vec![290.0, 0.0]);

        let ds = t.apply(&[sample(false), sample(true)]);
        assert_eq!(ds.n_features(), 2);
        for i in 0..ds.n_rows() {
            assert_eq!(ds.row(i).to_vec(), vec![290.0, 0.0]);
        }
    }

    #[test]
    fn unknown_and_duplicate_columns_are_rejected() {
        assert!(matches!(
            ConcatenateFeatures::new("Features", &["Time", "V29"]),
            Err(DataError::MissingColumn(_))
        ));
        assert!(matches!(
            ConcatenateFeatures::new("Features", &["Time", "Time"]),
            Err(DataError::Schema(_))
        ));
    }

    #[test]
    fn serde_roundtrip_resolves_indices() {
        let t = ConcatenateFeatures::new("Features", &["V3", "Amount"]).unwrap();
        let json = serde_json::to_string(&t).unwrap();
        let restored: ConcatenateFeatures = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, t);

        let bad = r#"{"output_column":"Features","input_columns":["Bogus"]}"#;
        assert!(serde_json::from_str::<ConcatenateFeatures>(bad).is_err());
    }
}
