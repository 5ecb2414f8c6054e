//! Dense training data: a sample-major feature matrix plus binary labels.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

use super::DataError;

/// Feature matrix with shape `[n_rows, n_features]` and labels in `{0, 1}`.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    features: Array2<f32>,
    labels: Array1<f32>,
}

impl Dataset {
    /// Create a dataset, checking that features and labels agree on row count.
    pub fn new(features: Array2<f32>, labels: Array1<f32>) -> Result<Self, DataError> {
        if features.nrows() != labels.len() {
            return Err(DataError::Schema(format!(
                "{} feature rows but {} labels",
                features.nrows(),
                labels.len()
            )));
        }
        Ok(Self { features, labels })
    }

    /// Wrap arrays whose row counts are known to agree.
    pub(crate) fn from_arrays(features: Array2<f32>, labels: Array1<f32>) -> Self {
        debug_assert_eq!(features.nrows(), labels.len());
        Self { features, labels }
    }

    /// Build from a row-major buffer.
    pub fn from_vec(
        features: Vec<f32>,
        n_rows: usize,
        n_features: usize,
        labels: Vec<f32>,
    ) -> Result<Self, DataError> {
        let features = Array2::from_shape_vec((n_rows, n_features), features)
            .map_err(|e| DataError::Schema(e.to_string()))?;
        Self::new(features, Array1::from(labels))
    }

    #[inline]
    pub fn n_rows(&self) -> usize {
        self.features.nrows()
    }

    #[inline]
    pub fn n_features(&self) -> usize {
        self.features.ncols()
    }

    pub fn is_empty(&self) -> bool {
        self.n_rows() == 0
    }

    pub fn features(&self) -> ArrayView2<'_, f32> {
        self.features.view()
    }

    pub fn labels(&self) -> ArrayView1<'_, f32> {
        self.labels.view()
    }

    /// Feature values of one row.
    pub fn row(&self, row: usize) -> ArrayView1<'_, f32> {
        self.features.row(row)
    }

    /// Number of positive (fraud) labels.
    pub fn n_positive(&self) -> usize {
        self.labels.iter().filter(|&&l| l > 0.5).count()
    }

    /// Copy the given rows into a new dataset, in the given order.
    pub fn select(&self, rows: &[usize]) -> Self {
        Self {
            features: self.features.select(Axis(0), rows),
            labels: self.labels.select(Axis(0), rows),
        }
    }
}
