//! Transaction schema shared by training and inference.
//!
//! [`FEATURE_COLUMNS`] is the single source of truth for the feature order fed
//! into the classifier. Both the trainer and the predictor go through
//! [`ModelInput`], so a model can only ever see the columns listed here.

use serde::{Deserialize, Serialize};

/// Number of numeric feature columns per transaction.
pub const N_FEATURES: usize = 30;

/// Feature columns in the order they are concatenated into the feature vector.
pub const FEATURE_COLUMNS: [&str; N_FEATURES] = [
    "Time", "V1", "V2", "V3", "V4", "V5", "V6", "V7", "V8", "V9", "V10", "V11", "V12", "V13",
    "V14", "V15", "V16", "V17", "V18", "V19", "V20", "V21", "V22", "V23", "V24", "V25", "V26",
    "V27", "V28", "Amount",
];

/// Binary label column (1 = fraud, 0 = legitimate).
pub const LABEL_COLUMN: &str = "Class";

/// Name of the concatenated feature vector column.
pub const FEATURES_COLUMN: &str = "Features";

/// Position of a feature column inside [`FEATURE_COLUMNS`].
pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_COLUMNS.iter().position(|&c| c == name)
}

// =============================================================================
// ModelInput
// =============================================================================

/// One labeled card transaction.
///
/// Feature values are stored in [`FEATURE_COLUMNS`] order.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelInput {
    features: [f32; N_FEATURES],
    /// True when the transaction is fraudulent.
    pub class: bool,
}

impl ModelInput {
    /// Create a transaction from feature values in [`FEATURE_COLUMNS`] order.
    pub fn new(features: [f32; N_FEATURES], class: bool) -> Self {
        Self { features, class }
    }

    /// All feature values in [`FEATURE_COLUMNS`] order.
    #[inline]
    pub fn features(&self) -> &[f32; N_FEATURES] {
        &self.features
    }

    /// Value of a named feature column.
    pub fn column(&self, name: &str) -> Option<f32> {
        feature_index(name).map(|i| self.features[i])
    }

    /// `Time`: seconds elapsed since the first transaction in the dataset.
    pub fn time(&self) -> f32 {
        self.features[0]
    }

    /// `V1`..`V28`: anonymized principal components.
    pub fn components(&self) -> &[f32] {
        &self.features[1..N_FEATURES - 1]
    }

    /// `Amount`: transaction amount.
    pub fn amount(&self) -> f32 {
        self.features[N_FEATURES - 1]
    }

    /// Label as `0.0` / `1.0`.
    #[inline]
    pub fn label(&self) -> f32 {
        if self.class { 1.0 } else { 0.0 }
    }
}

// =============================================================================
// ModelOutput
// =============================================================================

/// One prediction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelOutput {
    /// Predicted label (`score > 0`).
    pub prediction: bool,
    /// Raw, non-calibrated margin (log-odds).
    pub score: f32,
}

impl ModelOutput {
    /// Build an output from a raw margin.
    pub fn from_score(score: f32) -> Self {
        Self { prediction: score > 0.0, score }
    }

    /// Sigmoid of the margin.
    pub fn probability(&self) -> f32 {
        crate::utils::sigmoid(self.score)
    }
}

// =============================================================================
// InputSchema
// =============================================================================

/// Column layout a model was trained against.
///
/// Persisted next to the model so a loader can reject archives built for a
/// different feature set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSchema {
    /// Feature column names, in feature-vector order.
    pub feature_columns: Vec<String>,
    /// Label column name.
    pub label_column: String,
}

impl Default for InputSchema {
    fn default() -> Self {
        Self {
            feature_columns: FEATURE_COLUMNS.iter().map(|c| c.to_string()).collect(),
            label_column: LABEL_COLUMN.to_string(),
        }
    }
}

impl InputSchema {
    /// True when this is exactly the transaction schema of this crate.
    pub fn is_canonical(&self) -> bool {
        *self == Self::default()
    }
}
