//! Data loading and training-data layout.
//!
//! - [`schema`]: transaction schema ([`ModelInput`], [`FEATURE_COLUMNS`])
//! - [`loader`]: CSV reading with strict header validation
//! - [`dataset`]: dense feature matrix + labels
//! - [`split`]: deterministic train/test and k-fold splits
//! - [`binned`]: quantile binning used by the tree learner

pub mod binned;
pub mod dataset;
pub mod loader;
pub mod schema;
pub mod split;

pub use binned::{BinMapper, BinnedDataset};
pub use dataset::Dataset;
pub use loader::{load_csv, read_csv, CsvOptions};
pub use schema::{
    InputSchema, ModelInput, ModelOutput, FEATURES_COLUMN, FEATURE_COLUMNS, LABEL_COLUMN,
    N_FEATURES,
};
pub use split::{kfold_assignments, train_test_split};

use std::io;
use std::path::PathBuf;

/// Errors that can occur when loading transaction data.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("failed to open {path}: {source}")]
    Open { path: PathBuf, source: io::Error },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("schema validation failed: {0}")]
    Schema(String),

    #[error("missing required column: {0}")]
    MissingColumn(String),

    #[error("row {row}: column {column} has non-numeric value {value:?}")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },

    #[error("row {row}: label {value:?} is not 0 or 1")]
    InvalidLabel { row: usize, value: String },

    #[error("no data rows in input")]
    Empty,
}
