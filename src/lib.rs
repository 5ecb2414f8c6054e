//! fraudboost: gradient-boosted trees for credit-card fraud detection.
//!
//! The crate trains a binary classifier over the 30 anonymized numeric
//! features of a card transaction (`Time`, `V1`..`V28`, `Amount`) and applies
//! it to held-out transactions.
//!
//! # Key Types
//!
//! - [`ModelInput`] / [`ModelOutput`] - One transaction and one prediction
//! - [`ConcatenateFeatures`] - The fixed feature-vector transform
//! - [`GbdtConfig`] / [`PipelineConfig`] - Configuration builders
//! - [`FraudModel`] - The trained pipeline artifact (fit, predict, save, load)
//!
//! # Training
//!
//! ```ignore
//! use fraudboost::{pipeline, PipelineConfig};
//!
//! let config = PipelineConfig::builder().build()?;
//! let outcome = pipeline::build_model("creditcard.csv", &config)?;
//! outcome.cross_validation.print();
//! outcome.model.save("CreditCardFraudDetection.zip")?;
//! ```

pub mod data;
pub mod error;
pub mod evaluation;
pub mod logging;
pub mod model;
pub mod persist;
pub mod pipeline;
pub mod repr;
pub mod training;
pub mod transform;
pub mod utils;

// =============================================================================
// Convenience Re-exports
// =============================================================================

pub use data::{CsvOptions, DataError, Dataset, ModelInput, ModelOutput, FEATURE_COLUMNS, LABEL_COLUMN};
pub use error::{Error, Result};
pub use evaluation::{BinaryClassificationMetrics, CrossValidationSummary, FoldResult};
pub use model::{FraudModel, ModelMeta};
pub use pipeline::{PipelineConfig, TrainingOutcome};
pub use training::{ConfigError, GbdtConfig, GrowthStrategy, RegularizationParams, TreeParams};
pub use transform::ConcatenateFeatures;
pub use utils::Parallelism;
