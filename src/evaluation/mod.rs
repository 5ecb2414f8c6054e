//! Model evaluation: classification metrics, k-fold cross-validation and the
//! aggregated report printed by the trainer.

mod cross_validation;
mod metrics;
mod report;
pub mod stats;

pub use cross_validation::{cross_validate, FoldResult};
pub use metrics::{auc, average_precision, BinaryClassificationMetrics, ConfusionMatrix};
pub use report::{CrossValidationSummary, MetricSummary};
pub use stats::{confidence_interval_95, mean, standard_deviation};
