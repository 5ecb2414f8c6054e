//! Aggregated cross-validation report.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::cross_validation::FoldResult;
use super::stats::{confidence_interval_95, mean, standard_deviation};

/// Mean, sample standard deviation and 95% CI half-width of one metric.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricSummary {
    pub mean: f64,
    pub std_dev: f64,
    pub ci95: f64,
}

impl MetricSummary {
    pub fn from_values(values: &[f64]) -> Self {
        Self {
            mean: mean(values),
            std_dev: standard_deviation(values),
            ci95: confidence_interval_95(values),
        }
    }
}

/// Per-metric aggregates over all folds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossValidationSummary {
    pub n_folds: usize,
    pub accuracy: MetricSummary,
    pub auc: MetricSummary,
    pub auprc: MetricSummary,
    pub f1_score: MetricSummary,
    pub positive_precision: MetricSummary,
    pub positive_recall: MetricSummary,
}

impl CrossValidationSummary {
    pub fn from_folds(folds: &[FoldResult]) -> Self {
        let summarize = |metric: fn(&FoldResult) -> f64| {
            let values: Vec<f64> = folds.iter().map(metric).collect();
            MetricSummary::from_values(&values)
        };
        Self {
            n_folds: folds.len(),
            accuracy: summarize(|f| f.metrics.accuracy),
            auc: summarize(|f| f.metrics.auc),
            auprc: summarize(|f| f.metrics.auprc),
            f1_score: summarize(|f| f.metrics.f1_score),
            positive_precision: summarize(|f| f.metrics.positive_precision),
            positive_recall: summarize(|f| f.metrics.positive_recall),
        }
    }

    /// Print the metrics block to stdout.
    pub fn print(&self) {
        println!("{self}");
    }
}

/// Width of the `*` rules framing the metrics block.
const RULE_WIDTH: usize = 109;

impl fmt::Display for CrossValidationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:*<width$}", "", width = RULE_WIDTH)?;
        writeln!(f, "*       Metrics for Binary Classification model      ")?;
        writeln!(f, "*{:-<width$}", "", width = RULE_WIDTH - 1)?;
        writeln!(
            f,
            "*       Average Accuracy:    {:.3}  - Standard deviation: ({:.3})  - Confidence Interval 95%: ({:.3})",
            self.accuracy.mean, self.accuracy.std_dev, self.accuracy.ci95
        )?;
        writeln!(
            f,
            "*       Average AUC:         {:.3}  - Standard deviation: ({:.3})",
            self.auc.mean, self.auc.std_dev
        )?;
        writeln!(f, "*       Average AUPRC:       {:.3}", self.auprc.mean)?;
        writeln!(f, "*       Average F1 Score:    {:.3}", self.f1_score.mean)?;
        writeln!(
            f,
            "*       Positive Precision:  {:.3}  - Positive Recall: {:.3}",
            self.positive_precision.mean, self.positive_recall.mean
        )?;
        write!(f, "{:*<width$}", "", width = RULE_WIDTH)
    }
}
