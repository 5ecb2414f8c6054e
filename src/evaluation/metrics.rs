//! Binary classification metrics over raw margins.
//!
//! A row is predicted positive when its margin is `> 0` (probability above
//! one half). Ratios with an empty denominator are reported as 0.

use serde::{Deserialize, Serialize};

/// Counts of a 2x2 confusion matrix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    pub true_positives: usize,
    pub false_positives: usize,
    pub true_negatives: usize,
    pub false_negatives: usize,
}

impl ConfusionMatrix {
    pub fn total(&self) -> usize {
        self.true_positives + self.false_positives + self.true_negatives + self.false_negatives
    }
}

/// Metrics of one evaluated partition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryClassificationMetrics {
    pub accuracy: f64,
    /// Area under the ROC curve.
    pub auc: f64,
    /// Area under the precision-recall curve (average precision).
    pub auprc: f64,
    pub f1_score: f64,
    pub positive_precision: f64,
    pub positive_recall: f64,
    pub negative_precision: f64,
    pub negative_recall: f64,
    pub confusion: ConfusionMatrix,
}

impl BinaryClassificationMetrics {
    /// Compute metrics from margins and `{0, 1}` labels.
    pub fn compute(scores: &[f32], labels: &[f32]) -> Self {
        debug_assert_eq!(scores.len(), labels.len());

        let mut confusion = ConfusionMatrix::default();
        for (&score, &label) in scores.iter().zip(labels) {
            match (score > 0.0, label > 0.5) {
                (true, true) => confusion.true_positives += 1,
                (true, false) => confusion.false_positives += 1,
                (false, false) => confusion.true_negatives += 1,
                (false, true) => confusion.false_negatives += 1,
            }
        }

        let c = &confusion;
        let positive_precision = ratio(c.true_positives, c.true_positives + c.false_positives);
        let positive_recall = ratio(c.true_positives, c.true_positives + c.false_negatives);
        let f1_score = if positive_precision + positive_recall > 0.0 {
            2.0 * positive_precision * positive_recall / (positive_precision + positive_recall)
        } else {
            0.0
        };

        Self {
            accuracy: ratio(c.true_positives + c.true_negatives, c.total()),
            auc: auc(scores, labels),
            auprc: average_precision(scores, labels),
            f1_score,
            positive_precision,
            positive_recall,
            negative_precision: ratio(c.true_negatives, c.true_negatives + c.false_negatives),
            negative_recall: ratio(c.true_negatives, c.true_negatives + c.false_positives),
            confusion,
        }
    }
}

#[inline]
fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

/// Indices sorted by descending score.
fn rank_descending(scores: &[f32]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));
    order
}

/// ROC AUC via the Mann-Whitney statistic; tied scores share their average rank.
///
/// Returns 0 when only one class is present.
pub fn auc(scores: &[f32], labels: &[f32]) -> f64 {
    let n_pos = labels.iter().filter(|&&l| l > 0.5).count();
    let n_neg = labels.len() - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return 0.0;
    }

    // ascending ranks, 1-based
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[a].total_cmp(&scores[b]));

    let mut positive_rank_sum = 0.0f64;
    let mut i = 0;
    while i < order.len() {
        let mut j = i;
        while j + 1 < order.len() && scores[order[j + 1]] == scores[order[i]] {
            j += 1;
        }
        let avg_rank = (i + j) as f64 / 2.0 + 1.0;
        for &idx in &order[i..=j] {
            if labels[idx] > 0.5 {
                positive_rank_sum += avg_rank;
            }
        }
        i = j + 1;
    }

    let n_pos = n_pos as f64;
    (positive_rank_sum - n_pos * (n_pos + 1.0) / 2.0) / (n_pos * n_neg as f64)
}

/// Average precision: mean of the precision at the rank of each positive.
///
/// Tied scores are processed as one group. Returns 0 without positives.
pub fn average_precision(scores: &[f32], labels: &[f32]) -> f64 {
    let n_pos = labels.iter().filter(|&&l| l > 0.5).count();
    if n_pos == 0 {
        return 0.0;
    }

    let order = rank_descending(scores);
    let mut tp = 0usize;
    let mut seen = 0usize;
    let mut prev_recall = 0.0f64;
    let mut ap = 0.0f64;
    let mut i = 0;
    while i < order.len() {
        let mut j = i;
        while j < order.len() && scores[order[j]] == scores[order[i]] {
            if labels[order[j]] > 0.5 {
                tp += 1;
            }
            seen += 1;
            j += 1;
        }
        let recall = tp as f64 / n_pos as f64;
        let precision = tp as f64 / seen as f64;
        ap += (recall - prev_recall) * precision;
        prev_recall = recall;
        i = j;
    }
    ap
}
