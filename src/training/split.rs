//! Greedy split search over node histograms.

use crate::utils::Parallelism;

use super::gain::GainParams;
use super::histogram::{Histogram, HistogramBin, HistogramLayout};

/// Gradient statistics of a set of rows.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NodeStats {
    pub grad: f64,
    pub hess: f64,
    pub count: u32,
}

impl NodeStats {
    fn minus(self, other: HistogramBin) -> Self {
        Self {
            grad: self.grad - other.grad,
            hess: self.hess - other.hess,
            count: self.count - other.count,
        }
    }
}

impl From<HistogramBin> for NodeStats {
    fn from(bin: HistogramBin) -> Self {
        Self {
            grad: bin.grad,
            hess: bin.hess,
            count: bin.count,
        }
    }
}

/// Best split found for a node: rows with `bin <= bin` go left.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitInfo {
    pub feature: usize,
    pub bin: u8,
    pub gain: f64,
    pub left: NodeStats,
    pub right: NodeStats,
}

/// Find the split with the highest positive gain.
///
/// Ties go to the lowest feature, then the lowest bin, so the result does not
/// depend on `parallelism`.
pub fn find_best_split(
    histogram: &Histogram,
    layout: &HistogramLayout,
    parent: NodeStats,
    params: &GainParams,
    parallelism: Parallelism,
) -> Option<SplitInfo> {
    let per_feature = parallelism.maybe_par_map(0..layout.n_features(), |feature| {
        best_split_for_feature(histogram.feature(layout, feature), feature, parent, params)
    });

    per_feature
        .into_iter()
        .flatten()
        .fold(None, |best: Option<SplitInfo>, candidate| match best {
            Some(b) if b.gain >= candidate.gain => Some(b),
            _ => Some(candidate),
        })
}

fn best_split_for_feature(
    bins: &[HistogramBin],
    feature: usize,
    parent: NodeStats,
    params: &GainParams,
) -> Option<SplitInfo> {
    let mut best: Option<SplitInfo> = None;
    let mut left = HistogramBin::default();

    // The last bin cannot be a threshold: nothing would go right.
    for (bin, stats) in bins.iter().enumerate().take(bins.len().saturating_sub(1)) {
        left.grad += stats.grad;
        left.hess += stats.hess;
        left.count += stats.count;

        let right = parent.minus(left);
        if !params.is_valid_split(left.hess, right.hess, left.count, right.count) {
            continue;
        }

        let gain = params.compute_gain(left.grad, left.hess, right.grad, right.hess, parent.grad, parent.hess);
        if gain > 0.0 && best.as_ref().map_or(true, |b| gain > b.gain) {
            best = Some(SplitInfo {
                feature,
                bin: bin as u8,
                gain,
                left: left.into(),
                right,
            });
        }
    }
    best
}
