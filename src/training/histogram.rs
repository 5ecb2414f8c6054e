//! Gradient histograms over binned features.
//!
//! A node histogram holds, for every (feature, bin), the sum of gradients,
//! the sum of hessians and the sample count of the node's rows. Sibling
//! histograms are obtained by subtraction from the parent.

use crate::data::BinnedDataset;
use crate::utils::Parallelism;

use super::objective::GradsTuple;

/// Accumulated statistics of one bin.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HistogramBin {
    pub grad: f64,
    pub hess: f64,
    pub count: u32,
}

impl HistogramBin {
    #[inline]
    fn add(&mut self, gh: GradsTuple) {
        self.grad += gh.grad as f64;
        self.hess += gh.hess as f64;
        self.count += 1;
    }
}

/// Offsets of each feature's bins inside a flat histogram.
#[derive(Debug, Clone)]
pub struct HistogramLayout {
    offsets: Vec<usize>,
    n_bins: usize,
}

impl HistogramLayout {
    pub fn new(dataset: &BinnedDataset) -> Self {
        let mut offsets = Vec::with_capacity(dataset.n_features() + 1);
        let mut total = 0usize;
        for f in 0..dataset.n_features() {
            offsets.push(total);
            total += dataset.n_bins(f);
        }
        offsets.push(total);
        Self { offsets, n_bins: total }
    }

    #[inline]
    pub fn n_features(&self) -> usize {
        self.offsets.len() - 1
    }

    #[inline]
    fn range(&self, feature: usize) -> std::ops::Range<usize> {
        self.offsets[feature]..self.offsets[feature + 1]
    }
}

/// Per-node histogram, all features concatenated.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    bins: Vec<HistogramBin>,
}

impl Histogram {
    /// Build the histogram of `rows`.
    pub fn build(
        dataset: &BinnedDataset,
        layout: &HistogramLayout,
        rows: &[u32],
        grad_hess: &[GradsTuple],
        parallelism: Parallelism,
    ) -> Self {
        let per_feature = parallelism.maybe_par_map(0..layout.n_features(), |feature| {
            let feature_bins = dataset.feature_bins(feature);
            let mut hist = vec![HistogramBin::default(); layout.range(feature).len()];
            for &row in rows {
                let row = row as usize;
                hist[feature_bins[row] as usize].add(grad_hess[row]);
            }
            hist
        });

        let mut bins = Vec::with_capacity(layout.n_bins);
        for hist in per_feature {
            bins.extend(hist);
        }
        Self { bins }
    }

    /// Histogram of the sibling: `parent - self`.
    pub fn sibling_of(&self, parent: &Histogram) -> Self {
        debug_assert_eq!(self.bins.len(), parent.bins.len());
        let bins = parent
            .bins
            .iter()
            .zip(&self.bins)
            .map(|(p, c)| HistogramBin {
                grad: p.grad - c.grad,
                hess: p.hess - c.hess,
                count: p.count - c.count,
            })
            .collect();
        Self { bins }
    }

    /// Bins of one feature.
    #[inline]
    pub fn feature<'a>(&'a self, layout: &HistogramLayout, feature: usize) -> &'a [HistogramBin] {
        &self.bins[layout.range(feature)]
    }
}
