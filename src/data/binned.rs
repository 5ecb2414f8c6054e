//! Quantile binning for histogram-based tree learning.
//!
//! Each feature is discretized into at most `max_bins` ordered bins. A
//! [`BinMapper`] keeps the upper bound of every bin so that a split found in
//! bin space can be turned back into a raw threshold:
//! `bin <= b` on training data is exactly `value <= upper_bound(b)` on raw data.

use ndarray::ArrayView1;

use super::Dataset;

// ============================================================================
// BinMapper
// ============================================================================

/// Mapping from continuous values to bin indices for one feature.
#[derive(Clone, Debug, PartialEq)]
pub struct BinMapper {
    /// Value v maps to the first bin where `v <= bound[bin]`.
    /// The last bound is always `+inf`.
    bin_upper_bounds: Box<[f32]>,
}

impl BinMapper {
    /// Fit bin boundaries from the values of one feature.
    ///
    /// With at most `max_bins` distinct values every value gets its own bin.
    /// Otherwise boundaries are placed at (approximately) equal-count
    /// quantiles, never splitting a run of equal values.
    pub fn fit(values: ArrayView1<f32>, max_bins: usize) -> Self {
        debug_assert!(max_bins >= 2);

        let mut sorted: Vec<f32> = values.iter().copied().filter(|v| !v.is_nan()).collect();
        sorted.sort_by(f32::total_cmp);

        // (value, count) runs
        let mut distinct: Vec<(f32, usize)> = Vec::new();
        for v in sorted.iter().copied() {
            match distinct.last_mut() {
                Some((last, count)) if *last == v => *count += 1,
                _ => distinct.push((v, 1)),
            }
        }

        let mut bounds = Vec::with_capacity(max_bins.min(distinct.len()).max(1));
        if distinct.len() <= max_bins {
            for pair in distinct.windows(2) {
                bounds.push(midpoint(pair[0].0, pair[1].0));
            }
        } else {
            let total = sorted.len() as f64;
            let per_bin = total / max_bins as f64;
            let mut cumulative = 0usize;
            for (i, &(value, count)) in distinct.iter().enumerate().take(distinct.len() - 1) {
                cumulative += count;
                let target = per_bin * (bounds.len() + 1) as f64;
                if cumulative as f64 >= target && bounds.len() + 1 < max_bins {
                    bounds.push(midpoint(value, distinct[i + 1].0));
                }
            }
        }
        bounds.push(f32::INFINITY);

        Self {
            bin_upper_bounds: bounds.into_boxed_slice(),
        }
    }

    /// Number of bins.
    #[inline]
    pub fn n_bins(&self) -> usize {
        self.bin_upper_bounds.len()
    }

    /// Check if this feature is trivial (only one bin, no splits possible).
    #[inline]
    pub fn is_trivial(&self) -> bool {
        self.n_bins() <= 1
    }

    /// Map a value to its bin index.
    #[inline]
    pub fn value_to_bin(&self, value: f32) -> usize {
        let bin = self.bin_upper_bounds.partition_point(|&b| b < value);
        bin.min(self.n_bins() - 1)
    }

    /// Raw threshold equivalent to "bin <= `bin`".
    #[inline]
    pub fn upper_bound(&self, bin: usize) -> f32 {
        self.bin_upper_bounds[bin]
    }
}

/// Midpoint between two consecutive distinct values, guaranteed `< hi`.
fn midpoint(lo: f32, hi: f32) -> f32 {
    let mid = ((lo as f64 + hi as f64) / 2.0) as f32;
    if mid >= hi { lo } else { mid }
}

// ============================================================================
// BinnedDataset
// ============================================================================

/// Column-major bin indices for every feature of a [`Dataset`].
#[derive(Clone, Debug)]
pub struct BinnedDataset {
    n_rows: usize,
    /// `bins[feature][row]`
    bins: Vec<Vec<u8>>,
    mappers: Vec<BinMapper>,
}

impl BinnedDataset {
    /// Bin every feature of `dataset` with at most `max_bins` bins.
    pub fn from_dataset(dataset: &Dataset, max_bins: usize) -> Self {
        let max_bins = max_bins.clamp(2, u8::MAX as usize + 1);
        let features = dataset.features();

        let mut bins = Vec::with_capacity(dataset.n_features());
        let mut mappers = Vec::with_capacity(dataset.n_features());
        for column in features.columns() {
            let mapper = BinMapper::fit(column, max_bins);
            bins.push(column.iter().map(|&v| mapper.value_to_bin(v) as u8).collect());
            mappers.push(mapper);
        }

        Self {
            n_rows: dataset.n_rows(),
            bins,
            mappers,
        }
    }

    #[inline]
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    #[inline]
    pub fn n_features(&self) -> usize {
        self.mappers.len()
    }

    /// Number of bins of a feature.
    #[inline]
    pub fn n_bins(&self, feature: usize) -> usize {
        self.mappers[feature].n_bins()
    }

    /// Bin indices of a feature, one per row.
    #[inline]
    pub fn feature_bins(&self, feature: usize) -> &[u8] {
        &self.bins[feature]
    }

    #[inline]
    pub fn mapper(&self, feature: usize) -> &BinMapper {
        &self.mappers[feature]
    }
}
