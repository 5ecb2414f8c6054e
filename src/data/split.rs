//! Deterministic row splits.
//!
//! Both splits shuffle row indices with a seeded [`StdRng`], so the same seed
//! always yields the same partition of the same row count.

use rand::prelude::*;

use crate::training::ConfigError;

/// Deterministic train/test split indices.
///
/// The test partition holds `round(rows * test_fraction)` rows.
/// Returns `(train_idx, test_idx)`.
///
/// # Errors
///
/// [`ConfigError::InvalidTestFraction`] unless `0 < test_fraction < 1`.
pub fn train_test_split(
    rows: usize,
    test_fraction: f32,
    seed: u64,
) -> Result<(Vec<usize>, Vec<usize>), ConfigError> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(ConfigError::InvalidTestFraction(test_fraction));
    }
    let mut idx: Vec<usize> = (0..rows).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    idx.shuffle(&mut rng);

    let test_len = ((rows as f32) * test_fraction).round() as usize;
    let test_len = test_len.min(rows);
    let (test, train) = idx.split_at(test_len);
    Ok((train.to_vec(), test.to_vec()))
}

/// Assign every row to one of `k` folds.
///
/// Rows are shuffled, then dealt round-robin, so fold sizes differ by at most
/// one. Returns `fold[row]`.
///
/// # Errors
///
/// [`ConfigError::InvalidFolds`] unless `2 <= k <= rows`.
pub fn kfold_assignments(rows: usize, k: usize, seed: u64) -> Result<Vec<usize>, ConfigError> {
    if k < 2 || k > rows {
        return Err(ConfigError::InvalidFolds { n_folds: k, n_rows: rows });
    }
    let mut idx: Vec<usize> = (0..rows).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    idx.shuffle(&mut rng);

    let mut folds = vec![0usize; rows];
    for (position, &row) in idx.iter().enumerate() {
        folds[row] = position % k;
    }
    Ok(folds)
}
