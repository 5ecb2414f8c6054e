//! Synthetic transaction data for integration tests.

#![allow(dead_code)]

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use fraudboost::{ModelInput, FEATURE_COLUMNS, LABEL_COLUMN};
use rand::prelude::*;

pub const N_FEATURES: usize = FEATURE_COLUMNS.len();

// =============================================================================
// Transactions
// =============================================================================

/// A legitimate-looking transaction: small components, modest amount.
pub fn legit_transaction(rng: &mut StdRng, time: f32) -> ModelInput {
    let mut features = [0.0f32; N_FEATURES];
    features[0] = time;
    for v in &mut features[1..N_FEATURES - 1] {
        *v = rng.gen_range(-1.0..1.0);
    }
    features[N_FEATURES - 1] = rng.gen_range(1.0..120.0);
    ModelInput::new(features, false)
}

/// A fraud-looking transaction: extreme V14/V17, large amount.
pub fn fraud_transaction(rng: &mut StdRng, time: f32) -> ModelInput {
    let mut features = *legit_transaction(rng, time).features();
    features[14] = rng.gen_range(-12.0..-6.0);
    features[17] = rng.gen_range(-10.0..-5.0);
    features[N_FEATURES - 1] = rng.gen_range(500.0..2500.0);
    ModelInput::new(features, true)
}

/// `n` transactions, one in `fraud_every` fraudulent, deterministic in `seed`.
pub fn synthetic_transactions(n: usize, fraud_every: usize, seed: u64) -> Vec<ModelInput> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|i| {
            let time = i as f32 * 7.0;
            if i % fraud_every == 0 {
                fraud_transaction(&mut rng, time)
            } else {
                legit_transaction(&mut rng, time)
            }
        })
        .collect()
}

// =============================================================================
// CSV fixtures
// =============================================================================

/// Render transactions in the `creditcard.csv` layout.
pub fn to_csv(inputs: &[ModelInput]) -> String {
    let mut out = String::new();
    let header: Vec<String> = FEATURE_COLUMNS
        .iter()
        .map(|c| format!("\"{c}\""))
        .chain(std::iter::once(format!("\"{LABEL_COLUMN}\"")))
        .collect();
    out.push_str(&header.join(","));
    out.push('\n');
    for input in inputs {
        for v in input.features() {
            write!(out, "{v},").unwrap();
        }
        writeln!(out, "\"{}\"", u8::from(input.class)).unwrap();
    }
    out
}

/// Write transactions to `dir/name` and return the path.
pub fn write_csv(dir: &Path, name: &str, inputs: &[ModelInput]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, to_csv(inputs)).unwrap();
    path
}
