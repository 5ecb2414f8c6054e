//! Load the saved fraud classifier and print actual vs predicted labels for a
//! seeded 10% test split of the data, then wait for a keypress.
//!
//! Usage: `cargo run --release --bin predict`

use std::io;

use anyhow::{Context, Result};

use fraudboost::logging;
use fraudboost::pipeline::{self, PipelineConfig};

const DATA_CSV: &str = "../../Data/creditcard.csv";
const MODEL_ZIP: &str = "../../Data/CreditCardFraudDetection.zip";

fn main() -> Result<()> {
    logging::init();

    let config = PipelineConfig::builder().build()?;
    let model_path = pipeline::resolve_relative_to_executable(MODEL_ZIP)?;
    let csv_path = pipeline::resolve_relative_to_executable(DATA_CSV)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    pipeline::run_predictor(&model_path, &csv_path, &config, &mut out).with_context(|| {
        format!(
            "failed to score {} with model {}",
            csv_path.display(),
            model_path.display()
        )
    })?;

    pipeline::wait_for_keypress(io::stdin().lock())?;
    Ok(())
}
