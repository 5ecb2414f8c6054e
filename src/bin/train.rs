//! Train the fraud classifier, print cross-validation metrics and save the
//! model archive next to the data.
//!
//! Usage: `cargo run --release --bin train`

use anyhow::{Context, Result};
use tracing::info;

use fraudboost::logging;
use fraudboost::pipeline::{self, PipelineConfig};

const DATA_CSV: &str = "../../Data/creditcard.csv";
const MODEL_ZIP: &str = "../../Data/CreditCardFraudDetection.zip";

/// Number of top features logged after training.
const TOP_FEATURES: usize = 5;

fn main() -> Result<()> {
    logging::init();

    let config = PipelineConfig::builder().build()?;
    let csv_path = pipeline::resolve_relative_to_executable(DATA_CSV)?;

    println!("=============== Cross-validating to get model's accuracy metrics ===============");
    let outcome = pipeline::build_model(&csv_path, &config)
        .with_context(|| format!("failed to build model from {}", csv_path.display()))?;
    outcome.cross_validation.print();

    for (column, share) in outcome.model.feature_importance().iter().take(TOP_FEATURES) {
        info!(column = column.as_str(), share = *share, "feature importance");
    }

    let model_path = pipeline::resolve_relative_to_executable(MODEL_ZIP)?;
    println!("=============== Saving the model  ===============");
    outcome
        .model
        .save(&model_path)
        .with_context(|| format!("failed to save model to {}", model_path.display()))?;
    println!("The model is saved to {}", model_path.display());

    Ok(())
}
