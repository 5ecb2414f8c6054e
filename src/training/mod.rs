//! Gradient-boosted decision tree training.
//!
//! - [`GbdtConfig`]: Hyperparameters, built and validated with a builder
//! - [`GbdtTrainer`]: The boosting loop, producing a [`Forest`](crate::repr::Forest)
//! - [`LogisticLoss`]: Binary cross-entropy objective
//! - [`GainParams`]: Split gain and leaf weight computation
//!
//! Trees are grown on histograms of quantile-binned features, either
//! depth-wise or leaf-wise (see [`GrowthStrategy`]).

mod config;
mod gain;
mod grower;
mod histogram;
mod objective;
mod partition;
mod split;
mod trainer;

pub use config::{ConfigError, GbdtConfig, GrowthStrategy, RegularizationParams, TreeParams};
pub use gain::GainParams;
pub use grower::{GrowerParams, TreeGrower};
pub use objective::{GradsTuple, LogisticLoss};
pub use trainer::GbdtTrainer;
