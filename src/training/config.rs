//! GBDT configuration with builder pattern.
//!
//! [`GbdtConfig`] groups the boosting hyperparameters. The builder is generated
//! by `bon`; `build()` validates the result.
//!
//! # Example
//!
//! ```
//! use fraudboost::training::{GbdtConfig, TreeParams};
//!
//! // All defaults (100 leaf-wise trees with 31 leaves)
//! let config = GbdtConfig::builder().build().unwrap();
//!
//! let config = GbdtConfig::builder()
//!     .n_trees(200)
//!     .learning_rate(0.05)
//!     .tree(TreeParams::depth_wise(6))
//!     .build()
//!     .unwrap();
//! ```

use bon::Builder;
use serde::{Deserialize, Serialize};

// =============================================================================
// ConfigError
// =============================================================================

/// Errors that can occur during configuration validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("learning_rate must be positive, got {0}")]
    InvalidLearningRate(f32),

    #[error("n_trees must be at least 1")]
    InvalidNTrees,

    #[error("{field} must be at least {min}, got {value}")]
    InvalidTreeSize {
        field: &'static str,
        min: u32,
        value: u32,
    },

    #[error("{field} must be non-negative, got {value}")]
    InvalidRegularization { field: &'static str, value: f32 },

    #[error("min_samples_leaf must be at least 1")]
    InvalidMinSamplesLeaf,

    #[error("max_bins must be in [2, 256], got {0}")]
    InvalidMaxBins(usize),

    #[error("n_folds must be in [2, {n_rows}], got {n_folds}")]
    InvalidFolds { n_folds: usize, n_rows: usize },

    #[error("n_folds must be at least 2, got {0}")]
    TooFewFolds(usize),

    #[error("test_fraction must be in (0, 1), got {0}")]
    InvalidTestFraction(f32),
}

// =============================================================================
// Tree parameters
// =============================================================================

/// How a tree is grown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GrowthStrategy {
    /// Split every expandable node until `max_depth` (XGBoost style).
    DepthWise { max_depth: u32 },
    /// Always split the leaf with the highest gain until `max_leaves` (LightGBM style).
    LeafWise { max_leaves: u32 },
}

impl Default for GrowthStrategy {
    fn default() -> Self {
        Self::LeafWise { max_leaves: 31 }
    }
}

/// Tree structure parameters.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TreeParams {
    pub growth_strategy: GrowthStrategy,
}

impl TreeParams {
    /// Depth-limited trees.
    pub fn depth_wise(max_depth: u32) -> Self {
        Self {
            growth_strategy: GrowthStrategy::DepthWise { max_depth },
        }
    }

    /// Leaf-limited trees.
    pub fn leaf_wise(max_leaves: u32) -> Self {
        Self {
            growth_strategy: GrowthStrategy::LeafWise { max_leaves },
        }
    }

    /// Upper bound on the number of leaves of one tree.
    pub fn max_leaves(&self) -> u32 {
        match self.growth_strategy {
            GrowthStrategy::DepthWise { max_depth } => 1u32 << max_depth.min(16),
            GrowthStrategy::LeafWise { max_leaves } => max_leaves,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        match self.growth_strategy {
            GrowthStrategy::DepthWise { max_depth } if max_depth < 1 => Err(ConfigError::InvalidTreeSize {
                field: "max_depth",
                min: 1,
                value: max_depth,
            }),
            GrowthStrategy::LeafWise { max_leaves } if max_leaves < 2 => Err(ConfigError::InvalidTreeSize {
                field: "max_leaves",
                min: 2,
                value: max_leaves,
            }),
            _ => Ok(()),
        }
    }
}

// =============================================================================
// RegularizationParams
// =============================================================================

/// L1/L2 regularization and split constraints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegularizationParams {
    /// L2 regularization term on leaf weights. Default: 0.0.
    pub lambda: f32,
    /// L1 regularization term on leaf weights. Default: 0.0.
    pub alpha: f32,
    /// Minimum sum of hessians required in a child. Default: 1e-3.
    pub min_child_weight: f32,
    /// Minimum gain required to make a split. Default: 0.0.
    pub min_gain: f32,
    /// Minimum number of samples required in a leaf. Default: 20.
    pub min_samples_leaf: u32,
}

impl Default for RegularizationParams {
    fn default() -> Self {
        Self {
            lambda: 0.0,
            alpha: 0.0,
            min_child_weight: 1e-3,
            min_gain: 0.0,
            min_samples_leaf: 20,
        }
    }
}

impl RegularizationParams {
    fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("lambda", self.lambda),
            ("alpha", self.alpha),
            ("min_child_weight", self.min_child_weight),
            ("min_gain", self.min_gain),
        ] {
            if !(value >= 0.0) {
                return Err(ConfigError::InvalidRegularization { field, value });
            }
        }
        if self.min_samples_leaf == 0 {
            return Err(ConfigError::InvalidMinSamplesLeaf);
        }
        Ok(())
    }
}

// =============================================================================
// GbdtConfig
// =============================================================================

/// Configuration for gradient-boosted tree training.
#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
#[builder(derive(Clone, Debug), finish_fn(vis = "", name = __build_internal))]
pub struct GbdtConfig {
    /// Number of boosting rounds. Default: 100.
    #[builder(default = 100)]
    pub n_trees: u32,

    /// Learning rate (shrinkage). Default: 0.1.
    #[builder(default = 0.1)]
    pub learning_rate: f32,

    /// Tree structure. Default: leaf-wise, 31 leaves.
    #[builder(default)]
    pub tree: TreeParams,

    #[builder(default)]
    pub regularization: RegularizationParams,

    /// Maximum number of histogram bins per feature. Default: 255.
    #[builder(default = 255)]
    pub max_bins: usize,

    /// Number of threads: 0 = auto, 1 = sequential. Default: 1.
    #[builder(default = 1)]
    pub n_threads: usize,
}

impl<S: gbdt_config_builder::IsComplete> GbdtConfigBuilder<S> {
    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if any parameter is out of range.
    pub fn build(self) -> Result<GbdtConfig, ConfigError> {
        let config = self.__build_internal();
        config.validate()?;
        Ok(config)
    }
}

impl Default for GbdtConfig {
    fn default() -> Self {
        Self::builder().__build_internal()
    }
}

impl GbdtConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.learning_rate > 0.0) || !self.learning_rate.is_finite() {
            return Err(ConfigError::InvalidLearningRate(self.learning_rate));
        }
        if self.n_trees == 0 {
            return Err(ConfigError::InvalidNTrees);
        }
        if !(2..=256).contains(&self.max_bins) {
            return Err(ConfigError::InvalidMaxBins(self.max_bins));
        }
        self.tree.validate()?;
        self.regularization.validate()
    }
}
