//! Split gain and leaf weight computation.

use super::config::RegularizationParams;

/// Regularization constants used while scoring splits and leaves.
///
/// Static for the lifetime of a training run.
#[derive(Clone, Debug)]
pub struct GainParams {
    /// L2 regularization (lambda).
    pub reg_lambda: f64,
    /// L1 regularization (alpha).
    pub reg_alpha: f64,
    /// Minimum split gain (gamma).
    pub min_gain: f64,
    /// Minimum sum of hessians per child.
    pub min_child_weight: f64,
    /// Minimum samples per child.
    pub min_samples_leaf: u32,
}

impl From<&RegularizationParams> for GainParams {
    fn from(reg: &RegularizationParams) -> Self {
        Self {
            reg_lambda: reg.lambda as f64,
            reg_alpha: reg.alpha as f64,
            min_gain: reg.min_gain as f64,
            min_child_weight: reg.min_child_weight as f64,
            min_samples_leaf: reg.min_samples_leaf,
        }
    }
}

impl Default for GainParams {
    fn default() -> Self {
        Self::from(&RegularizationParams::default())
    }
}

impl GainParams {
    /// Structure score of a node, `T(G) / (H + λ)` with `T` the L1 soft threshold.
    #[inline]
    fn score(&self, grad: f64, hess: f64) -> f64 {
        let g = soft_threshold(grad, self.reg_alpha);
        g * g / (hess + self.reg_lambda)
    }

    /// Split gain using the XGBoost formula.
    ///
    /// ```text
    /// gain = 0.5 * [G_L²/(H_L + λ) + G_R²/(H_R + λ) - G_P²/(H_P + λ)] - γ
    /// ```
    #[inline]
    pub fn compute_gain(
        &self,
        grad_left: f64,
        hess_left: f64,
        grad_right: f64,
        hess_right: f64,
        grad_parent: f64,
        hess_parent: f64,
    ) -> f64 {
        0.5 * (self.score(grad_left, hess_left) + self.score(grad_right, hess_right)
            - self.score(grad_parent, hess_parent))
            - self.min_gain
    }

    /// Check if a split satisfies the child constraints.
    #[inline]
    pub fn is_valid_split(&self, hess_left: f64, hess_right: f64, count_left: u32, count_right: u32) -> bool {
        hess_left >= self.min_child_weight
            && hess_right >= self.min_child_weight
            && count_left >= self.min_samples_leaf
            && count_right >= self.min_samples_leaf
    }

    /// Leaf weight with L1 and L2 regularization.
    ///
    /// ```text
    /// weight = -sign(G) × max(0, |G| - α) / (H + λ)
    /// ```
    #[inline]
    pub fn compute_leaf_weight(&self, grad_sum: f64, hess_sum: f64) -> f32 {
        let denom = hess_sum + self.reg_lambda;
        if denom <= 0.0 {
            return 0.0;
        }
        (-soft_threshold(grad_sum, self.reg_alpha) / denom) as f32
    }
}

#[inline]
fn soft_threshold(g: f64, alpha: f64) -> f64 {
    if alpha == 0.0 {
        g
    } else if g > alpha {
        g - alpha
    } else if g < -alpha {
        g + alpha
    } else {
        0.0
    }
}
