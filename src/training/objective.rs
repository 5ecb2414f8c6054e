//! Logistic loss for binary classification.
//!
//! Expects labels in {0, 1}; the model outputs log-odds.
//! - Loss: `-y*log(σ(pred)) - (1-y)*log(1-σ(pred))`
//! - Gradient: `σ(pred) - y`
//! - Hessian: `σ(pred) * (1 - σ(pred))`

use crate::utils::sigmoid;

/// Gradient/hessian pair of one sample.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GradsTuple {
    pub grad: f32,
    pub hess: f32,
}

/// Logistic loss (binary cross-entropy).
#[derive(Debug, Clone, Copy, Default)]
pub struct LogisticLoss;

impl LogisticLoss {
    const HESS_MIN: f32 = 1e-6;

    /// Fill `grad_hess` for the current margins.
    pub fn compute_gradients(&self, predictions: &[f32], targets: &[f32], grad_hess: &mut [GradsTuple]) {
        debug_assert_eq!(predictions.len(), targets.len());
        debug_assert_eq!(predictions.len(), grad_hess.len());

        for ((gh, &pred), &y) in grad_hess.iter_mut().zip(predictions).zip(targets) {
            let p = sigmoid(pred);
            gh.grad = p - y;
            gh.hess = (p * (1.0 - p)).max(Self::HESS_MIN);
        }
    }

    /// Optimal constant margin: log-odds of the positive rate.
    pub fn compute_base_score(&self, targets: &[f32]) -> f32 {
        if targets.is_empty() {
            return 0.0;
        }
        let positives: f64 = targets.iter().map(|&t| t as f64).sum();
        let p = (positives / targets.len() as f64).clamp(1e-7, 1.0 - 1e-7);
        (p / (1.0 - p)).ln() as f32
    }

    /// Mean log loss of margins against labels.
    pub fn loss(&self, predictions: &[f32], targets: &[f32]) -> f64 {
        if predictions.is_empty() {
            return 0.0;
        }
        const EPS: f64 = 1e-15;
        let total: f64 = predictions
            .iter()
            .zip(targets)
            .map(|(&m, &y)| {
                let p = (sigmoid(m) as f64).clamp(EPS, 1.0 - EPS);
                let y = y as f64;
                -(y * p.ln() + (1.0 - y) * (1.0 - p).ln())
            })
            .sum();
        total / predictions.len() as f64
    }
}
