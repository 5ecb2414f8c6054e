//! Summary statistics over per-fold metric values.

/// Arithmetic mean; 0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n − 1 denominator).
///
/// Fewer than two values have no spread: returns 0.
pub fn standard_deviation(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let avg = mean(values);
    let sum_sq: f64 = values.iter().map(|v| (v - avg) * (v - avg)).sum();
    (sum_sq / (values.len() - 1) as f64).sqrt()
}

/// Half-width of the 95% confidence interval: `1.96 × stddev / sqrt(n − 1)`.
///
/// Returns 0 for fewer than two values.
pub fn confidence_interval_95(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    1.96 * standard_deviation(values) / ((values.len() - 1) as f64).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    #[test]
    fn one_to_five() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_abs_diff_eq!(mean(&values), 3.0);
        assert_abs_diff_eq!(standard_deviation(&values), 1.5811, epsilon = 1e-4);
        assert_abs_diff_eq!(confidence_interval_95(&values), 1.5495, epsilon = 1e-4);
    }

    #[test]
    fn constant_values_have_no_spread() {
        assert_eq!(standard_deviation(&[2.0, 2.0, 2.0]), 0.0);
        assert_eq!(confidence_interval_95(&[2.0, 2.0, 2.0]), 0.0);
    }

    #[test]
    fn degenerate_lengths() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(standard_deviation(&[0.7]), 0.0);
        assert_eq!(confidence_interval_95(&[0.7]), 0.0);
    }

    proptest! {
        #[test]
        fn shift_invariant(values in prop::collection::vec(-1e3f64..1e3, 2..20), shift in -1e3f64..1e3) {
            let shifted: Vec<f64> = values.iter().map(|v| v + shift).collect();
            prop_assert!((standard_deviation(&values) - standard_deviation(&shifted)).abs() < 1e-6);
            prop_assert!(confidence_interval_95(&values) >= 0.0);
        }
    }
}
