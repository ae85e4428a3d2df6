//! Significance estimates for constant-target preference data.
//!
//! Every training row records a winner, so the outcome variable is constant and
//! an ordinary Pearson correlation is undefined. The engine instead uses the
//! standardized mean delta squashed through `tanh` as a bounded proxy, and a
//! closed-form surrogate for the two-tailed t-test p-value.

/// Added to the standard deviation before standardizing the mean.
pub const CORRELATION_EPSILON: f64 = 0.001;

/// Added to `1 - r²` so a perfect pseudo-correlation does not divide by zero.
pub const T_DENOMINATOR_EPSILON: f64 = 0.0001;

/// Bounded pseudo-correlation `tanh(mean / (std + ε))`.
///
/// # Examples
///
/// ```
/// use sigma_taste_stats::significance::pseudo_correlation;
///
/// assert_eq!(pseudo_correlation(0.0, 0.3), 0.0);
/// assert!(pseudo_correlation(0.5, 0.0) > 0.99);
/// assert!(pseudo_correlation(-0.5, 0.0) < -0.99);
/// ```
#[must_use]
pub fn pseudo_correlation(mean: f64, std_dev: f64) -> f64 {
    (mean / (std_dev + CORRELATION_EPSILON)).tanh()
}

/// t-statistic for a correlation estimate `r` over `n` samples.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn t_statistic(r: f64, n: usize) -> f64 {
    let dof = n.saturating_sub(2) as f64;
    r * (dof / (1.0 - r * r + T_DENOMINATOR_EPSILON)).sqrt()
}

/// Approximate two-tailed p-value `min(2·exp(-0.717|t| - 0.416t²), 1)`.
///
/// Returns `1.0` when `n <= 2` since no degrees of freedom remain.
///
/// # Examples
///
/// ```
/// use sigma_taste_stats::significance::approximate_p_value;
///
/// assert_eq!(approximate_p_value(0.9, 2), 1.0);
/// assert_eq!(approximate_p_value(0.0, 50), 1.0);
/// assert!(approximate_p_value(0.8, 50) < 0.001);
/// ```
#[must_use]
pub fn approximate_p_value(r: f64, n: usize) -> f64 {
    if n <= 2 {
        return 1.0;
    }
    let abs_t = t_statistic(r, n).abs();
    let p = (-0.717 * abs_t - 0.416 * abs_t * abs_t).exp();
    f64::min(p * 2.0, 1.0)
}

/// Cohen's-d-like effect size `|mean| / std`, defined as `0` for zero spread.
#[must_use]
pub fn effect_size(mean: f64, std_dev: f64) -> f64 {
    if std_dev > 0.0 {
        mean.abs() / std_dev
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pseudo_correlation_is_bounded() {
        for (mean, std) in [(10.0, 0.0), (-10.0, 0.0), (0.3, 0.01), (-0.01, 5.0)] {
            let r = pseudo_correlation(mean, std);
            assert!((-1.0..=1.0).contains(&r));
        }
    }

    #[test]
    fn test_t_statistic_sign_follows_correlation() {
        assert!(t_statistic(0.4, 20) > 0.0);
        assert!(t_statistic(-0.4, 20) < 0.0);
    }

    #[test]
    fn test_p_value_decreases_with_sample_size() {
        let small = approximate_p_value(0.3, 10);
        let large = approximate_p_value(0.3, 100);
        assert!(large < small);
    }

    #[test]
    fn test_p_value_for_perfect_correlation_stays_finite() {
        let p = approximate_p_value(1.0, 30);
        assert!(p.is_finite());
        assert!(p < 1e-6);
    }

    #[test]
    fn test_effect_size_zero_spread() {
        assert_eq!(effect_size(0.4, 0.0), 0.0);
        assert!((effect_size(-0.2, 0.4) - 0.5).abs() < 1e-12);
    }
}
