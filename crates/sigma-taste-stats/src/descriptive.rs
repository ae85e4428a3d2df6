/// Weighted descriptive statistics summarizing a sample.
///
/// Every observation is a `(value, weight)` pair. The variance is the weighted
/// population variance `Σ wᵢ(xᵢ - μ)² / Σ wᵢ`, which is what the correlation
/// engine expects when it standardizes mean deltas.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedStats {
    /// Number of observations.
    pub count: usize,
    /// Sum of all weights.
    pub total_weight: f64,
    /// Weighted arithmetic mean.
    pub mean: f64,
    /// Weighted population variance.
    pub variance: f64,
    /// Square root of [`Self::variance`].
    pub std_dev: f64,
}

impl WeightedStats {
    /// Computes weighted statistics from `(value, weight)` pairs.
    ///
    /// # Returns
    ///
    /// * `Some(WeightedStats)` - if the sample is non-empty and the total weight is positive
    /// * `None` - otherwise
    ///
    /// # Examples
    ///
    /// ```
    /// # use sigma_taste_stats::descriptive::WeightedStats;
    /// // The heavier observation pulls the mean towards itself.
    /// let stats = WeightedStats::new([(0.0, 1.0), (1.0, 3.0)]).unwrap();
    /// assert_eq!(stats.count, 2);
    /// assert_eq!(stats.mean, 0.75);
    ///
    /// assert!(WeightedStats::new(Vec::<(f64, f64)>::new()).is_none());
    /// ```
    #[must_use]
    pub fn new<I>(samples: I) -> Option<Self>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let samples = samples.into_iter().collect::<Vec<_>>();
        Self::from_slice(&samples)
    }

    /// Computes weighted statistics from a slice of `(value, weight)` pairs.
    #[must_use]
    pub fn from_slice(samples: &[(f64, f64)]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }
        let total_weight = samples.iter().map(|(_, w)| w).sum::<f64>();
        if total_weight <= 0.0 {
            return None;
        }
        let mean = samples.iter().map(|(x, w)| x * w).sum::<f64>() / total_weight;
        let variance = samples
            .iter()
            .map(|(x, w)| w * (x - mean).powi(2))
            .sum::<f64>()
            / total_weight;
        Some(Self {
            count: samples.len(),
            total_weight,
            mean,
            variance,
            std_dev: variance.sqrt(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_sample() {
        assert!(WeightedStats::from_slice(&[]).is_none());
    }

    #[test]
    fn test_zero_total_weight() {
        assert!(WeightedStats::new([(1.0, 0.0), (2.0, 0.0)]).is_none());
    }

    #[test]
    fn test_uniform_weights_match_unweighted() {
        let stats = WeightedStats::new([(2.0, 0.7), (4.0, 0.7), (6.0, 0.7)]).unwrap();
        assert!((stats.mean - 4.0).abs() < 1e-12);
        // population variance of [2, 4, 6]
        assert!((stats.variance - 8.0 / 3.0).abs() < 1e-12);
        assert!((stats.total_weight - 2.1).abs() < 1e-12);
    }

    #[test]
    fn test_constant_values_have_zero_spread() {
        let stats = WeightedStats::new([(0.4, 1.0), (0.4, 0.4), (0.4, 0.7)]).unwrap();
        assert!((stats.mean - 0.4).abs() < 1e-12);
        assert!(stats.std_dev.abs() < 1e-12);
    }
}
