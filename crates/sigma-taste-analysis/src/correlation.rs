//! Per-variable association between feature deltas and winning.
//!
//! Every row records a winner, so a classical correlation with the outcome
//! is undefined. Instead each variable is summarized by the
//! confidence-weighted distribution of its deltas: a consistently positive
//! mean delta means higher values tend to win.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sigma_taste_stats::{descriptive::WeightedStats, significance};

use crate::{comparison::DimensionFilter, dataset::TrainingRow};

/// Variables observed in fewer rows are reported as [`ConfidenceTier::Insufficient`].
pub const MIN_CORRELATION_SAMPLES: usize = 5;

/// Minimum |mean delta| for a direction to be reported.
pub const DIRECTION_MEAN_THRESHOLD: f64 = 0.02;

/// Maximum p-value for a direction to be reported.
pub const DIRECTION_P_VALUE_THRESHOLD: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    HigherWins,
    LowerWins,
    Neutral,
}

impl Direction {
    #[must_use]
    pub fn from_mean(mean: f64, p_value: f64) -> Self {
        if mean.abs() <= DIRECTION_MEAN_THRESHOLD || p_value >= DIRECTION_P_VALUE_THRESHOLD {
            Self::Neutral
        } else if mean > 0.0 {
            Self::HigherWins
        } else {
            Self::LowerWins
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceTier {
    High,
    Medium,
    Low,
    Insufficient,
}

impl ConfidenceTier {
    /// Tier from sample count and p-value.
    ///
    /// # Examples
    ///
    /// ```
    /// use sigma_taste_analysis::correlation::ConfidenceTier;
    ///
    /// assert_eq!(ConfidenceTier::from_sample(30, 0.01), ConfidenceTier::High);
    /// assert_eq!(ConfidenceTier::from_sample(30, 0.08), ConfidenceTier::Medium);
    /// assert_eq!(ConfidenceTier::from_sample(12, 0.01), ConfidenceTier::Low);
    /// assert_eq!(ConfidenceTier::from_sample(4, 0.0), ConfidenceTier::Insufficient);
    /// ```
    #[must_use]
    pub fn from_sample(sample_count: usize, p_value: f64) -> Self {
        match sample_count {
            n if n >= 30 && p_value < 0.05 => Self::High,
            n if n >= 15 && p_value < 0.1 => Self::Medium,
            n if n >= MIN_CORRELATION_SAMPLES => Self::Low,
            _ => Self::Insufficient,
        }
    }
}

/// Association statistics for one feature path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableCorrelation {
    pub path: String,
    /// Pseudo-correlation in `[-1, 1]`.
    pub correlation: f64,
    pub p_value: f64,
    pub direction: Direction,
    pub sample_count: usize,
    /// Confidence-weighted mean of `winner - loser`.
    pub mean_delta: f64,
    pub std_delta: f64,
    pub effect_size: f64,
    pub confidence: ConfidenceTier,
}

impl VariableCorrelation {
    fn insufficient(path: String, sample_count: usize) -> Self {
        Self {
            path,
            correlation: 0.0,
            p_value: 1.0,
            direction: Direction::Neutral,
            sample_count,
            mean_delta: 0.0,
            std_delta: 0.0,
            effect_size: 0.0,
            confidence: ConfidenceTier::Insufficient,
        }
    }

    fn from_samples(path: String, samples: &[(f64, f64)]) -> Self {
        let n = samples.len();
        if n < MIN_CORRELATION_SAMPLES {
            return Self::insufficient(path, n);
        }
        let (mean, std) = WeightedStats::from_slice(samples).map_or((0.0, 0.0), |s| (s.mean, s.std_dev));
        let correlation = significance::pseudo_correlation(mean, std);
        let p_value = significance::approximate_p_value(correlation, n);
        Self {
            path,
            correlation,
            p_value,
            direction: Direction::from_mean(mean, p_value),
            sample_count: n,
            mean_delta: mean,
            std_delta: std,
            effect_size: significance::effect_size(mean, std),
            confidence: ConfidenceTier::from_sample(n, p_value),
        }
    }
}

/// Computes per-variable statistics over the rows selected by `filter`.
///
/// Results are sorted by descending |effect size|; ties are ordered
/// alphabetically by path.
#[must_use]
pub fn analyze_correlations(rows: &[TrainingRow], filter: &DimensionFilter) -> Vec<VariableCorrelation> {
    let mut samples: BTreeMap<&str, Vec<(f64, f64)>> = BTreeMap::new();
    for row in rows.iter().filter(|r| filter.matches(&r.dimension)) {
        for (path, delta) in &row.deltas {
            samples
                .entry(path.as_str())
                .or_default()
                .push((*delta, row.confidence_weight));
        }
    }

    let mut results = samples
        .into_iter()
        .map(|(path, samples)| VariableCorrelation::from_samples(path.to_owned(), &samples))
        .collect::<Vec<_>>();
    results.sort_by(|a, b| b.effect_size.abs().total_cmp(&a.effect_size.abs()));
    tracing::debug!(variables = results.len(), "computed correlations");
    results
}
