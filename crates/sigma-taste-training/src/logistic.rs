//! Weighted, L2-regularized logistic regression fitted by batch gradient descent.
//!
//! # Key Components
//!
//! - [`WeightedExample`] - A sparse feature map with a confidence weight
//! - [`LogisticRegressionParams`] - Learning rate, iteration count and L2 strength
//! - [`LogisticRegression`] - The trainer
//! - [`LogisticRegressionResult`] - Coefficients, intercept, accuracy and top predictors
//!
//! # Gradient
//!
//! For each iteration, every example contributes `err = (sigmoid(z) - 1) · w` to
//! the intercept gradient and `err · xⱼ + λ · coefⱼ` to each coefficient
//! gradient. Both gradients are divided by the total weight before the update.
//! The L2 term is accumulated once per example, so its effective strength scales
//! with the number of examples relative to their total weight.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::weights;

/// Minimum number of examples required before a fit is attempted.
pub const MIN_TRAINING_EXAMPLES: usize = 10;

/// Number of coefficients reported as top predictors.
pub const TOP_PREDICTOR_COUNT: usize = 15;

/// Bound applied to the sigmoid argument to keep `exp` finite.
const SIGMOID_CLAMP: f64 = 500.0;

/// A single training example: feature deltas plus a confidence weight.
pub trait WeightedExample {
    fn features(&self) -> &BTreeMap<String, f64>;
    fn weight(&self) -> f64;
}

impl<T> WeightedExample for &T
where
    T: WeightedExample + ?Sized,
{
    fn features(&self) -> &BTreeMap<String, f64> {
        (**self).features()
    }

    fn weight(&self) -> f64 {
        (**self).weight()
    }
}

/// Hyperparameters for [`LogisticRegression`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogisticRegressionParams {
    pub learning_rate: f64,
    pub iterations: usize,
    /// L2 regularization strength.
    pub lambda: f64,
}

impl Default for LogisticRegressionParams {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            iterations: 1000,
            lambda: 0.1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictorDirection {
    HigherWins,
    LowerWins,
}

/// A feature path ranked by the magnitude of its coefficient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Predictor {
    pub path: String,
    pub weight: f64,
    pub direction: PredictorDirection,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogisticRegressionResult {
    pub coefficients: BTreeMap<String, f64>,
    pub intercept: f64,
    /// Weighted fraction of examples predicted as wins (threshold 0.5).
    pub accuracy: f64,
    /// Ordered by descending |coefficient|; ties are ordered alphabetically by path.
    pub top_predictors: Vec<Predictor>,
}

impl LogisticRegressionResult {
    /// Whether a model was actually fitted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.coefficients.is_empty()
    }
}

/// Logistic function with its argument clamped to `±500`.
///
/// # Examples
///
/// ```
/// use sigma_taste_training::logistic::sigmoid;
///
/// assert_eq!(sigmoid(0.0), 0.5);
/// assert!(sigmoid(1e9).is_finite());
/// assert!(sigmoid(-1e9) >= 0.0);
/// ```
#[must_use]
pub fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z.clamp(-SIGMOID_CLAMP, SIGMOID_CLAMP)).exp())
}

/// Dense view of a set of examples over a shared path vocabulary.
///
/// Columns follow the alphabetical order of the paths.
#[derive(Debug, Clone)]
struct DesignMatrix {
    paths: Vec<String>,
    rows: Vec<Vec<f64>>,
    weights: Vec<f64>,
}

impl DesignMatrix {
    fn from_examples<E>(examples: &[E]) -> Self
    where
        E: WeightedExample,
    {
        let paths = examples
            .iter()
            .flat_map(|e| e.features().keys())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .cloned()
            .collect::<Vec<_>>();
        let rows = examples
            .iter()
            .map(|e| {
                let features = e.features();
                weights::from_fn(
                    |j| features.get(&paths[j]).copied().unwrap_or(0.0),
                    paths.len(),
                )
            })
            .collect();
        let weights = examples.iter().map(|e| e.weight()).collect();
        Self {
            paths,
            rows,
            weights,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LogisticRegression {
    params: LogisticRegressionParams,
}

impl LogisticRegression {
    #[must_use]
    pub fn new(params: LogisticRegressionParams) -> Self {
        Self { params }
    }

    #[must_use]
    pub fn params(&self) -> &LogisticRegressionParams {
        &self.params
    }

    /// Fits the model on `examples`.
    ///
    /// Returns an empty result (no coefficients, zero intercept and accuracy)
    /// when fewer than [`MIN_TRAINING_EXAMPLES`] examples are given or their
    /// total weight is not positive.
    #[must_use]
    pub fn fit<E>(&self, examples: &[E]) -> LogisticRegressionResult
    where
        E: WeightedExample,
    {
        if examples.len() < MIN_TRAINING_EXAMPLES {
            tracing::debug!(
                examples = examples.len(),
                "too few examples for logistic regression"
            );
            return LogisticRegressionResult::default();
        }

        let matrix = DesignMatrix::from_examples(examples);
        let total_weight = matrix.weights.iter().sum::<f64>();
        if total_weight <= 0.0 {
            return LogisticRegressionResult::default();
        }

        let LogisticRegressionParams {
            learning_rate,
            iterations,
            lambda,
        } = self.params;
        let num_features = matrix.paths.len();
        let mut coeffs = vec![0.0; num_features];
        let mut intercept = 0.0;

        for _ in 0..iterations {
            let mut grad_coeffs = vec![0.0; num_features];
            let mut grad_intercept = 0.0;
            for (x, w) in matrix.rows.iter().zip(&matrix.weights) {
                let pred = sigmoid(intercept + weights::dot(x, &coeffs));
                let error = (pred - 1.0) * w;
                grad_intercept += error;
                for ((g, xj), cj) in grad_coeffs.iter_mut().zip(x).zip(&coeffs) {
                    *g += error * xj + lambda * cj;
                }
            }
            intercept -= learning_rate * grad_intercept / total_weight;
            for (c, g) in coeffs.iter_mut().zip(&grad_coeffs) {
                *c -= learning_rate * g / total_weight;
            }
        }

        let correct = matrix
            .rows
            .iter()
            .zip(&matrix.weights)
            .filter(|(x, _)| sigmoid(intercept + weights::dot(x, &coeffs)) > 0.5)
            .map(|(_, w)| w)
            .sum::<f64>();
        let accuracy = correct / total_weight;

        let top_predictors = weights::indices_by_magnitude(&coeffs)
            .into_iter()
            .take(TOP_PREDICTOR_COUNT)
            .map(|j| Predictor {
                path: matrix.paths[j].clone(),
                weight: coeffs[j],
                direction: if coeffs[j] > 0.0 {
                    PredictorDirection::HigherWins
                } else {
                    PredictorDirection::LowerWins
                },
            })
            .collect();

        tracing::debug!(
            examples = examples.len(),
            features = num_features,
            iterations,
            accuracy,
            "fitted logistic regression"
        );

        LogisticRegressionResult {
            coefficients: matrix.paths.into_iter().zip(coeffs).collect(),
            intercept,
            accuracy,
            top_predictors,
        }
    }
}
