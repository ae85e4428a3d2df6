//! Regularized logistic regression over pairwise feature deltas.
//!
//! This crate fits an interpretable linear model that answers "which feature
//! differences push a video towards winning a comparison?". It is kept separate
//! from the analysis crate: the trainer only sees [`logistic::WeightedExample`]s,
//! so any row type carrying a sparse feature map and a confidence weight can be
//! trained on.
//!
//! # How Training Works
//!
//! 1. **Vocabulary** - Union of all feature paths across examples, in sorted order
//! 2. **Design matrix** - One dense row per example; a missing path counts as delta `0`
//! 3. **Gradient descent** - Full-batch, confidence-weighted, fixed iteration count
//! 4. **Regularization** - L2 penalty on coefficients (never on the intercept)
//! 5. **Ranking** - Coefficients sorted by magnitude become the top predictors
//!
//! # The Constant Target
//!
//! Every example describes a winner minus a loser, so the label is always `1`.
//! Training therefore pushes `sigmoid(intercept + Σ coef·delta)` towards `1`, and
//! coefficients grow in the direction of deltas that consistently accompany a
//! win. The L2 penalty keeps them interpretable on small datasets.
//!
//! # Example
//!
//! ```
//! use std::collections::BTreeMap;
//!
//! use sigma_taste_training::logistic::{LogisticRegression, LogisticRegressionParams, WeightedExample};
//!
//! struct Row(BTreeMap<String, f64>);
//!
//! impl WeightedExample for Row {
//!     fn features(&self) -> &BTreeMap<String, f64> {
//!         &self.0
//!     }
//!     fn weight(&self) -> f64 {
//!         1.0
//!     }
//! }
//!
//! let rows = (0..12)
//!     .map(|_| Row(BTreeMap::from([("hook".to_owned(), 0.3)])))
//!     .collect::<Vec<_>>();
//! let result = LogisticRegression::new(LogisticRegressionParams::default()).fit(&rows);
//! assert!(result.coefficients["hook"] > 0.0);
//! assert_eq!(result.accuracy, 1.0);
//! ```
//!
//! # Current Limitations
//!
//! - **No convergence check**: the iteration count is fixed, so the cost is
//!   `iterations × rows × features` regardless of how early the fit settles
//! - **No feature scaling**: deltas are assumed to already live on comparable
//!   normalized scales

pub mod logistic;
pub mod weights;
