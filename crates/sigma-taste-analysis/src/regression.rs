//! Multivariate weighting of feature deltas.
//!
//! Thin adapter over [`sigma_taste_training::logistic`]: rows are filtered by
//! dimension and fed to the trainer, which treats every row as a positive
//! example weighted by judge confidence.

use sigma_taste_training::logistic::{
    LogisticRegression, LogisticRegressionParams, LogisticRegressionResult,
};

use crate::{comparison::DimensionFilter, dataset};

/// Fits a regularized logistic regression on the rows selected by `filter`.
///
/// Returns an empty result when fewer than
/// [`MIN_TRAINING_EXAMPLES`](sigma_taste_training::logistic::MIN_TRAINING_EXAMPLES)
/// rows remain.
#[must_use]
pub fn train_logistic_regression(
    rows: &[dataset::TrainingRow],
    filter: &DimensionFilter,
    params: LogisticRegressionParams,
) -> LogisticRegressionResult {
    let selected = dataset::filter_rows(rows, filter);
    tracing::debug!(rows = selected.len(), %filter, "training logistic regression");
    LogisticRegression::new(params).fit(&selected)
}
