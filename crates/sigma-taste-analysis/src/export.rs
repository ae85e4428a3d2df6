//! Condensed report for the downstream fingerprint system.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sigma_taste_training::logistic::PredictorDirection;

use crate::{
    correlation::{ConfidenceTier, Direction, VariableCorrelation},
    report::{SampleSize, SigmaTasteAnalysis},
};

/// Number of reasoning themes carried into the export.
pub const EXPORTED_THEME_COUNT: usize = 20;

const REVIEW_MIN_SAMPLES: usize = 20;
const REVIEW_MAX_EFFECT_SIZE: f64 = 0.05;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FingerprintExport {
    pub version: String,
    pub analyzed_at: DateTime<Utc>,
    pub sample_size: SampleSize,
    /// Logistic regression top predictors keyed by path.
    pub variable_weights: BTreeMap<String, VariableWeight>,
    pub adjustments: Adjustments,
    pub proposed_new_variables: Vec<ProposedVariable>,
    pub common_themes: Vec<CommonTheme>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VariableWeight {
    pub weight: f64,
    pub direction: PredictorDirection,
}

/// Paths whose weight in the fingerprint should change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Adjustments {
    pub increase_weight: Vec<String>,
    pub decrease_weight: Vec<String>,
    pub remove_or_review: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposedVariable {
    pub name: String,
    pub path: String,
    pub description: String,
    pub evidence: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommonTheme {
    pub term: String,
    pub frequency: usize,
}

fn paths_where<F>(analysis: &SigmaTasteAnalysis, keep: F) -> Vec<String>
where
    F: Fn(&VariableCorrelation) -> bool,
{
    analysis
        .variable_importance
        .iter()
        .filter(|c| keep(c))
        .map(|c| c.path.clone())
        .collect()
}

/// Condenses a full report into the fingerprint export.
#[must_use]
pub fn export_for_fingerprint(analysis: &SigmaTasteAnalysis) -> FingerprintExport {
    let variable_weights = analysis
        .logistic_regression
        .top_predictors
        .iter()
        .map(|p| {
            let weight = VariableWeight {
                weight: p.weight,
                direction: p.direction,
            };
            (p.path.clone(), weight)
        })
        .collect();

    let adjustments = Adjustments {
        increase_weight: paths_where(analysis, |c| {
            c.direction == Direction::HigherWins && c.confidence == ConfidenceTier::High
        }),
        decrease_weight: paths_where(analysis, |c| {
            c.direction == Direction::LowerWins && c.confidence == ConfidenceTier::High
        }),
        remove_or_review: paths_where(analysis, |c| {
            c.sample_count >= REVIEW_MIN_SAMPLES && c.effect_size.abs() < REVIEW_MAX_EFFECT_SIZE
        }),
    };

    let proposed_new_variables = analysis
        .hidden_variable_candidates
        .iter()
        .map(|h| ProposedVariable {
            name: h.name.clone(),
            path: h.suggested_path.clone(),
            description: h.description.clone(),
            evidence: h.evidence.clone(),
        })
        .collect();

    let common_themes = analysis
        .reasoning_themes
        .iter()
        .take(EXPORTED_THEME_COUNT)
        .map(|t| CommonTheme {
            term: t.term.clone(),
            frequency: t.frequency,
        })
        .collect();

    FingerprintExport {
        version: analysis.version.clone(),
        analyzed_at: analysis.analyzed_at,
        sample_size: analysis.sample_size.clone(),
        variable_weights,
        adjustments,
        proposed_new_variables,
        common_themes,
        recommendations: analysis.recommendations.clone(),
    }
}
