//! The full analysis pipeline and its report.
//!
//! [`run_full_analysis`] chains every stage:
//!
//! ```text
//! comparisons + videos
//!   -> training rows            (dataset)
//!   -> variable correlations    (correlation)
//!   -> logistic regression      (regression)
//!   -> reasoning themes         (reasoning)
//!   -> hidden variables         (hidden_variable)
//!   -> recommendations
//! ```
//!
//! Apart from `analyzed_at`, the report is a pure function of its inputs.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sigma_taste_training::logistic::{LogisticRegressionParams, LogisticRegressionResult};

use crate::{
    comparison::{Comparison, DimensionFilter},
    correlation::{self, ConfidenceTier, Direction, VariableCorrelation},
    dataset,
    hidden_variable::{self, HiddenVariableCandidate},
    reasoning::{self, ReasoningTheme},
    regression,
    video::Video,
};

pub const REPORT_VERSION: &str = "1.0.0";

/// Below this many training rows a sample-size warning is emitted.
pub const TARGET_SAMPLE_WARNING: usize = 100;

const TOP_DIRECTIONAL_VARIABLES: usize = 3;
const MAX_USELESS_VARIABLES: usize = 5;
const USELESS_MIN_SAMPLES: usize = 10;
const USELESS_MAX_EFFECT_SIZE: f64 = 0.1;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisOptions {
    pub dimension: DimensionFilter,
    pub regression: LogisticRegressionParams,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleSize {
    pub total_comparisons: usize,
    /// Comparisons that produced a training row.
    pub with_winner: usize,
    pub ties: usize,
    /// Decisive comparisons referencing an unknown video.
    pub unmatched: usize,
    /// Training rows per dimension, over all dimensions.
    pub by_dimension: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SigmaTasteAnalysis {
    pub version: String,
    pub analyzed_at: DateTime<Utc>,
    pub dimension: String,
    pub sample_size: SampleSize,
    pub variable_importance: Vec<VariableCorrelation>,
    pub logistic_regression: LogisticRegressionResult,
    pub reasoning_themes: Vec<ReasoningTheme>,
    pub hidden_variable_candidates: Vec<HiddenVariableCandidate>,
    pub recommendations: Vec<String>,
}

/// Runs the whole pipeline, stamping the report with the current time.
#[must_use]
pub fn run_full_analysis(
    comparisons: &[Comparison],
    videos: &[Video],
    options: &AnalysisOptions,
) -> SigmaTasteAnalysis {
    run_full_analysis_at(comparisons, videos, options, Utc::now())
}

/// Runs the whole pipeline with an explicit timestamp.
#[must_use]
pub fn run_full_analysis_at(
    comparisons: &[Comparison],
    videos: &[Video],
    options: &AnalysisOptions,
    analyzed_at: DateTime<Utc>,
) -> SigmaTasteAnalysis {
    let index = dataset::build_video_index(videos);
    let rows = dataset::build_training_dataset(comparisons, &index);

    let ties = comparisons.iter().filter(|c| c.is_tie()).count();
    let mut by_dimension = BTreeMap::new();
    for row in &rows {
        *by_dimension.entry(row.dimension.clone()).or_insert(0) += 1;
    }
    let sample_size = SampleSize {
        total_comparisons: comparisons.len(),
        with_winner: rows.len(),
        ties,
        unmatched: comparisons.len() - ties - rows.len(),
        by_dimension,
    };
    tracing::info!(
        comparisons = sample_size.total_comparisons,
        rows = sample_size.with_winner,
        ties,
        unmatched = sample_size.unmatched,
        dimension = %options.dimension,
        "built training dataset"
    );

    let variable_importance = correlation::analyze_correlations(&rows, &options.dimension);
    let logistic_regression =
        regression::train_logistic_regression(&rows, &options.dimension, options.regression);
    let reasoning_themes = reasoning::mine_reasoning_themes(&rows, &options.dimension);
    let hidden_variable_candidates =
        hidden_variable::identify_hidden_variables(&reasoning_themes, &variable_importance);
    let recommendations =
        build_recommendations(rows.len(), &variable_importance, &hidden_variable_candidates);

    tracing::info!(
        variables = variable_importance.len(),
        themes = reasoning_themes.len(),
        hidden_variables = hidden_variable_candidates.len(),
        "analysis complete"
    );

    SigmaTasteAnalysis {
        version: REPORT_VERSION.to_owned(),
        analyzed_at,
        dimension: options.dimension.to_string(),
        sample_size,
        variable_importance,
        logistic_regression,
        reasoning_themes,
        hidden_variable_candidates,
        recommendations,
    }
}

fn last_segment(path: &str) -> &str {
    path.rsplit('.').next().unwrap_or(path)
}

fn join_last_segments<'a>(correlations: impl Iterator<Item = &'a VariableCorrelation>) -> String {
    correlations
        .map(|c| last_segment(&c.path))
        .collect::<Vec<_>>()
        .join(", ")
}

fn top_in_direction(
    correlations: &[VariableCorrelation],
    direction: Direction,
) -> Vec<&VariableCorrelation> {
    correlations
        .iter()
        .filter(|c| c.direction == direction && c.confidence != ConfidenceTier::Insufficient)
        .take(TOP_DIRECTIONAL_VARIABLES)
        .collect()
}

/// Human-readable next steps derived from the analysis.
#[must_use]
pub fn build_recommendations(
    row_count: usize,
    correlations: &[VariableCorrelation],
    hidden_variables: &[HiddenVariableCandidate],
) -> Vec<String> {
    let mut recommendations = vec![];

    if row_count < TARGET_SAMPLE_WARNING {
        recommendations.push(format!(
            "Current sample size ({row_count}) is limited. Target 500+ comparisons for robust statistical confidence."
        ));
    }

    let winners = top_in_direction(correlations, Direction::HigherWins);
    if !winners.is_empty() {
        recommendations.push(format!(
            "Variables that predict winning: {}",
            join_last_segments(winners.into_iter())
        ));
    }

    let inverse = top_in_direction(correlations, Direction::LowerWins);
    if !inverse.is_empty() {
        recommendations.push(format!(
            "Variables where LOWER is better: {}",
            join_last_segments(inverse.into_iter())
        ));
    }

    let useless = correlations
        .iter()
        .filter(|c| {
            c.sample_count >= USELESS_MIN_SAMPLES && c.effect_size.abs() < USELESS_MAX_EFFECT_SIZE
        })
        .take(MAX_USELESS_VARIABLES)
        .collect::<Vec<_>>();
    if !useless.is_empty() {
        recommendations.push(format!(
            "Variables with no predictive power (consider removing): {}",
            join_last_segments(useless.into_iter())
        ));
    }

    if !hidden_variables.is_empty() {
        let names = hidden_variables
            .iter()
            .map(|h| h.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        recommendations.push(format!("Potential hidden variables found: {names}"));
    }

    recommendations
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;
    use crate::comparison::Confidence;

    fn timestamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 12, 18, 12, 0, 0).unwrap()
    }

    fn comedy_fixture(rows: usize) -> (Vec<Video>, Vec<Comparison>) {
        let mut videos = vec![];
        let mut comparisons = vec![];
        for i in 0..rows {
            let winner = format!("w{i}");
            let loser = format!("l{i}");
            videos.push(Video::new(&winner, json!({ "script": { "humor": { "comedyTiming": 7 } } })));
            videos.push(Video::new(&loser, json!({ "script": { "humor": { "comedyTiming": 5 } } })));
            comparisons.push(
                Comparison::new(format!("c{i}"), &loser, &winner, Some(winner.as_str()))
                    .with_confidence(Confidence::Certain)
                    .with_reasoning("The timing on the punchline landed"),
            );
        }
        (videos, comparisons)
    }

    #[test]
    fn test_empty_inputs() {
        let report = run_full_analysis_at(&[], &[], &AnalysisOptions::default(), timestamp());
        assert_eq!(report.version, REPORT_VERSION);
        assert_eq!(report.sample_size, SampleSize::default());
        assert!(report.variable_importance.is_empty());
        assert!(report.logistic_regression.is_empty());
        assert!(report.reasoning_themes.is_empty());
        assert!(report.hidden_variable_candidates.is_empty());
        assert_eq!(report.recommendations.len(), 1);
        assert!(report.recommendations[0].starts_with("Current sample size (0)"));
    }

    #[test]
    fn test_single_comparison() {
        let videos = vec![
            Video::new("a", json!({ "engagement": { "replayValue": 8 } })),
            Video::new("b", json!({ "engagement": { "replayValue": 4 } })),
        ];
        let comparisons = vec![
            Comparison::new("c1", "a", "b", Some("a")).with_confidence(Confidence::Certain),
            Comparison::new("c2", "a", "b", None),
            Comparison::new("c3", "a", "ghost", Some("ghost")),
        ];
        let report = run_full_analysis_at(&comparisons, &videos, &AnalysisOptions::default(), timestamp());

        assert_eq!(report.sample_size.total_comparisons, 3);
        assert_eq!(report.sample_size.with_winner, 1);
        assert_eq!(report.sample_size.ties, 1);
        assert_eq!(report.sample_size.unmatched, 1);
        assert_eq!(report.sample_size.by_dimension["overall"], 1);

        let replay = &report.variable_importance[0];
        assert_eq!(replay.path, "engagement.replayValue");
        assert_eq!(replay.confidence, ConfidenceTier::Insufficient);
        assert!(report.logistic_regression.is_empty());
    }

    #[test]
    fn test_comedy_timing_scenario() {
        let (videos, comparisons) = comedy_fixture(30);
        let report = run_full_analysis_at(&comparisons, &videos, &AnalysisOptions::default(), timestamp());

        let timing = report
            .variable_importance
            .iter()
            .find(|c| c.path == "script.humor.comedyTiming")
            .unwrap();
        assert_eq!(timing.direction, Direction::HigherWins);
        assert_eq!(timing.confidence, ConfidenceTier::High);

        assert!(report.reasoning_themes.iter().any(|t| t.term == "timing" && t.frequency == 30));
        assert!(report
            .hidden_variable_candidates
            .iter()
            .any(|h| h.key == "comedic_execution"));
        assert!(report
            .recommendations
            .iter()
            .any(|r| r == "Variables that predict winning: comedyTiming"));
        assert!(report
            .recommendations
            .iter()
            .any(|r| r.starts_with("Potential hidden variables found:")));
        assert!(!report.logistic_regression.is_empty());
    }

    #[test]
    fn test_dimension_option_filters_stages() {
        let (videos, comparisons) = comedy_fixture(12);
        let options = AnalysisOptions {
            dimension: "hook".parse().unwrap(),
            ..AnalysisOptions::default()
        };
        let report = run_full_analysis_at(&comparisons, &videos, &options, timestamp());
        assert_eq!(report.dimension, "hook");
        assert_eq!(report.sample_size.with_winner, 12);
        assert!(report.variable_importance.is_empty());
        assert!(report.reasoning_themes.is_empty());
        assert!(report.logistic_regression.is_empty());
    }

    #[test]
    fn test_report_is_deterministic() {
        let (videos, comparisons) = comedy_fixture(15);
        let options = AnalysisOptions::default();
        let first = run_full_analysis_at(&comparisons, &videos, &options, timestamp());
        let second = run_full_analysis_at(&comparisons, &videos, &options, timestamp());
        assert_eq!(first, second);
    }

    #[test]
    fn test_report_serializes_camel_case() {
        let report = run_full_analysis_at(&[], &[], &AnalysisOptions::default(), timestamp());
        let value = serde_json::to_value(&report).unwrap();
        assert!(value.get("variableImportance").is_some());
        assert!(value.get("hiddenVariableCandidates").is_some());
        assert_eq!(value["sampleSize"]["withWinner"], 0);
        assert_eq!(value["analyzedAt"], "2025-12-18T12:00:00Z");
    }

    #[test]
    fn test_useless_variables_recommendation() {
        let flat = VariableCorrelation {
            path: "trends.trendAlignment".to_owned(),
            correlation: 0.0,
            p_value: 0.9,
            direction: Direction::Neutral,
            sample_count: 40,
            mean_delta: 0.0,
            std_delta: 0.2,
            effect_size: 0.01,
            confidence: ConfidenceTier::Low,
        };
        let recommendations = build_recommendations(500, &[flat], &[]);
        assert_eq!(
            recommendations,
            vec!["Variables with no predictive power (consider removing): trendAlignment"]
        );
    }
}
