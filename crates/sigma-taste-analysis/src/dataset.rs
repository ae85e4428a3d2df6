//! Training rows built from comparisons.
//!
//! Each decisive comparison whose two videos are both known becomes one
//! [`TrainingRow`]: the feature deltas `winner - loser` over the paths both
//! videos expose, weighted by the judge's confidence.

use std::collections::HashMap;

use serde::Serialize;
use sigma_taste_training::logistic::WeightedExample;

use crate::{
    comparison::{Comparison, DimensionFilter},
    feature::{self, FeatureMap},
    video::Video,
};

/// Lookup from video ID to video. Later duplicates replace earlier ones.
pub type VideoIndex<'a> = HashMap<&'a str, &'a Video>;

#[must_use]
pub fn build_video_index(videos: &[Video]) -> VideoIndex<'_> {
    videos.iter().map(|v| (v.id.as_str(), v)).collect()
}

/// One comparison expressed as feature deltas.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingRow {
    pub comparison_id: String,
    pub dimension: String,
    pub confidence_weight: f64,
    pub winner_id: String,
    pub loser_id: String,
    /// `winner - loser` for every path present in both videos.
    pub deltas: FeatureMap,
    pub reasoning: String,
}

impl WeightedExample for TrainingRow {
    fn features(&self) -> &FeatureMap {
        &self.deltas
    }

    fn weight(&self) -> f64 {
        self.confidence_weight
    }
}

/// Converts comparisons into training rows.
///
/// Ties and comparisons referencing unknown videos are skipped. Features are
/// extracted once per video.
#[must_use]
pub fn build_training_dataset(comparisons: &[Comparison], index: &VideoIndex<'_>) -> Vec<TrainingRow> {
    let mut feature_cache: HashMap<&str, FeatureMap> = HashMap::new();
    let mut rows = vec![];
    let mut unmatched = 0;

    for comparison in comparisons {
        let (Some(winner_id), Some(loser_id)) =
            (comparison.winner_id.as_deref(), comparison.loser_id())
        else {
            continue;
        };
        let (Some(winner), Some(loser)) = (index.get(winner_id), index.get(loser_id)) else {
            tracing::debug!(comparison = %comparison.id, "skipping comparison with unknown video");
            unmatched += 1;
            continue;
        };

        for video in [winner, loser] {
            feature_cache
                .entry(video.id.as_str())
                .or_insert_with(|| feature::extract_features(&video.deep_analysis));
        }
        let winner_features = &feature_cache[winner.id.as_str()];
        let loser_features = &feature_cache[loser.id.as_str()];

        let deltas = winner_features
            .iter()
            .filter_map(|(path, w)| loser_features.get(path).map(|l| (path.clone(), w - l)))
            .collect();

        rows.push(TrainingRow {
            comparison_id: comparison.id.clone(),
            dimension: comparison.dimension.clone(),
            confidence_weight: comparison.confidence.weight(),
            winner_id: winner_id.to_owned(),
            loser_id: loser_id.to_owned(),
            deltas,
            reasoning: comparison.reasoning.clone(),
        });
    }

    if unmatched > 0 {
        tracing::warn!(unmatched, "comparisons reference unknown videos");
    }
    tracing::debug!(rows = rows.len(), videos = feature_cache.len(), "built training rows");
    rows
}

/// Rows whose dimension passes the filter.
#[must_use]
pub fn filter_rows<'a>(rows: &'a [TrainingRow], filter: &DimensionFilter) -> Vec<&'a TrainingRow> {
    rows.iter().filter(|r| filter.matches(&r.dimension)).collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::comparison::Confidence;

    fn videos() -> Vec<Video> {
        vec![
            Video::new("a", json!({ "engagement": { "replayValue": 8 }, "visual": { "hookStrength": 6 } })),
            Video::new("b", json!({ "engagement": { "replayValue": 4 } })),
        ]
    }

    #[test]
    fn test_single_comparison_delta() {
        let videos = videos();
        let index = build_video_index(&videos);
        let comparisons = vec![Comparison::new("c1", "a", "b", Some("a")).with_confidence(Confidence::Certain)];
        let rows = build_training_dataset(&comparisons, &index);

        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.winner_id, "a");
        assert_eq!(row.loser_id, "b");
        assert_eq!(row.confidence_weight, 1.0);
        // Only paths present on both sides.
        assert_eq!(row.deltas.len(), 1);
        assert!((row.deltas["engagement.replayValue"] - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_ties_and_unknown_videos_are_skipped() {
        let videos = videos();
        let index = build_video_index(&videos);
        let comparisons = vec![
            Comparison::new("tie", "a", "b", None),
            Comparison::new("ghost", "a", "zzz", Some("zzz")),
        ];
        assert!(build_training_dataset(&comparisons, &index).is_empty());
    }

    #[test]
    fn test_delta_is_antisymmetric() {
        let videos = videos();
        let index = build_video_index(&videos);
        let comparisons = vec![
            Comparison::new("c1", "a", "b", Some("a")),
            Comparison::new("c2", "a", "b", Some("b")),
        ];
        let rows = build_training_dataset(&comparisons, &index);
        let forward = rows[0].deltas["engagement.replayValue"];
        let backward = rows[1].deltas["engagement.replayValue"];
        assert!((forward + backward).abs() < 1e-12);
    }

    #[test]
    fn test_filter_rows() {
        let videos = videos();
        let index = build_video_index(&videos);
        let comparisons = vec![
            Comparison::new("c1", "a", "b", Some("a")),
            Comparison::new("c2", "a", "b", Some("a")).with_dimension("hook"),
        ];
        let rows = build_training_dataset(&comparisons, &index);
        assert_eq!(filter_rows(&rows, &DimensionFilter::default()).len(), 1);
        assert_eq!(filter_rows(&rows, &DimensionFilter::All).len(), 2);
        assert!(filter_rows(&rows, &"pacing".parse().unwrap()).is_empty());
    }
}
