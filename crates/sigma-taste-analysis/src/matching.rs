//! Cross-checking comparisons against the video set, and win-rate rankings.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::{
    comparison::{Comparison, Confidence},
    dataset,
    video::Video,
};

/// Win/loss/tie counts of one video across matched comparisons.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coverage {
    pub wins: usize,
    pub losses: usize,
    pub ties: usize,
}

/// How well a comparison set lines up with the known videos.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSummary {
    /// Comparisons whose two videos are both known.
    pub matched: usize,
    pub unmatched: usize,
    /// Sorted IDs referenced by comparisons but absent from the video set.
    pub missing_video_ids: Vec<String>,
    pub coverage: BTreeMap<String, Coverage>,
    /// Comparisons per confidence label, matched or not.
    pub by_confidence: BTreeMap<Confidence, usize>,
}

impl MatchSummary {
    /// Share of comparisons whose videos are both known, `1.0` when empty.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn match_rate(&self) -> f64 {
        let total = self.matched + self.unmatched;
        if total == 0 {
            1.0
        } else {
            self.matched as f64 / total as f64
        }
    }
}

/// Checks every comparison against the known videos.
#[must_use]
pub fn match_comparisons(comparisons: &[Comparison], videos: &[Video]) -> MatchSummary {
    let index = dataset::build_video_index(videos);
    let mut summary = MatchSummary::default();
    let mut missing = BTreeSet::new();

    for comparison in comparisons {
        *summary.by_confidence.entry(comparison.confidence).or_default() += 1;
        let sides = [comparison.video_a_id.as_str(), comparison.video_b_id.as_str()];
        let unknown = sides
            .iter()
            .filter(|id| !index.contains_key(*id))
            .collect::<Vec<_>>();
        if !unknown.is_empty() {
            summary.unmatched += 1;
            missing.extend(unknown.into_iter().map(|id| (*id).to_owned()));
            continue;
        }

        summary.matched += 1;
        for id in sides {
            let coverage = summary.coverage.entry(id.to_owned()).or_default();
            match comparison.winner_id.as_deref() {
                None => coverage.ties += 1,
                Some(winner) if winner == id => coverage.wins += 1,
                Some(_) => coverage.losses += 1,
            }
        }
    }

    summary.missing_video_ids = missing.into_iter().collect();
    if summary.unmatched > 0 {
        tracing::warn!(
            unmatched = summary.unmatched,
            missing_videos = summary.missing_video_ids.len(),
            "comparisons reference unknown videos"
        );
    }
    summary
}

/// A video's standing by win rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRanking {
    pub video_id: String,
    /// `(wins + ties / 2) / appearances`, or `0.5` for never-compared videos.
    pub score: f64,
    pub wins: usize,
    pub losses: usize,
    pub ties: usize,
}

impl VideoRanking {
    /// Number of matched comparisons the video took part in.
    #[must_use]
    pub fn appearances(&self) -> usize {
        self.wins + self.losses + self.ties
    }
}

/// Ranks every video by win rate, highest first.
///
/// Comparisons referencing unknown videos are ignored. Equal scores keep the
/// order of `videos`.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use sigma_taste_analysis::{comparison::Comparison, matching::rank_videos, video::Video};
///
/// let videos = vec![Video::new("a", json!({})), Video::new("b", json!({})), Video::new("c", json!({}))];
/// let comparisons = vec![Comparison::new("c1", "a", "b", Some("b"))];
/// let ranking = rank_videos(&comparisons, &videos);
/// let order = ranking.iter().map(|r| r.video_id.as_str()).collect::<Vec<_>>();
/// assert_eq!(order, ["b", "c", "a"]);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn rank_videos(comparisons: &[Comparison], videos: &[Video]) -> Vec<VideoRanking> {
    let mut order = vec![];
    let mut stats: BTreeMap<&str, Coverage> = BTreeMap::new();
    for video in videos {
        if stats.insert(video.id.as_str(), Coverage::default()).is_none() {
            order.push(video.id.as_str());
        }
    }

    for comparison in comparisons {
        let (a, b) = (comparison.video_a_id.as_str(), comparison.video_b_id.as_str());
        if !stats.contains_key(a) || !stats.contains_key(b) {
            continue;
        }
        match comparison.winner_id.as_deref() {
            None => {
                for id in [a, b] {
                    if let Some(s) = stats.get_mut(id) {
                        s.ties += 1;
                    }
                }
            }
            Some(winner) => {
                let (won, lost) = if winner == a { (a, b) } else { (b, a) };
                if let Some(s) = stats.get_mut(won) {
                    s.wins += 1;
                }
                if let Some(s) = stats.get_mut(lost) {
                    s.losses += 1;
                }
            }
        }
    }

    let mut rankings = order
        .into_iter()
        .map(|id| {
            let s = stats.get(id).copied().unwrap_or_default();
            let total = s.wins + s.losses + s.ties;
            let score = if total == 0 {
                0.5
            } else {
                (s.wins as f64 + 0.5 * s.ties as f64) / total as f64
            };
            VideoRanking {
                video_id: id.to_owned(),
                score,
                wins: s.wins,
                losses: s.losses,
                ties: s.ties,
            }
        })
        .collect::<Vec<_>>();
    rankings.sort_by(|a, b| b.score.total_cmp(&a.score));
    rankings
}
