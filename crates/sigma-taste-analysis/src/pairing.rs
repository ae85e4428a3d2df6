//! Choosing which video pairs to send to judges next.
//!
//! Pairs of rated videos with close overall scores are the most informative:
//! a judgment between them says more about taste than one between a clear
//! favorite and a clear dud. A little random jitter keeps the same close
//! pairs from being proposed every time, and a per-video cap spreads
//! judgments across the catalog.

use std::collections::{BTreeSet, HashMap};

use rand::{Rng, seq::SliceRandom};
use serde::{Deserialize, Serialize};

use crate::{
    comparison::{Comparison, DimensionFilter},
    video::Video,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairSelectionParams {
    pub count: usize,
    /// Upper bound of the uniform noise added to score differences.
    pub jitter: f64,
    /// Maximum appearances of one video before top-up.
    pub max_per_video: usize,
}

impl Default for PairSelectionParams {
    fn default() -> Self {
        Self {
            count: 10,
            jitter: 0.3,
            max_per_video: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedPair {
    pub video_a_id: String,
    pub video_b_id: String,
    /// |difference| of the two overall scores.
    pub score_diff: f64,
}

fn pair_key<'a>(a: &'a str, b: &'a str) -> (&'a str, &'a str) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Selects up to `params.count` not-yet-compared pairs of rated videos.
///
/// Pairs already compared in a dimension matching `dimension` are excluded.
/// Selection first honors `params.max_per_video`, then tops up from the
/// remaining pairs if too few were picked.
pub fn select_informative_pairs<R>(
    videos: &[Video],
    comparisons: &[Comparison],
    dimension: &DimensionFilter,
    params: &PairSelectionParams,
    rng: &mut R,
) -> Vec<SuggestedPair>
where
    R: Rng + ?Sized,
{
    let compared = comparisons
        .iter()
        .filter(|c| dimension.matches(&c.dimension))
        .map(|c| pair_key(&c.video_a_id, &c.video_b_id))
        .collect::<BTreeSet<_>>();

    let mut rated = videos
        .iter()
        .filter_map(|v| v.overall_score().map(|s| (v, s)))
        .collect::<Vec<_>>();
    rated.shuffle(rng);

    let mut candidates = vec![];
    for (i, (a, score_a)) in rated.iter().enumerate() {
        for (b, score_b) in &rated[i + 1..] {
            if a.id == b.id || compared.contains(&pair_key(&a.id, &b.id)) {
                continue;
            }
            let score_diff = (score_a - score_b).abs();
            let sort_key = score_diff + rng.random::<f64>() * params.jitter;
            candidates.push((sort_key, SuggestedPair {
                video_a_id: a.id.clone(),
                video_b_id: b.id.clone(),
                score_diff,
            }));
        }
    }
    candidates.sort_by(|x, y| x.0.total_cmp(&y.0));

    let mut appearances: HashMap<&str, usize> = HashMap::new();
    let mut picked = vec![false; candidates.len()];
    let mut selected = vec![];
    for (i, (_, pair)) in candidates.iter().enumerate() {
        if selected.len() >= params.count {
            break;
        }
        let seen_a = appearances.get(pair.video_a_id.as_str()).copied().unwrap_or(0);
        let seen_b = appearances.get(pair.video_b_id.as_str()).copied().unwrap_or(0);
        if seen_a < params.max_per_video && seen_b < params.max_per_video {
            *appearances.entry(&pair.video_a_id).or_default() += 1;
            *appearances.entry(&pair.video_b_id).or_default() += 1;
            picked[i] = true;
            selected.push(pair.clone());
        }
    }
    for (i, (_, pair)) in candidates.iter().enumerate() {
        if selected.len() >= params.count {
            break;
        }
        if !picked[i] {
            selected.push(pair.clone());
        }
    }

    tracing::debug!(
        rated = rated.len(),
        candidates = candidates.len(),
        selected = selected.len(),
        "selected informative pairs"
    );
    selected
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;
    use serde_json::json;

    use super::*;

    fn rated(id: &str, score: f64) -> Video {
        Video::new(id, json!({})).with_overall_score(score)
    }

    #[test]
    fn test_no_rated_videos() {
        let videos = vec![Video::new("a", json!({})), Video::new("b", json!({}))];
        let mut rng = Pcg64Mcg::seed_from_u64(1);
        let pairs = select_informative_pairs(
            &videos,
            &[],
            &DimensionFilter::default(),
            &PairSelectionParams::default(),
            &mut rng,
        );
        assert!(pairs.is_empty());
    }

    #[test]
    fn test_excludes_compared_pairs() {
        let videos = vec![rated("a", 0.5), rated("b", 0.6), rated("c", 0.9)];
        let comparisons = vec![Comparison::new("c1", "b", "a", Some("a"))];
        let mut rng = Pcg64Mcg::seed_from_u64(7);
        let pairs = select_informative_pairs(
            &videos,
            &comparisons,
            &DimensionFilter::default(),
            &PairSelectionParams::default(),
            &mut rng,
        );
        assert_eq!(pairs.len(), 2);
        assert!(pairs.iter().all(|p| pair_key(&p.video_a_id, &p.video_b_id) != ("a", "b")));
    }

    #[test]
    fn test_other_dimension_does_not_exclude() {
        let videos = vec![rated("a", 0.5), rated("b", 0.6)];
        let comparisons = vec![Comparison::new("c1", "a", "b", Some("a")).with_dimension("hook")];
        let mut rng = Pcg64Mcg::seed_from_u64(7);
        let pairs = select_informative_pairs(
            &videos,
            &comparisons,
            &DimensionFilter::default(),
            &PairSelectionParams::default(),
            &mut rng,
        );
        assert_eq!(pairs.len(), 1);
    }

    #[test]
    fn test_without_jitter_prefers_close_scores() {
        let videos = vec![rated("a", 0.1), rated("b", 0.5), rated("c", 0.52), rated("d", 0.95)];
        let params = PairSelectionParams {
            count: 1,
            jitter: 0.0,
            max_per_video: 2,
        };
        let mut rng = Pcg64Mcg::seed_from_u64(3);
        let pairs = select_informative_pairs(&videos, &[], &DimensionFilter::All, &params, &mut rng);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pair_key(&pairs[0].video_a_id, &pairs[0].video_b_id), ("b", "c"));
        assert!((pairs[0].score_diff - 0.02).abs() < 1e-9);
    }

    #[test]
    fn test_per_video_cap_then_top_up() {
        let videos = vec![rated("a", 0.5), rated("b", 0.5), rated("c", 0.5)];
        let params = PairSelectionParams {
            count: 3,
            jitter: 0.0,
            max_per_video: 1,
        };
        let mut rng = Pcg64Mcg::seed_from_u64(11);
        let pairs = select_informative_pairs(&videos, &[], &DimensionFilter::All, &params, &mut rng);
        // Only one pair fits under the cap; the other two come from top-up.
        assert_eq!(pairs.len(), 3);
    }

    #[test]
    fn test_seeded_selection_is_reproducible() {
        let videos = (0..8)
            .map(|i| rated(&format!("v{i}"), f64::from(i) / 8.0))
            .collect::<Vec<_>>();
        let params = PairSelectionParams {
            count: 4,
            ..PairSelectionParams::default()
        };
        let first = select_informative_pairs(
            &videos,
            &[],
            &DimensionFilter::All,
            &params,
            &mut Pcg64Mcg::seed_from_u64(42),
        );
        let second = select_informative_pairs(
            &videos,
            &[],
            &DimensionFilter::All,
            &params,
            &mut Pcg64Mcg::seed_from_u64(42),
        );
        assert_eq!(first, second);
        assert_eq!(first.len(), params.count);
        let mut appearances: HashMap<&str, usize> = HashMap::new();
        for pair in &first {
            *appearances.entry(&pair.video_a_id).or_default() += 1;
            *appearances.entry(&pair.video_b_id).or_default() += 1;
        }
        assert!(appearances.values().all(|n| *n <= params.max_per_video));
    }
}
