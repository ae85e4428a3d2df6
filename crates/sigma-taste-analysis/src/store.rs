//! In-memory collection of videos and comparisons with upsert-by-ID merging.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{comparison::Comparison, video::Video};

/// Records keyed by a stable string ID.
pub trait Identified {
    fn id(&self) -> &str;
}

impl Identified for Video {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Identified for Comparison {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Outcome of an upsert.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UpsertStats {
    pub inserted: usize,
    pub updated: usize,
}

impl UpsertStats {
    #[must_use]
    pub fn total(&self) -> usize {
        self.inserted + self.updated
    }
}

fn upsert_by_id<T, I>(items: &mut Vec<T>, incoming: I) -> UpsertStats
where
    T: Identified,
    I: IntoIterator<Item = T>,
{
    let mut positions = items
        .iter()
        .enumerate()
        .map(|(i, item)| (item.id().to_owned(), i))
        .collect::<HashMap<_, _>>();
    let mut stats = UpsertStats::default();
    for item in incoming {
        if let Some(&i) = positions.get(item.id()) {
            items[i] = item;
            stats.updated += 1;
        } else {
            positions.insert(item.id().to_owned(), items.len());
            items.push(item);
            stats.inserted += 1;
        }
    }
    stats
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TasteStore {
    #[serde(default)]
    videos: Vec<Video>,
    #[serde(default)]
    comparisons: Vec<Comparison>,
}

impl TasteStore {
    /// Builds a store, collapsing duplicate IDs (the last record wins).
    #[must_use]
    pub fn new(videos: Vec<Video>, comparisons: Vec<Comparison>) -> Self {
        let mut store = Self::default();
        store.upsert_videos(videos);
        store.upsert_comparisons(comparisons);
        store
    }

    #[must_use]
    pub fn videos(&self) -> &[Video] {
        &self.videos
    }

    #[must_use]
    pub fn comparisons(&self) -> &[Comparison] {
        &self.comparisons
    }

    #[must_use]
    pub fn video(&self, id: &str) -> Option<&Video> {
        self.videos.iter().find(|v| v.id == id)
    }

    pub fn upsert_videos<I>(&mut self, videos: I) -> UpsertStats
    where
        I: IntoIterator<Item = Video>,
    {
        upsert_by_id(&mut self.videos, videos)
    }

    pub fn upsert_comparisons<I>(&mut self, comparisons: I) -> UpsertStats
    where
        I: IntoIterator<Item = Comparison>,
    {
        upsert_by_id(&mut self.comparisons, comparisons)
    }

    pub fn add_comparison(&mut self, comparison: Comparison) -> UpsertStats {
        self.upsert_comparisons([comparison])
    }

    /// Merges another store into this one.
    pub fn merge(&mut self, other: Self) -> (UpsertStats, UpsertStats) {
        let videos = self.upsert_videos(other.videos);
        let comparisons = self.upsert_comparisons(other.comparisons);
        (videos, comparisons)
    }

    #[must_use]
    pub fn into_parts(self) -> (Vec<Video>, Vec<Comparison>) {
        (self.videos, self.comparisons)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_upsert_replaces_by_id() {
        let mut store = TasteStore::default();
        let stats = store.upsert_videos([
            Video::new("a", json!({ "x": 1 })),
            Video::new("b", json!({})),
        ]);
        assert_eq!(stats, UpsertStats { inserted: 2, updated: 0 });

        let stats = store.upsert_videos([Video::new("a", json!({ "x": 2 }))]);
        assert_eq!(stats, UpsertStats { inserted: 0, updated: 1 });
        assert_eq!(store.videos().len(), 2);
        assert_eq!(store.video("a").unwrap().deep_analysis["x"], 2);
        assert_eq!(store.videos()[0].id, "a");
    }

    #[test]
    fn test_new_collapses_duplicates() {
        let store = TasteStore::new(
            vec![],
            vec![
                Comparison::new("c1", "a", "b", Some("a")),
                Comparison::new("c1", "a", "b", Some("b")),
            ],
        );
        assert_eq!(store.comparisons().len(), 1);
        assert_eq!(store.comparisons()[0].winner_id.as_deref(), Some("b"));
    }

    #[test]
    fn test_merge() {
        let mut base = TasteStore::new(vec![Video::new("a", json!({}))], vec![]);
        let other = TasteStore::new(
            vec![Video::new("a", json!({})), Video::new("b", json!({}))],
            vec![Comparison::new("c1", "a", "b", None)],
        );
        let (videos, comparisons) = base.merge(other);
        assert_eq!(videos, UpsertStats { inserted: 1, updated: 1 });
        assert_eq!(comparisons.total(), 1);
    }

    #[test]
    fn test_add_comparison() {
        let mut store = TasteStore::default();
        store.add_comparison(Comparison::new("c1", "a", "b", Some("a")));
        store.add_comparison(Comparison::new("c1", "a", "b", None));
        assert_eq!(store.comparisons().len(), 1);
        assert!(store.comparisons()[0].is_tie());
    }

    #[test]
    fn test_serde_round_trip_preserves_records() {
        let store = TasteStore::new(
            vec![Video::new("a", json!({ "engagement": { "replayValue": 7 } })).with_overall_score(0.4)],
            vec![Comparison::new("c1", "a", "b", Some("a")).with_reasoning("better hook")],
        );
        let value = serde_json::to_value(&store).unwrap();
        let restored: TasteStore = serde_json::from_value(value).unwrap();
        assert_eq!(restored, store);
    }
}
