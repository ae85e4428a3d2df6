//! Analyzed videos and their human ratings.
//!
//! A [`Video`] carries an AI-produced analysis record whose shape changes
//! between schema versions. The record is kept as a schema-less
//! [`serde_json::Value`] tree and is only ever read, never rewritten.
//!
//! # Serialization
//!
//! Videos are read from dataset exports:
//!
//! ```json
//! {
//!   "id": "3f2c...",
//!   "video_url": "https://...",
//!   "platform": "tiktok",
//!   "deep_analysis": { "engagement": { "replayValue": 8 }, "schema_version": 2 },
//!   "rating": { "overall_score": 0.72 },
//!   "created_at": "2025-12-18T10:00:00Z"
//! }
//! ```
//!
//! Older exports store the record under `visual_analysis`; it is used when
//! `deep_analysis` is missing or null.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{feature, timestamp};

/// Path of the AI engagement estimate compared against human ratings.
pub const REPLAY_VALUE_PATH: &str = "engagement.replayValue";

/// Minimum |divergence| for a video to count as an adversarial case.
pub const ADVERSARIAL_DIVERGENCE_THRESHOLD: f64 = 0.3;

/// One analyzed media item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawVideo")]
pub struct Video {
    pub id: String,
    pub video_url: String,
    pub platform: String,
    /// Nested, loosely structured AI analysis record.
    pub deep_analysis: Value,
    pub rating: Option<HumanRating>,
    pub created_at: Option<DateTime<Utc>>,
    pub analyzed_at: Option<DateTime<Utc>>,
}

/// A human rating attached to a video.
///
/// `null` fields read as their defaults; non-string tags and non-numeric
/// dimension scores are dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawHumanRating")]
pub struct HumanRating {
    /// Overall score in `[0, 1]`.
    pub overall_score: Option<f64>,
    pub dimensions: BTreeMap<String, f64>,
    pub notes: String,
    pub tags: Vec<String>,
    pub rater_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawHumanRating {
    overall_score: Option<Value>,
    dimensions: Option<Value>,
    notes: Option<Value>,
    tags: Option<Value>,
    rater_id: Option<Value>,
}

impl From<RawHumanRating> for HumanRating {
    fn from(raw: RawHumanRating) -> Self {
        let dimensions = raw
            .dimensions
            .as_ref()
            .and_then(Value::as_object)
            .map(|map| {
                map.iter()
                    .filter_map(|(k, v)| v.as_f64().map(|v| (k.clone(), v)))
                    .collect()
            })
            .unwrap_or_default();
        let tags = raw
            .tags
            .as_ref()
            .and_then(Value::as_array)
            .map(|tags| tags.iter().filter_map(Value::as_str).map(str::to_owned).collect())
            .unwrap_or_default();
        Self {
            overall_score: raw.overall_score.as_ref().and_then(Value::as_f64),
            dimensions,
            notes: raw
                .notes
                .as_ref()
                .and_then(Value::as_str)
                .map(str::to_owned)
                .unwrap_or_default(),
            tags,
            rater_id: raw.rater_id.as_ref().and_then(Value::as_str).map(str::to_owned),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawVideo {
    id: String,
    #[serde(default)]
    video_url: Option<String>,
    #[serde(default)]
    platform: Option<String>,
    #[serde(default)]
    metadata: Option<Value>,
    #[serde(default)]
    deep_analysis: Option<Value>,
    #[serde(default)]
    visual_analysis: Option<Value>,
    #[serde(default)]
    rating: Option<HumanRating>,
    #[serde(default)]
    created_at: Option<Value>,
    #[serde(default)]
    analyzed_at: Option<Value>,
}

impl From<RawVideo> for Video {
    fn from(raw: RawVideo) -> Self {
        let metadata_url = raw
            .metadata
            .as_ref()
            .and_then(|m| m.get("url"))
            .and_then(Value::as_str)
            .map(str::to_owned);
        let deep_analysis = raw
            .deep_analysis
            .filter(|v| !v.is_null())
            .or(raw.visual_analysis.filter(|v| !v.is_null()))
            .unwrap_or_else(|| Value::Object(serde_json::Map::new()));
        let created_at = timestamp::from_value(raw.created_at.as_ref());
        let analyzed_at = timestamp::from_value(raw.analyzed_at.as_ref());
        Self {
            id: raw.id,
            video_url: raw.video_url.or(metadata_url).unwrap_or_default(),
            platform: raw.platform.unwrap_or_else(|| "unknown".to_owned()),
            deep_analysis,
            rating: raw.rating,
            created_at,
            analyzed_at: analyzed_at.or(created_at),
        }
    }
}

impl Video {
    /// Creates a video with the given analysis record and no rating.
    #[must_use]
    pub fn new(id: impl Into<String>, deep_analysis: Value) -> Self {
        Self {
            id: id.into(),
            video_url: String::new(),
            platform: "unknown".to_owned(),
            deep_analysis,
            rating: None,
            created_at: None,
            analyzed_at: None,
        }
    }

    #[must_use]
    pub fn with_overall_score(mut self, score: f64) -> Self {
        self.rating = Some(HumanRating {
            overall_score: Some(score),
            ..HumanRating::default()
        });
        self
    }

    #[must_use]
    pub fn overall_score(&self) -> Option<f64> {
        self.rating.as_ref().and_then(|r| r.overall_score)
    }

    /// Schema version recorded in the analysis record, if any.
    #[must_use]
    pub fn schema_version(&self) -> Option<&Value> {
        self.deep_analysis.get("schema_version")
    }

    /// Human overall score minus the AI replay value (scaled to `[0, 1]`).
    ///
    /// Returns `None` unless the overall score is present and non-zero and
    /// the replay value is present.
    ///
    /// # Examples
    ///
    /// ```
    /// use serde_json::json;
    /// use sigma_taste_analysis::video::Video;
    ///
    /// let video = Video::new("v1", json!({ "engagement": { "replayValue": 8 } }))
    ///     .with_overall_score(0.3);
    /// assert!((video.divergence().unwrap() - (-0.5)).abs() < 1e-12);
    /// ```
    #[must_use]
    pub fn divergence(&self) -> Option<f64> {
        let human = self.overall_score().filter(|s| *s != 0.0)?;
        let ai = self.replay_value()?;
        Some(human - ai / 10.0)
    }

    fn replay_value(&self) -> Option<f64> {
        feature::get_nested_value(&self.deep_analysis, REPLAY_VALUE_PATH).and_then(Value::as_f64)
    }
}

/// Videos whose human rating diverges strongly from the AI replay estimate.
///
/// Videos with a zero replay value are skipped.
#[must_use]
pub fn adversarial_cases(videos: &[Video]) -> Vec<&Video> {
    videos
        .iter()
        .filter(|v| v.replay_value().is_some_and(|r| r != 0.0))
        .filter(|v| {
            v.divergence()
                .is_some_and(|d| d.abs() > ADVERSARIAL_DIVERGENCE_THRESHOLD)
        })
        .collect()
}
