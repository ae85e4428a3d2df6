//! Pairwise human judgments between two videos.

use std::{convert::Infallible, fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timestamp;

/// Dimension used when a comparison does not name one.
pub const DEFAULT_DIMENSION: &str = "overall";

/// Sentinel dimension selector that disables filtering.
pub const ALL_DIMENSIONS: &str = "all";

/// How sure the judge was about the winner.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    Certain,
    #[default]
    Somewhat,
    Barely,
    /// A label outside the known scale.
    Unknown,
}

impl Confidence {
    /// Parses a confidence label, mapping unrecognized labels to [`Confidence::Unknown`].
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label {
            "certain" => Self::Certain,
            "somewhat" => Self::Somewhat,
            "barely" => Self::Barely,
            _ => Self::Unknown,
        }
    }

    /// Sample weight used by every weighted statistic.
    ///
    /// # Examples
    ///
    /// ```
    /// use sigma_taste_analysis::comparison::Confidence;
    ///
    /// assert_eq!(Confidence::Certain.weight(), 1.0);
    /// assert_eq!(Confidence::from_label("meh").weight(), 0.5);
    /// ```
    #[must_use]
    pub fn weight(self) -> f64 {
        match self {
            Self::Certain => 1.0,
            Self::Somewhat => 0.7,
            Self::Barely => 0.4,
            Self::Unknown => 0.5,
        }
    }
}

/// One human pairwise judgment.
///
/// `winner_id` is `None` for a tie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawComparison")]
pub struct Comparison {
    pub id: String,
    pub video_a_id: String,
    pub video_b_id: String,
    pub winner_id: Option<String>,
    pub dimension: String,
    pub confidence: Confidence,
    pub reasoning: String,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct RawComparison {
    id: String,
    video_a_id: String,
    video_b_id: String,
    #[serde(default)]
    winner_id: Option<String>,
    #[serde(default)]
    dimension: Option<String>,
    #[serde(default)]
    confidence: Option<String>,
    #[serde(default)]
    reasoning: Option<String>,
    #[serde(default)]
    created_at: Option<serde_json::Value>,
}

impl From<RawComparison> for Comparison {
    fn from(raw: RawComparison) -> Self {
        Self {
            id: raw.id,
            video_a_id: raw.video_a_id,
            video_b_id: raw.video_b_id,
            winner_id: raw.winner_id,
            dimension: raw
                .dimension
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| DEFAULT_DIMENSION.to_owned()),
            confidence: raw
                .confidence
                .filter(|c| !c.is_empty())
                .map_or_else(Confidence::default, |c| Confidence::from_label(&c)),
            reasoning: raw.reasoning.unwrap_or_default(),
            created_at: timestamp::from_value(raw.created_at.as_ref()),
        }
    }
}

impl Comparison {
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        video_a_id: impl Into<String>,
        video_b_id: impl Into<String>,
        winner_id: Option<&str>,
    ) -> Self {
        Self {
            id: id.into(),
            video_a_id: video_a_id.into(),
            video_b_id: video_b_id.into(),
            winner_id: winner_id.map(str::to_owned),
            dimension: DEFAULT_DIMENSION.to_owned(),
            confidence: Confidence::default(),
            reasoning: String::new(),
            created_at: None,
        }
    }

    #[must_use]
    pub fn with_dimension(mut self, dimension: impl Into<String>) -> Self {
        self.dimension = dimension.into();
        self
    }

    #[must_use]
    pub fn with_confidence(mut self, confidence: Confidence) -> Self {
        self.confidence = confidence;
        self
    }

    #[must_use]
    pub fn with_reasoning(mut self, reasoning: impl Into<String>) -> Self {
        self.reasoning = reasoning.into();
        self
    }

    #[must_use]
    pub fn is_tie(&self) -> bool {
        self.winner_id.is_none()
    }

    /// The video on the other side of the winner.
    ///
    /// A winner that is neither side is treated as `video_a` losing.
    #[must_use]
    pub fn loser_id(&self) -> Option<&str> {
        let winner = self.winner_id.as_deref()?;
        if winner == self.video_a_id {
            Some(self.video_b_id.as_str())
        } else {
            Some(self.video_a_id.as_str())
        }
    }
}

/// Selects which comparisons take part in an analysis.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DimensionFilter {
    All,
    Only(String),
}

impl Default for DimensionFilter {
    fn default() -> Self {
        Self::Only(DEFAULT_DIMENSION.to_owned())
    }
}

impl DimensionFilter {
    #[must_use]
    pub fn matches(&self, dimension: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(only) => only == dimension,
        }
    }
}

impl FromStr for DimensionFilter {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(if s == ALL_DIMENSIONS {
            Self::All
        } else {
            Self::Only(s.to_owned())
        })
    }
}

impl fmt::Display for DimensionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(ALL_DIMENSIONS),
            Self::Only(dimension) => f.write_str(dimension),
        }
    }
}

impl Serialize for DimensionFilter {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_deserialize_applies_defaults() {
        let comparison: Comparison = serde_json::from_value(json!({
            "id": "c1",
            "video_a_id": "a",
            "video_b_id": "b",
            "winner_id": null,
            "dimension": null
        }))
        .unwrap();
        assert!(comparison.is_tie());
        assert_eq!(comparison.dimension, "overall");
        assert_eq!(comparison.confidence, Confidence::Somewhat);
        assert_eq!(comparison.reasoning, "");
    }

    #[test]
    fn test_unknown_confidence_label() {
        let comparison: Comparison = serde_json::from_value(json!({
            "id": "c1",
            "video_a_id": "a",
            "video_b_id": "b",
            "winner_id": "a",
            "confidence": "absolutely"
        }))
        .unwrap();
        assert_eq!(comparison.confidence, Confidence::Unknown);
        assert_eq!(comparison.confidence.weight(), 0.5);
    }

    #[test]
    fn test_loser_id() {
        let a_wins = Comparison::new("c1", "a", "b", Some("a"));
        assert_eq!(a_wins.loser_id(), Some("b"));
        let b_wins = Comparison::new("c2", "a", "b", Some("b"));
        assert_eq!(b_wins.loser_id(), Some("a"));
        let tie = Comparison::new("c3", "a", "b", None);
        assert_eq!(tie.loser_id(), None);
    }

    #[test]
    fn test_dimension_filter() {
        let all: DimensionFilter = "all".parse().unwrap();
        assert_eq!(all, DimensionFilter::All);
        assert!(all.matches("hook"));

        let hook: DimensionFilter = "hook".parse().unwrap();
        assert!(hook.matches("hook"));
        assert!(!hook.matches("overall"));
        assert_eq!(hook.to_string(), "hook");

        assert_eq!(DimensionFilter::default().to_string(), "overall");
    }
}
