//! Feature extraction from schema-less analysis records.
//!
//! Every analysis record is flattened into a map from dotted path to a
//! numeric value on a comparable scale (mostly `[0, 1]`).
//!
//! # Path Sources
//!
//! Paths come from two places, in this order:
//!
//! 1. [`KNOWN_PATHS`]: a fixed catalog of paths seen across schema versions.
//! 2. Dynamic discovery: every other leaf in the record holding a plain number.
//!    Discovery descends only into objects; arrays and nulls are skipped.
//!
//! # Normalization
//!
//! The [`NormalizationRule`] for a path is derived from its name, so catalog
//! paths and discovered paths are treated the same way:
//!
//! | Path contains | Rule | Result |
//! |---------------|------|--------|
//! | `1_10` | [`NormalizationRule::OneToTen`] | `v / 10` |
//! | `0_1` | [`NormalizationRule::UnitInterval`] | `v` |
//! | `cutsPerMinute` | [`NormalizationRule::Counter`] | `v / 10` in `[0, 10]`, else `min(v / 30, 1)` |
//! | anything else | [`NormalizationRule::Auto`] | `v / 10` in `[0, 10]`, else `v` |
//!
//! Strings holding a numeric prefix (`"7"`, `"7.5 / 10"`) are coerced before
//! normalization. Booleans, nulls, arrays and objects never produce a feature.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;

use crate::video::Video;

/// Flattened features of one analysis record, keyed by dotted path.
pub type FeatureMap = BTreeMap<String, f64>;

/// How a raw value at a path is mapped onto a comparable scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NormalizationRule {
    /// A 1–10 score: always divided by 10.
    OneToTen,
    /// Already a `[0, 1]` fraction: kept as is.
    UnitInterval,
    /// An unbounded count: values above 10 are divided by `max` and clamped to 1.
    Counter { max: f64 },
    /// Values in `[0, 10]` are divided by 10, anything else is kept.
    Auto,
}

/// Counters whose values regularly exceed the 0–10 scale, with their saturation point.
const UNBOUNDED_COUNTERS: &[(&str, f64)] = &[("cutsPerMinute", 30.0)];

impl NormalizationRule {
    /// Derives the rule from a path's naming convention.
    ///
    /// # Examples
    ///
    /// ```
    /// use sigma_taste_analysis::feature::NormalizationRule;
    ///
    /// assert_eq!(
    ///     NormalizationRule::for_path("schema_v1_signals.personality.energy_1_10"),
    ///     NormalizationRule::OneToTen
    /// );
    /// assert_eq!(NormalizationRule::for_path("visual.hookStrength"), NormalizationRule::Auto);
    /// ```
    #[must_use]
    pub fn for_path(path: &str) -> Self {
        if path.contains("1_10") {
            return Self::OneToTen;
        }
        if path.contains("0_1") {
            return Self::UnitInterval;
        }
        UNBOUNDED_COUNTERS
            .iter()
            .find(|(marker, _)| path.contains(marker))
            .map_or(Self::Auto, |&(_, max)| Self::Counter { max })
    }

    #[must_use]
    pub fn apply(self, value: f64) -> f64 {
        let in_ten_scale = (0.0..=10.0).contains(&value);
        match self {
            Self::OneToTen => value / 10.0,
            Self::UnitInterval => value,
            Self::Counter { .. } | Self::Auto if in_ten_scale => value / 10.0,
            Self::Counter { max } => (value / max).min(1.0),
            Self::Auto => value,
        }
    }
}

/// A catalog entry: a path known across schema versions and its rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KnownPath {
    pub path: &'static str,
    pub rule: NormalizationRule,
}

const fn known(path: &'static str, rule: NormalizationRule) -> KnownPath {
    KnownPath { path, rule }
}

use NormalizationRule::{Auto, OneToTen, UnitInterval};

/// Paths extracted from every record before dynamic discovery runs.
pub const KNOWN_PATHS: &[KnownPath] = &[
    known("audio.quality", Auto),
    known("audio.audioEnergy", Auto),
    known("audio.audioVisualSync", Auto),
    known("engagement.replayValue", Auto),
    known("engagement.shareability", Auto),
    known("engagement.scrollStopPower", Auto),
    known("engagement.attentionRetention", Auto),
    known("technical.pacing", Auto),
    known("technical.cutsPerMinute", NormalizationRule::Counter { max: 30.0 }),
    known("visual.hookStrength", Auto),
    known("visual.colorDiversity", Auto),
    known("visual.overallQuality", Auto),
    known("visual.compositionQuality", Auto),
    known("trends.timelessness", Auto),
    known("trends.trendAlignment", Auto),
    known("script.originality.score", Auto),
    known("script.replicability.score", Auto),
    known("script.replicability.contextDependency", Auto),
    known("script.scriptQuality", Auto),
    known("script.humor.comedyTiming", Auto),
    known("script.humor.absurdismLevel", Auto),
    known("script.emotional.relatability", Auto),
    known("script.emotional.emotionalIntensity", Auto),
    known("script.structure.payoffStrength", Auto),
    known("scenes.visualNarrativeSync", Auto),
    known(
        "schema_v1_signals.coherence.personality_message_alignment_0_1",
        UnitInterval,
    ),
    known("schema_v1_signals.execution.effortlessness_1_10", OneToTen),
    known("schema_v1_signals.execution.intentionality_1_10", OneToTen),
    known("schema_v1_signals.execution.social_permission_1_10", OneToTen),
    known("schema_v1_signals.execution.production_investment_1_10", OneToTen),
    known("schema_v1_signals.statement.self_seriousness_1_10", OneToTen),
    known(
        "schema_v1_signals.conversion.visit_intent_strength_0_1",
        UnitInterval,
    ),
    known("schema_v1_signals.personality.energy_1_10", OneToTen),
    known("schema_v1_signals.personality.warmth_1_10", OneToTen),
    known("schema_v1_signals.personality.formality_1_10", OneToTen),
    known("schema_v1_signals.personality.confidence_1_10", OneToTen),
];

/// Resolves a dotted path inside a nested record.
#[must_use]
pub fn get_nested_value<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(value, |current, key| current.get(key))
}

/// Converts a raw value to a normalized feature, if it holds a number.
#[must_use]
pub fn normalize_value(value: &Value, rule: NormalizationRule) -> Option<f64> {
    let raw = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => parse_float_prefix(s)?,
        _ => return None,
    };
    Some(rule.apply(raw)).filter(|v| v.is_finite())
}

/// Parses the longest leading decimal literal of `s`, ignoring leading whitespace.
fn parse_float_prefix(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_end = digits_from(end);
    let mut mantissa_digits = int_end - end;
    end = int_end;
    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        mantissa_digits += frac_end - end - 1;
        end = frac_end;
    }
    if mantissa_digits == 0 {
        return None;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }
    s[..end].parse().ok()
}

/// Collects every numeric leaf reachable through objects, as `(path, value)`.
#[must_use]
pub fn discover_numeric_paths(value: &Value) -> Vec<(String, f64)> {
    let mut found = vec![];
    walk_numeric(value, "", &mut found);
    found
}

fn walk_numeric(value: &Value, prefix: &str, found: &mut Vec<(String, f64)>) {
    let Value::Object(map) = value else {
        return;
    };
    for (key, child) in map {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match child {
            Value::Number(n) => {
                if let Some(v) = n.as_f64() {
                    found.push((path, v));
                }
            }
            Value::Object(_) => walk_numeric(child, &path, found),
            _ => {}
        }
    }
}

/// Flattens one analysis record into normalized features.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use sigma_taste_analysis::feature::extract_features;
///
/// let features = extract_features(&json!({
///     "engagement": { "replayValue": 8 },
///     "technical": { "cutsPerMinute": 45 },
///     "custom": { "vibe": "6.5", "flag": true }
/// }));
/// assert_eq!(features["engagement.replayValue"], 0.8);
/// assert_eq!(features["technical.cutsPerMinute"], 1.0);
/// // Discovery only picks up plain numbers.
/// assert!(!features.contains_key("custom.vibe"));
/// assert!(!features.contains_key("custom.flag"));
/// ```
#[must_use]
pub fn extract_features(analysis: &Value) -> FeatureMap {
    let mut features = FeatureMap::new();
    if !analysis.is_object() {
        return features;
    }

    for known in KNOWN_PATHS {
        if let Some(v) =
            get_nested_value(analysis, known.path).and_then(|raw| normalize_value(raw, known.rule))
        {
            features.insert(known.path.to_owned(), v);
        }
    }

    for (path, raw) in discover_numeric_paths(analysis) {
        if KNOWN_PATHS.iter().any(|k| k.path == path) {
            continue;
        }
        let v = NormalizationRule::for_path(&path).apply(raw);
        if v.is_finite() {
            features.insert(path, v);
        }
    }

    features
}

/// Union of numeric paths found in the first `sample_limit` videos.
#[must_use]
pub fn discover_all_numeric_paths(videos: &[Video], sample_limit: usize) -> BTreeSet<String> {
    videos
        .iter()
        .take(sample_limit)
        .flat_map(|v| discover_numeric_paths(&v.deep_analysis))
        .map(|(path, _)| path)
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-12,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_catalog_rules_match_naming_convention() {
        for known in KNOWN_PATHS {
            assert_eq!(
                known.rule,
                NormalizationRule::for_path(known.path),
                "{}",
                known.path
            );
        }
    }

    #[test]
    fn test_normalization_rules() {
        let energy = "schema_v1_signals.personality.energy_1_10";
        let alignment = "schema_v1_signals.coherence.personality_message_alignment_0_1";
        let cuts = "technical.cutsPerMinute";

        assert_close(NormalizationRule::for_path(energy).apply(7.0), 0.7);
        assert_close(NormalizationRule::for_path(alignment).apply(0.85), 0.85);
        assert_close(NormalizationRule::for_path(cuts).apply(45.0), 1.0);
        assert_close(NormalizationRule::for_path(cuts).apply(15.0), 0.5);
        assert_close(NormalizationRule::for_path(cuts).apply(6.0), 0.6);
        assert_close(NormalizationRule::for_path("engagement.views").apply(250.0), 250.0);
        assert_close(NormalizationRule::for_path("engagement.replayValue").apply(-2.0), -2.0);
    }

    #[test]
    fn test_normalize_value_coerces_strings() {
        assert_eq!(normalize_value(&json!("7"), NormalizationRule::Auto), Some(0.7));
        assert_eq!(
            normalize_value(&json!(" 7.5 / 10"), NormalizationRule::Auto),
            Some(0.75)
        );
        assert_eq!(normalize_value(&json!("high"), NormalizationRule::Auto), None);
        assert_eq!(normalize_value(&json!(true), NormalizationRule::Auto), None);
        assert_eq!(normalize_value(&Value::Null, NormalizationRule::Auto), None);
    }

    #[test]
    fn test_parse_float_prefix() {
        assert_eq!(parse_float_prefix("12abc"), Some(12.0));
        assert_eq!(parse_float_prefix("-3.5"), Some(-3.5));
        assert_eq!(parse_float_prefix(".5"), Some(0.5));
        assert_eq!(parse_float_prefix("5."), Some(5.0));
        assert_eq!(parse_float_prefix("1e2x"), Some(100.0));
        assert_eq!(parse_float_prefix("1e"), Some(1.0));
        assert_eq!(parse_float_prefix("-"), None);
        assert_eq!(parse_float_prefix("."), None);
        assert_eq!(parse_float_prefix(""), None);
    }

    #[test]
    fn test_discovery_skips_arrays_and_nulls() {
        let found = discover_numeric_paths(&json!({
            "a": { "b": 3, "c": [1, 2], "d": null },
            "e": 12.5
        }));
        let paths: Vec<_> = found.iter().map(|(p, _)| p.as_str()).collect();
        assert_eq!(paths, vec!["a.b", "e"]);
    }

    #[test]
    fn test_extract_features_mixes_catalog_and_discovered() {
        let features = extract_features(&json!({
            "engagement": { "replayValue": "8" },
            "schema_v1_signals": { "personality": { "warmth_1_10": 4 } },
            "extra": { "score_0_1": 0.25, "views": 1200 }
        }));
        assert_close(features["engagement.replayValue"], 0.8);
        assert_close(features["schema_v1_signals.personality.warmth_1_10"], 0.4);
        assert_close(features["extra.score_0_1"], 0.25);
        assert_close(features["extra.views"], 1200.0);
        assert_eq!(features.len(), 4);
    }

    #[test]
    fn test_extract_features_non_object() {
        assert!(extract_features(&json!([1, 2, 3])).is_empty());
        assert!(extract_features(&Value::Null).is_empty());
    }

    #[test]
    fn test_discover_all_numeric_paths() {
        let videos = vec![
            Video::new("a", json!({ "x": 1 })),
            Video::new("b", json!({ "y": { "z": 2 } })),
            Video::new("c", json!({ "w": 3 })),
        ];
        let paths = discover_all_numeric_paths(&videos, 2);
        assert_eq!(paths.into_iter().collect::<Vec<_>>(), vec!["x", "y.z"]);
    }
}
