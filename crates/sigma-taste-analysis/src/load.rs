//! Reading dataset exports from disk.
//!
//! Video files hold either `{ "videos": [...] }` or a bare array of videos.
//! Comparison files follow the same convention with `comparisons`. A combined
//! store file carries both keys.

use std::{fs::File, io::BufReader, path::Path};

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{comparison::Comparison, store::TasteStore, video::Video};

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum LoadError {
    #[display("failed to read dataset file")]
    Io(std::io::Error),
    #[display("invalid dataset JSON")]
    Parse(serde_json::Error),
    #[display("unknown format: expected an array or an object with a `{key}` array")]
    #[from(ignore)]
    UnknownFormat { key: &'static str },
}

fn read_value(path: &Path) -> Result<Value, LoadError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    Ok(serde_json::from_reader(reader)?)
}

fn list_from_json<T: DeserializeOwned>(value: Value, key: &'static str) -> Result<Vec<T>, LoadError> {
    let list = match value {
        Value::Array(_) => value,
        Value::Object(mut map) => match map.remove(key) {
            Some(list @ Value::Array(_)) => list,
            _ => return Err(LoadError::UnknownFormat { key }),
        },
        _ => return Err(LoadError::UnknownFormat { key }),
    };
    Ok(serde_json::from_value(list)?)
}

/// Parses videos from an already-decoded document.
pub fn videos_from_json(value: Value) -> Result<Vec<Video>, LoadError> {
    let videos: Vec<Video> = list_from_json(value, "videos")?;
    if let Some(version) = videos.first().and_then(Video::schema_version) {
        tracing::info!(%version, count = videos.len(), "loaded videos");
    } else {
        tracing::info!(count = videos.len(), "loaded videos");
    }
    Ok(videos)
}

/// Parses comparisons from an already-decoded document.
pub fn comparisons_from_json(value: Value) -> Result<Vec<Comparison>, LoadError> {
    let comparisons: Vec<Comparison> = list_from_json(value, "comparisons")?;
    tracing::info!(count = comparisons.len(), "loaded comparisons");
    Ok(comparisons)
}

/// Parses a combined document. Either key may be absent.
pub fn store_from_json(mut value: Value) -> Result<TasteStore, LoadError> {
    let Some(map) = value.as_object_mut() else {
        return Err(LoadError::UnknownFormat { key: "videos" });
    };
    let videos = match map.remove("videos") {
        Some(v) => videos_from_json(v)?,
        None => vec![],
    };
    let comparisons = match map.remove("comparisons") {
        Some(c) => comparisons_from_json(c)?,
        None => vec![],
    };
    Ok(TasteStore::new(videos, comparisons))
}

pub fn load_videos<P: AsRef<Path>>(path: P) -> Result<Vec<Video>, LoadError> {
    videos_from_json(read_value(path.as_ref())?)
}

pub fn load_comparisons<P: AsRef<Path>>(path: P) -> Result<Vec<Comparison>, LoadError> {
    comparisons_from_json(read_value(path.as_ref())?)
}

pub fn load_store<P: AsRef<Path>>(path: P) -> Result<TasteStore, LoadError> {
    store_from_json(read_value(path.as_ref())?)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_videos_wrapped_and_bare() {
        let wrapped = videos_from_json(json!({ "videos": [{ "id": "a" }] })).unwrap();
        let bare = videos_from_json(json!([{ "id": "a" }, { "id": "b" }])).unwrap();
        assert_eq!(wrapped.len(), 1);
        assert_eq!(bare.len(), 2);
    }

    #[test]
    fn test_schema_version_is_not_injected() {
        let videos = videos_from_json(json!([
            { "id": "a", "deep_analysis": { "visual": { "hookStrength": 7 } } },
            { "id": "b", "deep_analysis": { "schema_version": 2 } }
        ]))
        .unwrap();
        assert_eq!(videos[0].schema_version(), None);
        assert_eq!(videos[1].schema_version(), Some(&json!(2)));
    }

    #[test]
    fn test_unknown_format() {
        let err = videos_from_json(json!({ "items": [] })).unwrap_err();
        assert!(matches!(err, LoadError::UnknownFormat { key: "videos" }));
        let err = comparisons_from_json(json!("nope")).unwrap_err();
        assert!(matches!(err, LoadError::UnknownFormat { key: "comparisons" }));
    }

    #[test]
    fn test_malformed_record_is_parse_error() {
        let err = comparisons_from_json(json!([{ "id": "c1" }])).unwrap_err();
        assert!(matches!(err, LoadError::Parse(_)));
    }

    #[test]
    fn test_null_rating_fields_read_as_defaults() {
        let videos = videos_from_json(json!([{
            "id": "a",
            "rating": {
                "overall_score": 0.5,
                "notes": null,
                "tags": null,
                "dimensions": null,
                "rater_id": null
            }
        }, {
            "id": "b",
            "rating": {
                "overall_score": null,
                "tags": ["funny", null, 3],
                "dimensions": { "hook": 0.8, "pacing": null }
            }
        }]))
        .unwrap();
        let a = videos[0].rating.as_ref().unwrap();
        assert_eq!(a.overall_score, Some(0.5));
        assert!(a.notes.is_empty());
        assert!(a.tags.is_empty());
        assert!(a.dimensions.is_empty());
        assert_eq!(a.rater_id, None);

        let b = videos[1].rating.as_ref().unwrap();
        assert_eq!(b.overall_score, None);
        assert_eq!(b.tags, vec!["funny"]);
        assert_eq!(b.dimensions.len(), 1);
        assert_eq!(b.dimensions["hook"], 0.8);
    }

    #[test]
    fn test_timestamps_without_timezone_are_utc() {
        let videos = videos_from_json(json!([
            { "id": "a", "created_at": "2025-12-18 10:00:00" },
            { "id": "b", "created_at": "not a date", "analyzed_at": 42 }
        ]))
        .unwrap();
        let created = videos[0].created_at.unwrap();
        assert_eq!(created.to_rfc3339(), "2025-12-18T10:00:00+00:00");
        assert_eq!(videos[0].analyzed_at, Some(created));
        assert_eq!(videos[1].created_at, None);
        assert_eq!(videos[1].analyzed_at, None);

        let comparisons = comparisons_from_json(json!([{
            "id": "c1",
            "video_a_id": "a",
            "video_b_id": "b",
            "winner_id": "a",
            "created_at": "2025-12-18T10:00:00"
        }]))
        .unwrap();
        assert_eq!(comparisons[0].created_at, Some(created));
    }

    #[test]
    fn test_store_from_json() {
        let store = store_from_json(json!({
            "comparisons": [{ "id": "c1", "video_a_id": "a", "video_b_id": "b", "winner_id": "a" }]
        }))
        .unwrap();
        assert!(store.videos().is_empty());
        assert_eq!(store.comparisons().len(), 1);
    }
}
