//! Lenient timestamp parsing for dataset exports.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;

/// Formats tried, in order, for timestamps that carry an explicit offset
/// but are not RFC 3339.
const OFFSET_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f%#z", "%Y-%m-%dT%H:%M:%S%.f%#z"];

/// Formats tried for timestamps without a timezone; these are read as UTC.
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parses a timestamp string, returning `None` when no known format matches.
pub(crate) fn parse(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    OFFSET_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(s, fmt).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|| {
            NAIVE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|naive| naive.and_utc())
        })
}

/// Reads an optional JSON timestamp. Non-strings and unparseable strings
/// yield `None`.
pub(crate) fn from_value(value: Option<&Value>) -> Option<DateTime<Utc>> {
    let raw = value.and_then(Value::as_str)?;
    let parsed = parse(raw);
    if parsed.is_none() {
        tracing::debug!(timestamp = raw, "ignoring unparseable timestamp");
    }
    parsed
}
