use crate::domain::model::Record;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

/// Canonical timestamp representation columns are normalized to.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];

/// Parse the temporal shapes the staging data actually carries. Bare dates
/// resolve to midnight.
pub fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.naive_utc());
    }

    for format in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(parsed);
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Convert designated temporal columns to the canonical timestamp string.
/// Unparseable values are coerced to null rather than raised; a bad date in
/// one row must not abort the batch.
pub fn normalize_timestamps(records: &mut [Record], columns: &[&str]) {
    for record in records.iter_mut() {
        for column in columns {
            if let Some(value) = record.data.get_mut(*column) {
                let normalized = match value {
                    Value::String(raw) => parse_datetime(raw)
                        .map(|ts| Value::String(ts.format(TIMESTAMP_FORMAT).to_string()))
                        .unwrap_or(Value::Null),
                    _ => Value::Null,
                };
                *value = normalized;
            }
        }
    }
}

/// Convert designated identifier columns to their string representation, for
/// destinations that declare them textual. Nulls stay null.
pub fn stringify_columns(records: &mut [Record], columns: &[&str]) {
    for record in records.iter_mut() {
        for column in columns {
            if let Some(value) = record.data.get_mut(*column) {
                let text = match value {
                    Value::Null | Value::String(_) => continue,
                    Value::Number(n) => n.to_string(),
                    Value::Bool(b) => b.to_string(),
                    ref other => other.to_string(),
                };
                *value = Value::String(text);
            }
        }
    }
}
