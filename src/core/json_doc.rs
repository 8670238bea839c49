use crate::core::normalize::parse_datetime;
use crate::domain::model::Record;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Destination column the built document lands in.
pub const PROFILE_DATA_FIELD: &str = "customerProfileData";

/// Build the ordered profile document for one record.
///
/// Keys appear in exactly the order of `fields`, no extra keys, no missing
/// keys: every listed field resolves to the record's value, else the
/// category's default, else `""`. Date-like strings are normalized to
/// `YYYY-MM-DD` and nulls to `""` so the stored document never carries a
/// native null marker. Construction is total; no input value can fail it.
pub fn build_document(
    record: &Record,
    fields: &[String],
    defaults: &HashMap<String, Value>,
) -> Value {
    let mut document = Map::with_capacity(fields.len());

    for field in fields {
        let value = record
            .get(field)
            .cloned()
            .or_else(|| defaults.get(field).cloned())
            .unwrap_or_else(|| Value::String(String::new()));
        document.insert(field.clone(), normalize_document_value(value));
    }

    Value::Object(document)
}

fn normalize_document_value(value: Value) -> Value {
    match value {
        Value::Null => Value::String(String::new()),
        Value::String(raw) => match parse_datetime(&raw) {
            Some(ts) => Value::String(ts.format("%Y-%m-%d").to_string()),
            None => Value::String(raw),
        },
        // Numbers, booleans, arrays and nested objects are already
        // JSON-primitive-compatible and pass through unchanged.
        other => other,
    }
}
