use crate::core::mapping::MappingSpec;
use crate::domain::model::Record;
use serde_json::Value;
use std::collections::HashMap;

/// Project a partition through its mapping: rename source fields, fill every
/// required destination field that is absent after the rename, and restrict
/// each record to exactly the required set.
///
/// A required field with no source value and no declared default resolves to
/// an empty string; a field whose sheet row declared an explicit null default
/// resolves to null. Row count is preserved one-to-one.
pub fn project(records: Vec<Record>, spec: &MappingSpec) -> Vec<Record> {
    let required = spec.destination_fields();

    records
        .into_iter()
        .map(|record| {
            let mut renamed: HashMap<String, Value> = HashMap::with_capacity(record.data.len());
            for (field, value) in record.data {
                let destination = spec.rename.get(&field).cloned().unwrap_or(field);
                renamed.insert(destination, value);
            }

            let mut projected = Record::new();
            for field in &required {
                let value = renamed.remove(field).unwrap_or_else(|| {
                    spec.defaults
                        .get(field)
                        .cloned()
                        .unwrap_or_else(|| Value::String(String::new()))
                });
                projected.insert(field.clone(), value);
            }
            projected
        })
        .collect()
}

/// Load-side projection against the destination table's declared column set:
/// extra columns are dropped, missing columns are filled with null.
pub fn conform_to_columns(records: Vec<Record>, columns: &[String]) -> Vec<Record> {
    records
        .into_iter()
        .map(|mut record| {
            let mut conformed = Record::new();
            for column in columns {
                let value = record.data.remove(column).unwrap_or(Value::Null);
                conformed.insert(column.clone(), value);
            }
            conformed
        })
        .collect()
}
