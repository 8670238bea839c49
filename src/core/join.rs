use crate::domain::model::Record;
use std::collections::HashMap;

/// Column the staged rows and the identifier table share.
pub const JOIN_KEY: &str = "customer_code";

/// Left-join staged customer rows with the pre-generated identifier table on
/// `key`. Every non-key column of the matching identifier row is merged into
/// the customer record; rows without a match pass through untouched, so the
/// identifier columns simply stay absent for them.
pub fn attach_identifiers(customers: Vec<Record>, identifiers: &[Record], key: &str) -> Vec<Record> {
    let index: HashMap<&str, &Record> = identifiers
        .iter()
        .filter_map(|row| row.get_str(key).map(|code| (code, row)))
        .collect();

    customers
        .into_iter()
        .map(|mut record| {
            let code = record.get_str(key).map(str::to_string);
            if let Some(identifier_row) = code.as_deref().and_then(|code| index.get(code)) {
                for (field, value) in &identifier_row.data {
                    if field != key {
                        record.insert(field.clone(), value.clone());
                    }
                }
            }
            record
        })
        .collect()
}
