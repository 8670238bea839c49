use crate::domain::model::{Category, Record};

/// Column that decides which mapping a record goes through.
pub const DISCRIMINATOR_FIELD: &str = "customer_type";

#[derive(Debug, Default)]
pub struct Partitions {
    pub individual: Vec<Record>,
    pub corporate: Vec<Record>,
    pub unknown: Vec<Record>,
}

/// Partition records by the discriminator column. Rows with an unrecognized,
/// missing, or non-string discriminator land in `unknown`; the caller decides
/// whether to log or reject them.
pub fn classify(records: Vec<Record>, discriminator: &str) -> Partitions {
    let mut partitions = Partitions::default();

    for record in records {
        let category = record
            .get_str(discriminator)
            .map(Category::from_discriminator)
            .unwrap_or(Category::Unknown);

        match category {
            Category::Individual => partitions.individual.push(record),
            Category::Corporate => partitions.corporate.push(record),
            _ => partitions.unknown.push(record),
        }
    }

    partitions
}
