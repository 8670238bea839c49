use crate::domain::model::{Category, CategoryBreakdown, Record};

/// Merge per-category outputs back into one result set.
///
/// Partitions are concatenated in the order given, ordering within each
/// partition untouched; the output `Vec` position is the freshly assigned
/// contiguous zero-based row index. `Unknown` partitions are excluded from
/// the output and counted into `breakdown.dropped`.
pub fn consolidate(parts: Vec<(Category, Vec<Record>)>) -> (Vec<Record>, CategoryBreakdown) {
    let mut breakdown = CategoryBreakdown::default();
    let mut records = Vec::new();

    for (category, mut part) in parts {
        match category {
            Category::Individual => breakdown.individual += part.len(),
            Category::Corporate => breakdown.corporate += part.len(),
            Category::Unified => breakdown.unified += part.len(),
            Category::Unknown => {
                breakdown.dropped += part.len();
                continue;
            }
        }
        records.append(&mut part);
    }

    (records, breakdown)
}
