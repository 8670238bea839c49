use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single row keyed by field name. Values keep whatever JSON shape the
/// source handed us; a missing SQL value reads as `Value::Null`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Record {
    pub data: HashMap<String, serde_json::Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: &str) -> Option<&serde_json::Value> {
        self.data.get(field)
    }

    /// Field value as a string slice, when it is one.
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.data.get(field).and_then(serde_json::Value::as_str)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: serde_json::Value) {
        self.data.insert(field.into(), value);
    }
}

/// Processing category a record belongs to. `Unified` is the whole-batch
/// category of the core customer table; `Unknown` is the explicit variant for
/// discriminator values nothing recognizes, so callers can count and log the
/// drop instead of having rows silently vanish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Individual,
    Corporate,
    Unified,
    Unknown,
}

impl Category {
    pub fn from_discriminator(value: &str) -> Self {
        match value {
            "Individual" => Category::Individual,
            "SME" => Category::Corporate,
            _ => Category::Unknown,
        }
    }
}

/// What extraction hands to transform: the staged customer rows plus the
/// pre-generated identifier table they join against. Staging-bound pipelines
/// leave `identifiers` empty.
#[derive(Debug, Clone, Default)]
pub struct ExtractBatch {
    pub customers: Vec<Record>,
    pub identifiers: Vec<Record>,
}

/// Per-category row counts of a transform run, reported for logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryBreakdown {
    pub individual: usize,
    pub corporate: usize,
    pub unified: usize,
    pub dropped: usize,
}

impl CategoryBreakdown {
    /// Rows that made it into the consolidated output.
    pub fn total(&self) -> usize {
        self.individual + self.corporate + self.unified
    }
}

#[derive(Debug, Clone, Default)]
pub struct TransformResult {
    pub records: Vec<Record>,
    pub breakdown: CategoryBreakdown,
}

#[derive(Debug, Clone)]
pub struct LoadSummary {
    pub table: String,
    pub rows_inserted: usize,
    pub breakdown: CategoryBreakdown,
}

/// Storage type flag for destination columns that need more than plain text,
/// the dtype map handed to the bulk writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Uuid,
    Jsonb,
}

pub type ColumnTypes = HashMap<String, ColumnType>;
