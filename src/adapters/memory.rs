//! In-memory store implementations for pipeline tests.

use crate::core::normalize::parse_datetime;
use crate::core::staging_pipeline::{SOURCE_CREATED_AT, STG_CUSTOMERS_TABLE};
use crate::domain::model::{ColumnTypes, Record};
use crate::domain::ports::{DestinationStore, SourceStore, StagingStore};
use crate::utils::error::{EtlError, Result};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct MemorySource {
    rows: Vec<Record>,
}

impl MemorySource {
    pub fn new(rows: Vec<Record>) -> Self {
        Self { rows }
    }
}

#[async_trait]
impl SourceStore for MemorySource {
    async fn fetch_all(&self) -> Result<Vec<Record>> {
        Ok(self.rows.clone())
    }

    async fn fetch_since(&self, watermark: NaiveDateTime) -> Result<Vec<Record>> {
        Ok(self
            .rows
            .iter()
            .filter(|row| {
                row.get_str(SOURCE_CREATED_AT)
                    .and_then(parse_datetime)
                    .map(|created_at| created_at > watermark)
                    .unwrap_or(false)
            })
            .cloned()
            .collect())
    }
}

#[derive(Clone, Default)]
pub struct MemoryStaging {
    tables: Arc<Mutex<HashMap<String, Vec<Record>>>>,
    watermark: Arc<Mutex<Option<NaiveDateTime>>>,
}

impl MemoryStaging {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn recorded_watermark(&self) -> Option<NaiveDateTime> {
        *self.watermark.lock().await
    }
}

#[async_trait]
impl StagingStore for MemoryStaging {
    async fn read_table(&self, table: &str) -> Result<Vec<Record>> {
        let tables = self.tables.lock().await;
        Ok(tables.get(table).cloned().unwrap_or_default())
    }

    async fn replace_table(&self, table: &str, rows: &[Record]) -> Result<()> {
        let mut tables = self.tables.lock().await;
        tables.insert(table.to_string(), rows.to_vec());
        Ok(())
    }

    async fn append_table(&self, table: &str, rows: &[Record]) -> Result<()> {
        let mut tables = self.tables.lock().await;
        tables
            .entry(table.to_string())
            .or_default()
            .extend_from_slice(rows);
        Ok(())
    }

    async fn last_ingestion_time(&self) -> Result<Option<NaiveDateTime>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .get(STG_CUSTOMERS_TABLE)
            .into_iter()
            .flatten()
            .filter_map(|row| row.get_str(SOURCE_CREATED_AT))
            .filter_map(parse_datetime)
            .max())
    }

    async fn update_last_ingestion_time(
        &self,
        _table: &str,
        ingested_at: NaiveDateTime,
    ) -> Result<()> {
        *self.watermark.lock().await = Some(ingested_at);
        Ok(())
    }
}

#[derive(Clone)]
pub struct MemoryDestination {
    columns: Arc<HashMap<String, Vec<String>>>,
    tables: Arc<Mutex<HashMap<String, Vec<Record>>>>,
}

impl MemoryDestination {
    pub fn with_columns(table: &str, columns: &[&str]) -> Self {
        let mut declared = HashMap::new();
        declared.insert(
            table.to_string(),
            columns.iter().map(|c| c.to_string()).collect(),
        );
        Self {
            columns: Arc::new(declared),
            tables: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub async fn rows(&self, table: &str) -> Vec<Record> {
        let tables = self.tables.lock().await;
        tables.get(table).cloned().unwrap_or_default()
    }
}

#[async_trait]
impl DestinationStore for MemoryDestination {
    async fn table_columns(&self, table: &str) -> Result<Vec<String>> {
        self.columns
            .get(table)
            .cloned()
            .ok_or_else(|| EtlError::storage(format!("no declared columns for table {table}")))
    }

    async fn replace_rows(
        &self,
        table: &str,
        rows: &[Record],
        _column_types: &ColumnTypes,
    ) -> Result<usize> {
        let mut tables = self.tables.lock().await;
        tables.insert(table.to_string(), rows.to_vec());
        Ok(rows.len())
    }
}
