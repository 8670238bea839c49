use crate::core::normalize::{parse_datetime, TIMESTAMP_FORMAT};
use crate::core::staging_pipeline::{SOURCE_CREATED_AT, STG_CUSTOMERS_TABLE};
use crate::domain::model::Record;
use crate::domain::ports::{SourceStore, StagingStore};
use crate::utils::error::{EtlError, Result};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Read a CSV table into records. Empty cells read as JSON null, the file
/// adapter's stand-in for SQL NULL.
pub(crate) fn read_csv(path: &Path) -> Result<Vec<Record>> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let mut record = Record::new();
        for (header, cell) in headers.iter().zip(row.iter()) {
            let value = if cell.is_empty() {
                Value::Null
            } else {
                Value::String(cell.to_string())
            };
            record.insert(header.to_string(), value);
        }
        records.push(record);
    }
    Ok(records)
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Header for a written table: the sorted union of columns across the batch.
/// Consumers address columns by name, so a stable order is all that matters.
fn column_order(rows: &[Record]) -> Vec<String> {
    let mut columns: Vec<String> = rows
        .iter()
        .flat_map(|row| row.data.keys().cloned())
        .collect();
    columns.sort();
    columns.dedup();
    columns
}

fn write_csv(path: &Path, rows: &[Record]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let columns = column_order(rows);
    if columns.is_empty() {
        // Nothing to describe a header with; an empty file reads back as an
        // empty table.
        std::fs::write(path, b"")?;
        return Ok(());
    }

    let tmp_path = path.with_extension("csv.tmp");
    {
        let mut writer = csv::Writer::from_path(&tmp_path)?;
        writer.write_record(&columns)?;
        for row in rows {
            let cells: Vec<String> = columns
                .iter()
                .map(|column| row.get(column).map(cell_text).unwrap_or_default())
                .collect();
            writer.write_record(&cells)?;
        }
        writer.flush()?;
    }
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}

/// Operational source backed by a single CSV extract.
pub struct CsvSourceStore {
    path: PathBuf,
}

impl CsvSourceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SourceStore for CsvSourceStore {
    async fn fetch_all(&self) -> Result<Vec<Record>> {
        read_csv(&self.path)
    }

    async fn fetch_since(&self, watermark: NaiveDateTime) -> Result<Vec<Record>> {
        let rows = read_csv(&self.path)?;
        Ok(rows
            .into_iter()
            .filter(|row| {
                row.get_str(SOURCE_CREATED_AT)
                    .and_then(parse_datetime)
                    .map(|created_at| created_at > watermark)
                    .unwrap_or(false)
            })
            .collect())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct IngestionLogEntry {
    table_name: String,
    last_ingested_at: String,
    last_updated_at: String,
}

const INGESTION_LOG_FILE: &str = "ingestion_incremental_log.json";

/// Staging store backed by a directory of CSV files, one per table. A table
/// that has never been written reads as empty, so a first full load starts
/// from a bare directory.
#[derive(Clone)]
pub struct CsvStagingStore {
    dir: PathBuf,
}

impl CsvStagingStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn table_path(&self, table: &str) -> PathBuf {
        self.dir.join(format!("{table}.csv"))
    }
}

#[async_trait]
impl StagingStore for CsvStagingStore {
    async fn read_table(&self, table: &str) -> Result<Vec<Record>> {
        let path = self.table_path(table);
        if !path.exists() {
            return Ok(Vec::new());
        }
        read_csv(&path)
    }

    async fn replace_table(&self, table: &str, rows: &[Record]) -> Result<()> {
        write_csv(&self.table_path(table), rows)
    }

    async fn append_table(&self, table: &str, rows: &[Record]) -> Result<()> {
        let mut existing = self.read_table(table).await?;
        existing.extend_from_slice(rows);
        write_csv(&self.table_path(table), &existing)
    }

    async fn last_ingestion_time(&self) -> Result<Option<NaiveDateTime>> {
        let rows = self.read_table(STG_CUSTOMERS_TABLE).await?;
        Ok(rows
            .iter()
            .filter_map(|row| row.get_str(SOURCE_CREATED_AT))
            .filter_map(parse_datetime)
            .max())
    }

    async fn update_last_ingestion_time(
        &self,
        table: &str,
        ingested_at: NaiveDateTime,
    ) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let entry = IngestionLogEntry {
            table_name: table.to_string(),
            last_ingested_at: ingested_at.format(TIMESTAMP_FORMAT).to_string(),
            last_updated_at: chrono::Utc::now()
                .naive_utc()
                .format(TIMESTAMP_FORMAT)
                .to_string(),
        };
        let path = self.dir.join(INGESTION_LOG_FILE);
        let contents = serde_json::to_string_pretty(&entry)?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}

impl CsvStagingStore {
    /// The recorded ingestion log entry, if a watermark was ever written.
    pub fn ingestion_log(&self) -> Result<Option<(String, NaiveDateTime)>> {
        let path = self.dir.join(INGESTION_LOG_FILE);
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(path)?;
        let entry: IngestionLogEntry = serde_json::from_str(&contents)?;
        let ingested_at = parse_datetime(&entry.last_ingested_at).ok_or_else(|| {
            EtlError::storage(format!(
                "ingestion log holds unparseable timestamp '{}'",
                entry.last_ingested_at
            ))
        })?;
        Ok(Some((entry.table_name, ingested_at)))
    }
}
