use crate::domain::model::{ColumnType, ColumnTypes, Record};
use crate::domain::ports::DestinationStore;
use crate::utils::error::{EtlError, Result};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Destination store backed by a directory of JSON-lines tables.
///
/// Each table declares its column set in `<table>.columns.json` (the file
/// counterpart of an `information_schema` lookup) and holds its rows in
/// `<table>.jsonl`. `replace_rows` writes to a temp file and renames it into
/// place, so readers never observe the empty-table window a
/// truncate-then-insert sequence would expose.
#[derive(Clone)]
pub struct JsonlDestinationStore {
    dir: PathBuf,
}

impl JsonlDestinationStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn columns_path(&self, table: &str) -> PathBuf {
        self.dir.join(format!("{table}.columns.json"))
    }

    fn table_path(&self, table: &str) -> PathBuf {
        self.dir.join(format!("{table}.jsonl"))
    }

    fn check_value(column: &str, value: &Value, column_type: ColumnType) -> Result<()> {
        match column_type {
            ColumnType::Uuid => match value {
                Value::Null => Ok(()),
                Value::String(s) if s.is_empty() => Ok(()),
                Value::String(s) => Uuid::parse_str(s).map(|_| ()).map_err(|_| {
                    EtlError::storage(format!("column {column} holds non-UUID value '{s}'"))
                }),
                _ => Err(EtlError::storage(format!(
                    "column {column} expects a UUID string"
                ))),
            },
            ColumnType::Jsonb => match value {
                Value::Null | Value::Object(_) | Value::Array(_) => Ok(()),
                _ => Err(EtlError::storage(format!(
                    "column {column} expects a structured JSON value"
                ))),
            },
        }
    }

    /// Rows currently stored for a table; empty when never written.
    pub fn read_rows(&self, table: &str) -> Result<Vec<Record>> {
        let path = self.table_path(table);
        if !path.exists() {
            return Ok(Vec::new());
        }

        let contents = std::fs::read_to_string(path)?;
        let mut rows = Vec::new();
        for line in contents.lines().filter(|line| !line.trim().is_empty()) {
            let data: Map<String, Value> = serde_json::from_str(line)?;
            rows.push(Record {
                data: data.into_iter().collect(),
            });
        }
        Ok(rows)
    }
}

#[async_trait]
impl DestinationStore for JsonlDestinationStore {
    async fn table_columns(&self, table: &str) -> Result<Vec<String>> {
        let path = self.columns_path(table);
        if !path.exists() {
            return Err(EtlError::storage(format!(
                "destination table {table} has no declared columns at {}",
                path.display()
            )));
        }
        let contents = std::fs::read_to_string(path)?;
        let columns: Vec<String> = serde_json::from_str(&contents)?;
        Ok(columns)
    }

    async fn replace_rows(
        &self,
        table: &str,
        rows: &[Record],
        column_types: &ColumnTypes,
    ) -> Result<usize> {
        let columns = self.table_columns(table).await?;
        std::fs::create_dir_all(&self.dir)?;

        let tmp_path = self.dir.join(format!("{table}.jsonl.tmp"));
        {
            let file = std::fs::File::create(&tmp_path)?;
            let mut writer = std::io::BufWriter::new(file);
            for row in rows {
                // Emit columns in declared order; field order inside the
                // document column is already fixed by the builder.
                let mut line = Map::with_capacity(columns.len());
                for column in &columns {
                    let value = row.get(column).cloned().unwrap_or(Value::Null);
                    if let Some(column_type) = column_types.get(column) {
                        Self::check_value(column, &value, *column_type)?;
                    }
                    line.insert(column.clone(), value);
                }
                serde_json::to_writer(&mut writer, &Value::Object(line))?;
                writer.write_all(b"\n")?;
            }
            writer.flush()?;
        }
        atomic_swap(&tmp_path, &self.table_path(table))?;

        tracing::debug!("Wrote {} rows to {}", rows.len(), table);
        Ok(rows.len())
    }
}

fn atomic_swap(tmp: &Path, target: &Path) -> Result<()> {
    std::fs::rename(tmp, target)?;
    Ok(())
}
