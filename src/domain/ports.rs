use crate::domain::model::{ColumnTypes, ExtractBatch, LoadSummary, Record, TransformResult};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::NaiveDateTime;

/// Operational source database the extraction stage reads from.
#[async_trait]
pub trait SourceStore: Send + Sync {
    async fn fetch_all(&self) -> Result<Vec<Record>>;

    /// Rows created strictly after the watermark.
    async fn fetch_since(&self, watermark: NaiveDateTime) -> Result<Vec<Record>>;
}

/// Staging store between extraction and transformation. A table that has
/// never been written reads as empty.
#[async_trait]
pub trait StagingStore: Send + Sync {
    async fn read_table(&self, table: &str) -> Result<Vec<Record>>;

    async fn replace_table(&self, table: &str, rows: &[Record]) -> Result<()>;

    async fn append_table(&self, table: &str, rows: &[Record]) -> Result<()>;

    /// Max `created_at` across staged customer rows, `None` before the first
    /// ingestion.
    async fn last_ingestion_time(&self) -> Result<Option<NaiveDateTime>>;

    async fn update_last_ingestion_time(&self, table: &str, ingested_at: NaiveDateTime)
        -> Result<()>;
}

/// Destination relational store the consolidated batch is bulk-written to.
#[async_trait]
pub trait DestinationStore: Send + Sync {
    /// Declared column set of a destination table.
    async fn table_columns(&self, table: &str) -> Result<Vec<String>>;

    /// Replace the table contents with `rows` in one atomic swap, applying the
    /// column type flags. Returns the number of rows written.
    async fn replace_rows(
        &self,
        table: &str,
        rows: &[Record],
        column_types: &ColumnTypes,
    ) -> Result<usize>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<ExtractBatch>;
    async fn transform(&self, batch: ExtractBatch) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<LoadSummary>;
}
