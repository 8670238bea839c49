use crate::core::{join, normalize};
use crate::domain::model::{ExtractBatch, LoadSummary, Record, TransformResult};
use crate::domain::ports::{Pipeline, SourceStore, StagingStore};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde_json::json;
use std::collections::HashSet;
use uuid::Uuid;

pub const STG_CUSTOMERS_TABLE: &str = "stg_customers";
pub const CUSTOMER_UUIDS_TABLE: &str = "customer_uuids";

/// Source-side temporal column the incremental watermark is computed from.
pub const SOURCE_CREATED_AT: &str = "created_at";

/// Every staged customer code needs a row in the identifier table before the
/// transform stage joins against it. Generates a fresh UUID for codes seen
/// for the first time; pre-generated identifiers are never touched.
async fn seed_identifiers<St: StagingStore>(staging: &St, records: &[Record]) -> Result<usize> {
    let existing = staging.read_table(CUSTOMER_UUIDS_TABLE).await?;
    let mut known: HashSet<String> = existing
        .iter()
        .filter_map(|row| row.get_str(join::JOIN_KEY))
        .map(str::to_string)
        .collect();

    let mut new_rows = Vec::new();
    for record in records {
        if let Some(code) = record.get_str(join::JOIN_KEY) {
            if known.insert(code.to_string()) {
                let mut row = Record::new();
                row.insert(join::JOIN_KEY, json!(code));
                row.insert("customerId", json!(Uuid::new_v4().to_string()));
                new_rows.push(row);
            }
        }
    }

    if !new_rows.is_empty() {
        staging.append_table(CUSTOMER_UUIDS_TABLE, &new_rows).await?;
    }
    Ok(new_rows.len())
}

fn max_created_at(records: &[Record]) -> Option<NaiveDateTime> {
    records
        .iter()
        .filter_map(|record| record.get_str(SOURCE_CREATED_AT))
        .filter_map(normalize::parse_datetime)
        .max()
}

/// Replaces the staging table with a full extraction of the source.
pub struct FullLoadPipeline<Src: SourceStore, St: StagingStore> {
    source: Src,
    staging: St,
}

impl<Src: SourceStore, St: StagingStore> FullLoadPipeline<Src, St> {
    pub fn new(source: Src, staging: St) -> Self {
        Self { source, staging }
    }
}

#[async_trait]
impl<Src: SourceStore, St: StagingStore> Pipeline for FullLoadPipeline<Src, St> {
    async fn extract(&self) -> Result<ExtractBatch> {
        let customers = self.source.fetch_all().await?;
        Ok(ExtractBatch {
            customers,
            identifiers: Vec::new(),
        })
    }

    // Extraction lands in staging as-is; transformation happens in the
    // table-specific migration runs.
    async fn transform(&self, batch: ExtractBatch) -> Result<TransformResult> {
        let mut result = TransformResult::default();
        result.breakdown.unified = batch.customers.len();
        result.records = batch.customers;
        Ok(result)
    }

    async fn load(&self, result: TransformResult) -> Result<LoadSummary> {
        self.staging
            .replace_table(STG_CUSTOMERS_TABLE, &result.records)
            .await?;

        let seeded = seed_identifiers(&self.staging, &result.records).await?;
        if seeded > 0 {
            tracing::info!("Seeded {} new customer identifiers", seeded);
        }

        Ok(LoadSummary {
            table: STG_CUSTOMERS_TABLE.to_string(),
            rows_inserted: result.records.len(),
            breakdown: result.breakdown,
        })
    }
}

/// Appends only the rows created since the last ingestion, then advances the
/// watermark. Falls back to a full extraction when no watermark exists yet.
pub struct IncrementalLoadPipeline<Src: SourceStore, St: StagingStore> {
    source: Src,
    staging: St,
}

impl<Src: SourceStore, St: StagingStore> IncrementalLoadPipeline<Src, St> {
    pub fn new(source: Src, staging: St) -> Self {
        Self { source, staging }
    }
}

#[async_trait]
impl<Src: SourceStore, St: StagingStore> Pipeline for IncrementalLoadPipeline<Src, St> {
    async fn extract(&self) -> Result<ExtractBatch> {
        let customers = match self.staging.last_ingestion_time().await? {
            Some(watermark) => {
                tracing::info!("Last ingestion time: {}", watermark);
                self.source.fetch_since(watermark).await?
            }
            None => {
                tracing::info!("No previous ingestion found, performing full extraction");
                self.source.fetch_all().await?
            }
        };

        Ok(ExtractBatch {
            customers,
            identifiers: Vec::new(),
        })
    }

    async fn transform(&self, batch: ExtractBatch) -> Result<TransformResult> {
        let mut result = TransformResult::default();
        result.breakdown.unified = batch.customers.len();
        result.records = batch.customers;
        Ok(result)
    }

    async fn load(&self, result: TransformResult) -> Result<LoadSummary> {
        self.staging
            .append_table(STG_CUSTOMERS_TABLE, &result.records)
            .await?;

        let seeded = seed_identifiers(&self.staging, &result.records).await?;
        if seeded > 0 {
            tracing::info!("Seeded {} new customer identifiers", seeded);
        }

        // Advance the watermark to the newest loaded row; an empty batch
        // keeps the previous watermark.
        let watermark = match max_created_at(&result.records) {
            Some(ts) => Some(ts),
            None => self.staging.last_ingestion_time().await?,
        };
        if let Some(watermark) = watermark {
            tracing::info!("Updating last ingestion time to: {}", watermark);
            self.staging
                .update_last_ingestion_time(STG_CUSTOMERS_TABLE, watermark)
                .await?;
        }

        Ok(LoadSummary {
            table: STG_CUSTOMERS_TABLE.to_string(),
            rows_inserted: result.records.len(),
            breakdown: result.breakdown,
        })
    }
}
