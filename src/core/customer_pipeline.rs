use crate::core::mapping::MappingSpec;
use crate::core::staging_pipeline::{CUSTOMER_UUIDS_TABLE, STG_CUSTOMERS_TABLE};
use crate::core::{consolidate, join, normalize, project};
use crate::domain::model::{
    Category, ColumnType, ColumnTypes, ExtractBatch, LoadSummary, TransformResult,
};
use crate::domain::ports::{DestinationStore, Pipeline, StagingStore};
use crate::utils::error::Result;
use async_trait::async_trait;

pub const CUSTOMER_TABLE: &str = "customer";

/// Temporal columns normalized before persistence.
pub const DATETIME_COLUMNS: &[&str] = &["createdAt", "updatedAt"];

const UUID_COLUMNS: &[&str] = &[
    "customerId",
    "tenantId",
    "approverId",
    "initiatorId",
    "branchId",
];

fn column_types() -> ColumnTypes {
    UUID_COLUMNS
        .iter()
        .map(|column| (column.to_string(), ColumnType::Uuid))
        .collect()
}

/// Migrates staged rows into the core `customer` table: one unified mapping,
/// no category split.
pub struct CustomerPipeline<S: StagingStore, D: DestinationStore> {
    staging: S,
    destination: D,
    spec: MappingSpec,
}

impl<S: StagingStore, D: DestinationStore> CustomerPipeline<S, D> {
    pub fn new(staging: S, destination: D, spec: MappingSpec) -> Self {
        Self {
            staging,
            destination,
            spec,
        }
    }
}

#[async_trait]
impl<S: StagingStore, D: DestinationStore> Pipeline for CustomerPipeline<S, D> {
    async fn extract(&self) -> Result<ExtractBatch> {
        let customers = self.staging.read_table(STG_CUSTOMERS_TABLE).await?;
        let identifiers = self.staging.read_table(CUSTOMER_UUIDS_TABLE).await?;
        Ok(ExtractBatch {
            customers,
            identifiers,
        })
    }

    async fn transform(&self, batch: ExtractBatch) -> Result<TransformResult> {
        let joined = join::attach_identifiers(batch.customers, &batch.identifiers, join::JOIN_KEY);
        let mut projected = project::project(joined, &self.spec);
        normalize::normalize_timestamps(&mut projected, DATETIME_COLUMNS);

        let (records, breakdown) =
            consolidate::consolidate(vec![(Category::Unified, projected)]);
        Ok(TransformResult { records, breakdown })
    }

    async fn load(&self, result: TransformResult) -> Result<LoadSummary> {
        let columns = self.destination.table_columns(CUSTOMER_TABLE).await?;
        let rows = project::conform_to_columns(result.records, &columns);
        let rows_inserted = self
            .destination
            .replace_rows(CUSTOMER_TABLE, &rows, &column_types())
            .await?;

        Ok(LoadSummary {
            table: CUSTOMER_TABLE.to_string(),
            rows_inserted,
            breakdown: result.breakdown,
        })
    }
}
