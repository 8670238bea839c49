use crate::core::classify::{self, DISCRIMINATOR_FIELD};
use crate::core::customer_pipeline::DATETIME_COLUMNS;
use crate::core::json_doc::{self, PROFILE_DATA_FIELD};
use crate::core::mapping::MappingSpec;
use crate::core::staging_pipeline::{CUSTOMER_UUIDS_TABLE, STG_CUSTOMERS_TABLE};
use crate::core::{consolidate, join, normalize, project};
use crate::domain::model::{
    Category, ColumnType, ColumnTypes, ExtractBatch, LoadSummary, Record, TransformResult,
};
use crate::domain::ports::{DestinationStore, Pipeline, StagingStore};
use crate::utils::error::Result;
use async_trait::async_trait;

pub const CUSTOMER_PROFILE_TABLE: &str = "customer_profile";

/// Identifier columns the destination declares textual.
const INT_TO_STRING_COLUMNS: &[&str] = &["customerNumber", "bvn"];

fn column_types() -> ColumnTypes {
    let mut types = ColumnTypes::new();
    types.insert("customerId".to_string(), ColumnType::Uuid);
    types.insert("customerProfileId".to_string(), ColumnType::Uuid);
    types.insert(PROFILE_DATA_FIELD.to_string(), ColumnType::Jsonb);
    types
}

/// Migrates staged rows into the `customer_profile` table: records are split
/// Individual vs Corporate, each category goes through its own mapping, and
/// every row gains an ordered JSON profile document.
pub struct ProfilePipeline<S: StagingStore, D: DestinationStore> {
    staging: S,
    destination: D,
    individual: MappingSpec,
    corporate: MappingSpec,
}

impl<S: StagingStore, D: DestinationStore> ProfilePipeline<S, D> {
    pub fn new(staging: S, destination: D, individual: MappingSpec, corporate: MappingSpec) -> Self {
        Self {
            staging,
            destination,
            individual,
            corporate,
        }
    }

    fn transform_partition(records: Vec<Record>, spec: &MappingSpec) -> Vec<Record> {
        let mut projected = project::project(records, spec);
        for record in &mut projected {
            let document = json_doc::build_document(record, &spec.json_field_order, &spec.defaults);
            record.insert(PROFILE_DATA_FIELD, document);
        }
        projected
    }
}

#[async_trait]
impl<S: StagingStore, D: DestinationStore> Pipeline for ProfilePipeline<S, D> {
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
        let partitions = classify::classify(joined, DISCRIMINATOR_FIELD);

        if !partitions.unknown.is_empty() {
            tracing::warn!(
                "Dropping {} records with unrecognized {}",
                partitions.unknown.len(),
                DISCRIMINATOR_FIELD
            );
        }

        let individual = Self::transform_partition(partitions.individual, &self.individual);
        let corporate = Self::transform_partition(partitions.corporate, &self.corporate);

        let (mut records, breakdown) = consolidate::consolidate(vec![
            (Category::Individual, individual),
            (Category::Corporate, corporate),
            (Category::Unknown, partitions.unknown),
        ]);

        normalize::normalize_timestamps(&mut records, DATETIME_COLUMNS);
        normalize::stringify_columns(&mut records, INT_TO_STRING_COLUMNS);

        Ok(TransformResult { records, breakdown })
    }

    async fn load(&self, result: TransformResult) -> Result<LoadSummary> {
        let columns = self.destination.table_columns(CUSTOMER_PROFILE_TABLE).await?;
        let rows = project::conform_to_columns(result.records, &columns);
        let rows_inserted = self
            .destination
            .replace_rows(CUSTOMER_PROFILE_TABLE, &rows, &column_types())
            .await?;

        Ok(LoadSummary {
            table: CUSTOMER_PROFILE_TABLE.to_string(),
            rows_inserted,
            breakdown: result.breakdown,
        })
    }
}
