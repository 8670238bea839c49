use crate::domain::model::LoadSummary;
use crate::domain::ports::Pipeline;
use crate::utils::error::Result;
use std::time::Instant;

/// Drives one migration run through its three stages. A failure at any stage
/// aborts the run; there is no partial output because every stage operates on
/// a fully materialized batch.
pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<LoadSummary> {
        let started = Instant::now();
        tracing::info!("Starting data transfer process");

        let batch = self.pipeline.extract().await?;
        tracing::info!(
            "Extracted {} customer records and {} identifier rows",
            batch.customers.len(),
            batch.identifiers.len()
        );

        let result = self.pipeline.transform(batch).await?;
        let breakdown = result.breakdown;
        tracing::info!(
            "Transformed {} records (individual: {}, corporate: {}, unified: {}, dropped: {})",
            result.records.len(),
            breakdown.individual,
            breakdown.corporate,
            breakdown.unified,
            breakdown.dropped
        );

        let summary = self.pipeline.load(result).await?;
        tracing::info!(
            "Inserted {} rows into {} in {:.2?}",
            summary.rows_inserted,
            summary.table,
            started.elapsed()
        );

        Ok(summary)
    }
}
