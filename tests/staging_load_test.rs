use customer_migrate::domain::ports::StagingStore;
use customer_migrate::{
    CsvSourceStore, CsvStagingStore, EtlEngine, FullLoadPipeline, IncrementalLoadPipeline,
};
use std::path::Path;
use tempfile::TempDir;

fn write_source(path: &Path, rows: &[&str]) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    let mut contents = String::from("customer_code,cust_name,customer_type,created_at\n");
    for row in rows {
        contents.push_str(row);
        contents.push('\n');
    }
    std::fs::write(path, contents).unwrap();
}

#[tokio::test]
async fn test_full_load_then_incremental_append() {
    let dir = TempDir::new().unwrap();
    let source_path = dir.path().join("source/efz_customers.csv");
    let staging_dir = dir.path().join("staging");

    write_source(
        &source_path,
        &[
            "C001,Ada,Individual,2024-01-01T00:00:00",
            "C002,Acme,SME,2024-01-02T00:00:00",
        ],
    );

    let staging = CsvStagingStore::new(&staging_dir);
    let pipeline = FullLoadPipeline::new(CsvSourceStore::new(&source_path), staging.clone());
    let summary = EtlEngine::new(pipeline).run().await.unwrap();

    assert_eq!(summary.table, "stg_customers");
    assert_eq!(summary.rows_inserted, 2);
    assert_eq!(staging.read_table("stg_customers").await.unwrap().len(), 2);

    // Every staged customer code received an identifier.
    let identifiers = staging.read_table("customer_uuids").await.unwrap();
    assert_eq!(identifiers.len(), 2);
    for row in &identifiers {
        uuid::Uuid::parse_str(row.get_str("customerId").unwrap()).unwrap();
    }

    // A newer row appears at the source.
    write_source(
        &source_path,
        &[
            "C001,Ada,Individual,2024-01-01T00:00:00",
            "C002,Acme,SME,2024-01-02T00:00:00",
            "C004,Zebra,Individual,2024-02-01T00:00:00",
        ],
    );

    let pipeline =
        IncrementalLoadPipeline::new(CsvSourceStore::new(&source_path), staging.clone());
    let summary = EtlEngine::new(pipeline).run().await.unwrap();

    // Only the row past the watermark is appended.
    assert_eq!(summary.rows_inserted, 1);
    let staged = staging.read_table("stg_customers").await.unwrap();
    assert_eq!(staged.len(), 3);
    assert!(staged
        .iter()
        .any(|row| row.get_str("customer_code") == Some("C004")));

    // Identifier seeded for the new code only; earlier ones untouched.
    let identifiers_after = staging.read_table("customer_uuids").await.unwrap();
    assert_eq!(identifiers_after.len(), 3);
    for row in &identifiers {
        assert!(identifiers_after.contains(row));
    }

    // Watermark advanced to the newest loaded row.
    let (table, ingested_at) = staging.ingestion_log().unwrap().unwrap();
    assert_eq!(table, "stg_customers");
    assert_eq!(
        ingested_at,
        chrono::NaiveDate::from_ymd_opt(2024, 2, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    );
}

#[tokio::test]
async fn test_incremental_with_no_new_rows_appends_nothing() {
    let dir = TempDir::new().unwrap();
    let source_path = dir.path().join("source/efz_customers.csv");
    let staging_dir = dir.path().join("staging");

    write_source(&source_path, &["C001,Ada,Individual,2024-01-01T00:00:00"]);

    let staging = CsvStagingStore::new(&staging_dir);
    let full = FullLoadPipeline::new(CsvSourceStore::new(&source_path), staging.clone());
    EtlEngine::new(full).run().await.unwrap();

    let incremental =
        IncrementalLoadPipeline::new(CsvSourceStore::new(&source_path), staging.clone());
    let summary = EtlEngine::new(incremental).run().await.unwrap();

    assert_eq!(summary.rows_inserted, 0);
    assert_eq!(staging.read_table("stg_customers").await.unwrap().len(), 1);
    // The previous watermark is kept, not cleared.
    let (_, ingested_at) = staging.ingestion_log().unwrap().unwrap();
    assert_eq!(
        ingested_at,
        chrono::NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    );
}
