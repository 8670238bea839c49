use clap::Parser;
use customer_migrate::utils::{logger, validation::Validate};
use customer_migrate::{
    CliConfig, Command, CsvSourceStore, CsvStagingStore, CustomerPipeline, EtlEngine,
    FullLoadPipeline, IncrementalLoadPipeline, JsonlDestinationStore, LoadSummary, MappingSpec,
    MigrationConfig, ProfilePipeline,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();
    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting customer-migrate");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let config = MigrationConfig::from_file(&cli.config)?;
    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("{e}");
        std::process::exit(1);
    }

    let result = run(&cli.command, &config).await;
    match result {
        Ok(summary) => {
            tracing::info!(
                "Migration run completed: {} rows into {}",
                summary.rows_inserted,
                summary.table
            );
            if summary.breakdown.dropped > 0 {
                tracing::warn!(
                    "{} records were dropped for unrecognized category",
                    summary.breakdown.dropped
                );
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!("Migration run failed: {}", e);
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

async fn run(command: &Command, config: &MigrationConfig) -> customer_migrate::Result<LoadSummary> {
    let staging = CsvStagingStore::new(&config.staging.dir);
    let destination = JsonlDestinationStore::new(&config.destination.dir);

    match command {
        Command::FullLoad => {
            let source = CsvSourceStore::new(&config.source.customers_file);
            EtlEngine::new(FullLoadPipeline::new(source, staging)).run().await
        }
        Command::IncrementalLoad => {
            let source = CsvSourceStore::new(&config.source.customers_file);
            EtlEngine::new(IncrementalLoadPipeline::new(source, staging))
                .run()
                .await
        }
        Command::Customer => {
            let spec = MappingSpec::from_sheets(&config.mapping.customer_sheet_path(), None)?;
            EtlEngine::new(CustomerPipeline::new(staging, destination, spec))
                .run()
                .await
        }
        Command::CustomerProfile => {
            let individual = MappingSpec::from_sheets(
                &config.mapping.profile_individual_sheet_path(),
                Some(&config.mapping.json_individual_sheet_path()),
            )?;
            let corporate = MappingSpec::from_sheets(
                &config.mapping.profile_corporate_sheet_path(),
                Some(&config.mapping.json_corporate_sheet_path()),
            )?;
            EtlEngine::new(ProfilePipeline::new(staging, destination, individual, corporate))
                .run()
                .await
        }
    }
}
