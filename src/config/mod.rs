pub mod toml_config;

use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "customer-migrate")]
#[command(about = "Customer data migration: staging loads and mapping-driven table migrations")]
pub struct CliConfig {
    /// Path to the migration TOML config
    #[arg(long, default_value = "migration.toml")]
    pub config: String,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Replace the staging table with a full source extraction
    FullLoad,
    /// Append source rows created since the last ingestion
    IncrementalLoad,
    /// Migrate staged rows into the customer table
    Customer,
    /// Migrate staged rows into the customer_profile table
    CustomerProfile,
}
