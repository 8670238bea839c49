pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::{CsvSourceStore, CsvStagingStore, JsonlDestinationStore};
pub use config::{toml_config::MigrationConfig, CliConfig, Command};
pub use core::customer_pipeline::CustomerPipeline;
pub use domain::model::{Category, CategoryBreakdown, LoadSummary, Record};
pub use core::etl::EtlEngine;
pub use core::mapping::MappingSpec;
pub use core::profile_pipeline::ProfilePipeline;
pub use core::staging_pipeline::{FullLoadPipeline, IncrementalLoadPipeline};
pub use utils::error::{EtlError, Result};
