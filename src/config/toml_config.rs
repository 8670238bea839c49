use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_path, Validate};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationConfig {
    pub source: SourceConfig,
    pub staging: StagingConfig,
    pub destination: DestinationConfig,
    pub mapping: MappingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// CSV extract of the operational customer table.
    pub customers_file: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StagingConfig {
    pub dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DestinationConfig {
    pub dir: String,
}

/// Where the mapping document lives: a directory with one CSV per sheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingConfig {
    pub dir: String,
    #[serde(default = "default_customer_sheet")]
    pub customer_sheet: String,
    #[serde(default = "default_profile_individual_sheet")]
    pub profile_individual_sheet: String,
    #[serde(default = "default_profile_corporate_sheet")]
    pub profile_corporate_sheet: String,
    #[serde(default = "default_json_individual_sheet")]
    pub json_individual_sheet: String,
    #[serde(default = "default_json_corporate_sheet")]
    pub json_corporate_sheet: String,
}

fn default_customer_sheet() -> String {
    "customer_ind_corporate.csv".to_string()
}

fn default_profile_individual_sheet() -> String {
    "customer_profile_individual.csv".to_string()
}

fn default_profile_corporate_sheet() -> String {
    "customer_profile_corporate.csv".to_string()
}

fn default_json_individual_sheet() -> String {
    "json_field_individual.csv".to_string()
}

fn default_json_corporate_sheet() -> String {
    "json_field_corporate.csv".to_string()
}

impl MappingConfig {
    pub fn customer_sheet_path(&self) -> PathBuf {
        Path::new(&self.dir).join(&self.customer_sheet)
    }

    pub fn profile_individual_sheet_path(&self) -> PathBuf {
        Path::new(&self.dir).join(&self.profile_individual_sheet)
    }

    pub fn profile_corporate_sheet_path(&self) -> PathBuf {
        Path::new(&self.dir).join(&self.profile_corporate_sheet)
    }

    pub fn json_individual_sheet_path(&self) -> PathBuf {
        Path::new(&self.dir).join(&self.json_individual_sheet)
    }

    pub fn json_corporate_sheet_path(&self) -> PathBuf {
        Path::new(&self.dir).join(&self.json_corporate_sheet)
    }
}

impl MigrationConfig {
    pub fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| EtlError::ConfigError {
            message: format!("cannot read config file {path}: {e}"),
        })?;
        toml::from_str(&contents).map_err(|e| EtlError::ConfigError {
            message: format!("cannot parse config file {path}: {e}"),
        })
    }
}

impl Validate for MigrationConfig {
    fn validate(&self) -> Result<()> {
        validate_path("source.customers_file", &self.source.customers_file)?;
        validate_path("staging.dir", &self.staging.dir)?;
        validate_path("destination.dir", &self.destination.dir)?;
        validate_path("mapping.dir", &self.mapping.dir)?;
        validate_non_empty_string("mapping.customer_sheet", &self.mapping.customer_sheet)?;
        validate_non_empty_string(
            "mapping.profile_individual_sheet",
            &self.mapping.profile_individual_sheet,
        )?;
        validate_non_empty_string(
            "mapping.profile_corporate_sheet",
            &self.mapping.profile_corporate_sheet,
        )?;
        validate_non_empty_string(
            "mapping.json_individual_sheet",
            &self.mapping.json_individual_sheet,
        )?;
        validate_non_empty_string(
            "mapping.json_corporate_sheet",
            &self.mapping.json_corporate_sheet,
        )?;
        Ok(())
    }
}
