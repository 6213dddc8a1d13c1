use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::plan::OverrideTable;

/// Errors raised while loading the YAML configuration. Both are fatal for a run.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Run configuration loaded from the file passed with `--config`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuelConfig {
    /// First year of `Prix{year}.csv.gz` archives (inclusive).
    pub first_year_gas: i32,
    /// Last year of `Prix{year}.csv.gz` archives (inclusive).
    pub last_year_gas: i32,
    /// Year of the `Stations{year}.csv.gz` listing.
    pub year_station_file: i32,
    /// Year of the `Services{year}.csv.gz` listing.
    pub year_service_file: i32,
    /// Prefix joined verbatim with each filename to form the request URL.
    pub base_url: String,
    /// Prefix joined verbatim with each filename to form the destination path.
    /// The directory must already exist.
    pub base_data_location: String,
    /// Years whose archive was published under other names.
    /// None = built-in table; an empty map disables overrides.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year_overrides: Option<BTreeMap<i32, Vec<String>>>,
}

impl FuelConfig {
    /// Read and parse the YAML file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let data = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg = Self::from_yaml_str(&data)?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(cfg)
    }

    pub fn from_yaml_str(data: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(data)?)
    }

    /// Override table in effect for this run.
    pub fn override_table(&self) -> OverrideTable {
        match &self.year_overrides {
            Some(map) => OverrideTable::from_map(map.clone()),
            None => OverrideTable::historical(),
        }
    }

    /// Request URL for `filename`.
    pub fn url_for(&self, filename: &str) -> String {
        format!("{}{}", self.base_url, filename)
    }

    /// Destination path for `filename`.
    pub fn destination_for(&self, filename: &str) -> PathBuf {
        PathBuf::from(format!("{}{}", self.base_data_location, filename))
    }

    /// Serialize back to YAML (used when echoing the effective config at debug level).
    pub fn to_yaml_string(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}
