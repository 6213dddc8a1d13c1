//! Download plan: expands the configured year range into concrete filenames.
//!
//! Archives follow `Prix{year}.csv.gz`, plus one `Stations{year}.csv.gz` and one
//! `Services{year}.csv.gz`. Some years were published under other names; the
//! [`OverrideTable`] lists those and is applied after the range is expanded.

use std::collections::{BTreeMap, HashSet};

use crate::config::FuelConfig;

/// The 2022 archive only exists as two half-year files.
const HISTORICAL_SPLIT_YEAR: i32 = 2022;
const HISTORICAL_SPLIT_FILES: [&str; 2] = ["Prix2022S2.csv.gz", "Prix2022S1.csv.gz"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlanError {
    /// An override names a year whose archive is not in the generated list.
    #[error("value not found: {filename} is not in the planned files")]
    OverrideNotInPlan { filename: String },
    /// The same filename would be fetched twice once overrides are applied.
    #[error("duplicate file in plan: {filename}")]
    DuplicateFile { filename: String },
}

pub fn price_file(year: i32) -> String {
    format!("Prix{}.csv.gz", year)
}

pub fn station_file(year: i32) -> String {
    format!("Stations{}.csv.gz", year)
}

pub fn service_file(year: i32) -> String {
    format!("Services{}.csv.gz", year)
}

/// Year → filenames that stand in for `Prix{year}.csv.gz`. Applied in ascending year order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideTable {
    entries: BTreeMap<i32, Vec<String>>,
}

impl OverrideTable {
    /// Table with no overrides.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Built-in table used when the config has no `year_overrides`.
    pub fn historical() -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(
            HISTORICAL_SPLIT_YEAR,
            HISTORICAL_SPLIT_FILES.iter().map(|s| s.to_string()).collect(),
        );
        Self { entries }
    }

    pub fn from_map(entries: BTreeMap<i32, Vec<String>>) -> Self {
        Self { entries }
    }

    pub fn insert(&mut self, year: i32, replacements: Vec<String>) {
        self.entries.insert(year, replacements);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (i32, &[String])> {
        self.entries.iter().map(|(y, r)| (*y, r.as_slice()))
    }
}

/// Ordered list of filenames to fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadPlan {
    files: Vec<String>,
}

impl DownloadPlan {
    pub fn files(&self) -> &[String] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn into_files(self) -> Vec<String> {
        self.files
    }
}

impl From<Vec<String>> for DownloadPlan {
    fn from(files: Vec<String>) -> Self {
        Self { files }
    }
}

impl IntoIterator for DownloadPlan {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.into_iter()
    }
}

/// Builds the plan for `cfg` using its effective override table.
pub fn build_plan(cfg: &FuelConfig) -> Result<DownloadPlan, PlanError> {
    build_plan_with(cfg, &cfg.override_table())
}

/// Builds the plan for `cfg` with an explicit override table.
///
/// Every override year must be inside the configured range: its `Prix{year}`
/// entry is removed, and a missing entry is an error rather than a no-op.
/// The resulting filenames must be distinct.
pub fn build_plan_with(
    cfg: &FuelConfig,
    overrides: &OverrideTable,
) -> Result<DownloadPlan, PlanError> {
    let mut files: Vec<String> = (cfg.first_year_gas..=cfg.last_year_gas)
        .map(price_file)
        .collect();
    files.push(station_file(cfg.year_station_file));
    files.push(service_file(cfg.year_service_file));

    for (year, replacements) in overrides.iter() {
        let original = price_file(year);
        let pos = files
            .iter()
            .position(|f| *f == original)
            .ok_or(PlanError::OverrideNotInPlan { filename: original })?;
        files.remove(pos);
        files.extend(replacements.iter().cloned());
    }
    if !overrides.is_empty() {
        let years: Vec<i32> = overrides.iter().map(|(y, _)| y).collect();
        tracing::debug!(?years, "applied overrides");
    }

    let mut seen = HashSet::with_capacity(files.len());
    if let Some(dup) = files.iter().find(|f| !seen.insert(*f)) {
        return Err(PlanError::DuplicateFile {
            filename: dup.clone(),
        });
    }

    tracing::debug!(count = files.len(), "built download plan");
    Ok(DownloadPlan { files })
}
