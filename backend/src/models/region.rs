//! Location to region lookup.
//!
//! The map is configuration data: it ships with a small default table and can
//! be replaced from a TOML file, either standalone or as the `[regions]`
//! section of the analytics configuration.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::{AnalyticsError, AnalyticsResult};

/// Region label for locations absent from the map.
pub const FALLBACK_REGION: &str = "Other";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionMap {
    entries: BTreeMap<String, String>,
}

#[derive(Deserialize)]
struct RegionFile {
    regions: BTreeMap<String, String>,
}

impl RegionMap {
    pub fn new(entries: BTreeMap<String, String>) -> Self {
        Self { entries }
    }

    pub fn empty() -> Self {
        Self::new(BTreeMap::new())
    }

    /// Parse a `[regions]` table from TOML text.
    pub fn from_toml_str(content: &str) -> AnalyticsResult<Self> {
        let file: RegionFile = toml::from_str(content).map_err(|e| {
            AnalyticsError::configuration(format!("Failed to parse region map: {}", e))
        })?;
        Ok(Self::new(file.regions))
    }

    /// Load a `[regions]` table from a TOML file.
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> AnalyticsResult<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            AnalyticsError::configuration(format!(
                "Failed to read region map {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    /// Region for a location, or [`FALLBACK_REGION`] when unmapped.
    pub fn region_for(&self, location: &str) -> &str {
        self.entries
            .get(location.trim())
            .map(String::as_str)
            .unwrap_or(FALLBACK_REGION)
    }

    pub fn insert(&mut self, location: impl Into<String>, region: impl Into<String>) {
        self.entries.insert(location.into(), region.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for RegionMap {
    fn default() -> Self {
        let entries = [
            ("Bangalore", "APAC"),
            ("Mumbai", "APAC"),
            ("London", "EMEA"),
            ("Warsaw", "EMEA"),
            ("Houston", "AMER"),
            ("Denver", "AMER"),
        ]
        .into_iter()
        .map(|(location, region)| (location.to_string(), region.to_string()))
        .collect();
        Self::new(entries)
    }
}
