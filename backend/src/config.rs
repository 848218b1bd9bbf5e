//! Analytics configuration file support.
//!
//! Settings are read from a TOML file. Every section and field is optional;
//! the defaults plan for 5 tickets per agent-hour over 8-hour shifts and use
//! weekly seasonality whenever the history allows it.
//!
//! ```toml
//! [columns]
//! date = "Opened"
//!
//! [staffing]
//! tickets_per_day = 40
//!
//! [forecast]
//! seasonality = "weekly"
//!
//! [regions]
//! Houston = "AMER"
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{AnalyticsError, AnalyticsResult};
use crate::models::{RegionMap, Throughput};

/// Number of days every forecast covers.
pub const FORECAST_HORIZON: usize = 14;

/// Weekly seasonality for daily data.
pub const WEEKLY_PERIOD: usize = 7;

/// Whether to model a seasonal component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeasonalityPolicy {
    /// Seasonal when dates are observed and the history spans two full seasons.
    #[default]
    Auto,
    /// Always seasonal; too-short histories fail with insufficient data.
    Weekly,
    /// Trend-only smoothing.
    None,
}

impl std::str::FromStr for SeasonalityPolicy {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(SeasonalityPolicy::Auto),
            "weekly" | "seasonal" => Ok(SeasonalityPolicy::Weekly),
            "none" | "trend" => Ok(SeasonalityPolicy::None),
            other => Err(AnalyticsError::configuration(format!(
                "Unknown seasonality '{}'. Use 'auto', 'weekly' or 'none'",
                other
            ))),
        }
    }
}

/// Column names looked up in the selected sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnSettings {
    pub date: String,
    pub hour: String,
    pub processed_tickets: String,
    pub work_days: String,
    pub location: String,
    pub employee: String,
    /// Numeric column averaged by the region heatmap
    pub measure: String,
    /// Fallback names for a raw ticket timestamp column
    pub timestamp_aliases: Vec<String>,
}

impl Default for ColumnSettings {
    fn default() -> Self {
        Self {
            date: "Date".to_string(),
            hour: "Hour".to_string(),
            processed_tickets: "Processed Tickets".to_string(),
            work_days: "Work days".to_string(),
            location: "Location".to_string(),
            employee: "Employee Name".to_string(),
            measure: "Avg. Tickets / day".to_string(),
            timestamp_aliases: ["Created", "Created On", "Opened", "Timestamp", "Reported"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Agent throughput settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaffingSettings {
    /// Flat tickets per agent per day; overrides the hourly settings when set
    pub tickets_per_day: Option<f64>,
    pub tickets_per_hour: f64,
    pub shift_hours: f64,
}

impl Default for StaffingSettings {
    fn default() -> Self {
        Self {
            tickets_per_day: None,
            tickets_per_hour: 5.0,
            shift_hours: 8.0,
        }
    }
}

impl StaffingSettings {
    pub fn throughput(&self) -> Throughput {
        match self.tickets_per_day {
            Some(tickets) => Throughput::PerDay { tickets },
            None => Throughput::Hourly {
                tickets_per_hour: self.tickets_per_hour,
                shift_hours: self.shift_hours,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastSettings {
    pub seasonality: SeasonalityPolicy,
    pub season_length: usize,
    /// Last day of a synthetic (ratio mode) series; today when unset
    pub anchor_date: Option<NaiveDate>,
}

impl Default for ForecastSettings {
    fn default() -> Self {
        Self {
            seasonality: SeasonalityPolicy::Auto,
            season_length: WEEKLY_PERIOD,
            anchor_date: None,
        }
    }
}

impl ForecastSettings {
    pub fn anchor(&self) -> NaiveDate {
        self.anchor_date
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewSettings {
    pub rows: usize,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self { rows: 5 }
    }
}

/// Complete analytics configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    #[serde(default)]
    pub columns: ColumnSettings,
    #[serde(default)]
    pub staffing: StaffingSettings,
    #[serde(default)]
    pub forecast: ForecastSettings,
    #[serde(default)]
    pub preview: PreviewSettings,
    /// Replaces the built-in region map when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regions: Option<BTreeMap<String, String>>,
}

impl AnalyticsConfig {
    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> AnalyticsResult<Self> {
        let config: AnalyticsConfig = toml::from_str(content).map_err(|e| {
            AnalyticsError::configuration(format!("Failed to parse config: {}", e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(AnalyticsConfig)` if successful
    /// * `Err(AnalyticsError::Configuration)` if the file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> AnalyticsResult<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            AnalyticsError::configuration(format!("Failed to read config file: {}", e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Load configuration from the default location.
    ///
    /// Searches for `analytics.toml` in:
    /// 1. Current directory
    /// 2. `backend/` directory
    /// 3. Parent directory
    ///
    /// Falls back to defaults when no file exists.
    pub fn from_default_location() -> AnalyticsResult<Self> {
        let search_paths = [
            PathBuf::from("analytics.toml"),
            PathBuf::from("backend/analytics.toml"),
            PathBuf::from("../analytics.toml"),
        ];

        for path in &search_paths {
            if path.exists() {
                log::info!("Loading analytics config from {}", path.display());
                return Self::from_file(path);
            }
        }

        log::debug!("No analytics.toml found, using defaults");
        Ok(Self::default())
    }

    pub fn validate(&self) -> AnalyticsResult<()> {
        if self.forecast.season_length < 2 {
            return Err(AnalyticsError::configuration(format!(
                "forecast.season_length must be at least 2, got {}",
                self.forecast.season_length
            )));
        }
        if self.preview.rows == 0 {
            return Err(AnalyticsError::configuration(
                "preview.rows must be at least 1",
            ));
        }
        Ok(())
    }

    pub fn region_map(&self) -> RegionMap {
        match &self.regions {
            Some(entries) => RegionMap::new(entries.clone()),
            None => RegionMap::default(),
        }
    }

    pub fn throughput(&self) -> Throughput {
        self.staffing.throughput()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = AnalyticsConfig::default();
        assert_eq!(config.columns.date, "Date");
        assert_eq!(config.preview.rows, 5);
        assert_eq!(config.forecast.seasonality, SeasonalityPolicy::Auto);
        assert_eq!(config.throughput().daily_capacity(), 40.0);
        assert_eq!(config.region_map().region_for("Denver"), "AMER");
    }

    #[test]
    fn test_partial_toml() {
        let config = AnalyticsConfig::from_toml_str(
            r#"
            [columns]
            date = "Opened"

            [staffing]
            tickets_per_day = 30

            [forecast]
            seasonality = "none"
            anchor_date = "2024-05-01"
            "#,
        )
        .unwrap();

        assert_eq!(config.columns.date, "Opened");
        assert_eq!(config.columns.hour, "Hour");
        assert_eq!(config.throughput(), Throughput::PerDay { tickets: 30.0 });
        assert_eq!(config.forecast.seasonality, SeasonalityPolicy::None);
        assert_eq!(
            config.forecast.anchor(),
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
        );
    }

    #[test]
    fn test_regions_replace_default_map() {
        let config = AnalyticsConfig::from_toml_str(
            r#"
            [regions]
            Lisbon = "EMEA"
            "#,
        )
        .unwrap();
        let map = config.region_map();
        assert_eq!(map.region_for("Lisbon"), "EMEA");
        assert_eq!(map.region_for("Houston"), "Other");
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(AnalyticsConfig::from_toml_str("[forecast]\nseason_length = 1\n").is_err());
        assert!(AnalyticsConfig::from_toml_str("[preview]\nrows = 0\n").is_err());
        assert!(AnalyticsConfig::from_toml_str("[forecast]\nseasonality = \"daily\"\n").is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        write!(file, "[staffing]\ntickets_per_hour = 6\nshift_hours = 7.5\n").unwrap();

        let config = AnalyticsConfig::from_file(file.path()).unwrap();
        assert_eq!(config.throughput().daily_capacity(), 45.0);
    }

    #[test]
    fn test_seasonality_from_str() {
        assert_eq!("Weekly".parse::<SeasonalityPolicy>().unwrap(), SeasonalityPolicy::Weekly);
        assert_eq!("trend".parse::<SeasonalityPolicy>().unwrap(), SeasonalityPolicy::None);
        assert!("hourly".parse::<SeasonalityPolicy>().is_err());
    }
}
