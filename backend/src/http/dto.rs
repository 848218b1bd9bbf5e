//! Data Transfer Objects for the HTTP API.
//!
//! Report payloads reuse the serializable model types directly; only request
//! bodies, query parameters and small envelopes are defined here.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

pub use crate::models::{
    ForecastResult, HeatmapMatrix, Section, SectionIssue, StaffingPlan, TablePreview,
};
pub use crate::services::{DailyVolume, DashboardReport};

use super::error::AppError;
use crate::config::{AnalyticsConfig, SeasonalityPolicy};
use crate::error::AnalyticsResult;

/// One sheet of an upload, as CSV text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadSheet {
    pub name: String,
    pub csv: String,
}

/// Request body for creating a new session.
///
/// Carries either CSV sheets or a whole Excel workbook, base64-encoded.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateSessionRequest {
    /// Sheets in workbook order; the first one is selected
    #[serde(default)]
    pub sheets: Vec<UploadSheet>,
    /// `.xlsx` (or other Excel/ODS) file contents in standard base64
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workbook_base64: Option<String>,
}

/// Decoded upload payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Upload {
    CsvSheets(Vec<(String, String)>),
    Excel(Vec<u8>),
}

impl CreateSessionRequest {
    /// Validate the request shape and decode the workbook bytes.
    pub fn into_upload(self) -> Result<Upload, AppError> {
        match self.workbook_base64 {
            Some(_) if !self.sheets.is_empty() => Err(AppError::BadRequest(
                "Send either 'sheets' or 'workbook_base64', not both".to_string(),
            )),
            Some(encoded) => STANDARD
                .decode(encoded.trim())
                .map(Upload::Excel)
                .map_err(|e| AppError::BadRequest(format!("Invalid base64 workbook: {}", e))),
            None => Ok(Upload::CsvSheets(
                self.sheets
                    .into_iter()
                    .map(|sheet| (sheet.name, sheet.csv))
                    .collect(),
            )),
        }
    }
}

/// Session summary returned by session endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub session_id: String,
    pub sheets: Vec<String>,
    pub selected_sheet: Option<String>,
}

/// Request body for selecting a sheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectSheetRequest {
    pub sheet: String,
}

/// Per-request overrides for report and export endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ReportQuery {
    /// Flat tickets per agent per day
    #[serde(default)]
    pub tickets_per_day: Option<f64>,
    /// Tickets per agent per hour
    #[serde(default)]
    pub tickets_per_hour: Option<f64>,
    /// Shift duration in hours
    #[serde(default)]
    pub shift_hours: Option<f64>,
    /// `auto`, `weekly` or `none`
    #[serde(default)]
    pub seasonality: Option<String>,
}

impl ReportQuery {
    /// Apply the overrides on top of `base`.
    ///
    /// Hourly settings switch staffing to hourly mode unless a flat daily rate
    /// is also given.
    pub fn apply(&self, base: &AnalyticsConfig) -> AnalyticsResult<AnalyticsConfig> {
        let mut config = base.clone();

        if self.tickets_per_hour.is_some() || self.shift_hours.is_some() {
            config.staffing.tickets_per_day = None;
        }
        if let Some(rate) = self.tickets_per_hour {
            config.staffing.tickets_per_hour = rate;
        }
        if let Some(hours) = self.shift_hours {
            config.staffing.shift_hours = hours;
        }
        if let Some(tickets) = self.tickets_per_day {
            config.staffing.tickets_per_day = Some(tickets);
        }
        if let Some(seasonality) = &self.seasonality {
            config.forecast.seasonality = seasonality.parse::<SeasonalityPolicy>()?;
        }

        Ok(config)
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Version of the API
    pub version: String,
    /// Number of open sessions
    pub sessions: usize,
}
