//! Python bindings for the analytics core.
//!
//! Exposes JSON- and CSV-returning functions so a Streamlit page can hand a
//! sheet to the backend and render the results itself.
//!
//! # Python API
//!
//! All functions are available in the `desk_analytics` Python module after
//! installation with the `python` feature enabled.

use chrono::NaiveDate;
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;

use crate::config::{AnalyticsConfig, FORECAST_HORIZON, WEEKLY_PERIOD};
use crate::error::AnalyticsError;
use crate::io::{self, WorkbookLoader};
use crate::models::{DailySeries, ModelKind, SeriesOrigin};
use crate::services::{self, DashboardReport};

fn to_py_err(err: AnalyticsError) -> PyErr {
    if err.is_recoverable() {
        PyValueError::new_err(err.to_string())
    } else {
        PyRuntimeError::new_err(err.to_string())
    }
}

fn config_from(config_toml: Option<&str>) -> PyResult<AnalyticsConfig> {
    match config_toml {
        Some(text) => AnalyticsConfig::from_toml_str(text).map_err(to_py_err),
        None => Ok(AnalyticsConfig::default()),
    }
}

fn report_for(csv: &str, sheet: &str, config: &AnalyticsConfig) -> PyResult<DashboardReport> {
    let workbook = WorkbookLoader::load_from_csv_sheets([(sheet, csv)])
        .map_err(|e| PyRuntimeError::new_err(format!("Failed to load sheet: {:#}", e)))?;
    let frame = &workbook.sheet(sheet).map_err(to_py_err)?.frame;
    services::build_report(sheet, frame, config).map_err(to_py_err)
}

/// Build the full dashboard report for one CSV sheet.
///
/// Args:
///     csv: Sheet contents as CSV text with a header row
///     sheet: Sheet name shown in the report
///     config_toml: Optional analytics configuration as TOML text
///
/// Returns:
///     str: The report as JSON; unavailable sections carry an `issue`
#[pyfunction]
#[pyo3(signature = (csv, sheet, config_toml=None))]
pub fn build_report_json(csv: &str, sheet: &str, config_toml: Option<&str>) -> PyResult<String> {
    let config = config_from(config_toml)?;
    let report = report_for(csv, sheet, &config)?;
    serde_json::to_string(&report)
        .map_err(|e| PyRuntimeError::new_err(format!("Failed to serialize report: {}", e)))
}

/// Forecast the 14 days after a daily series.
///
/// Args:
///     values: Daily ticket counts, oldest first
///     start_date: ISO date of the first value
///     seasonal: Model a weekly seasonal component
///
/// Returns:
///     str: The forecast as JSON
#[pyfunction]
#[pyo3(signature = (values, start_date, seasonal=true))]
pub fn forecast_json(values: Vec<f64>, start_date: &str, seasonal: bool) -> PyResult<String> {
    let start = NaiveDate::parse_from_str(start_date, "%Y-%m-%d")
        .map_err(|e| PyValueError::new_err(format!("Invalid start date: {}", e)))?;
    let series = DailySeries::new(start, values, SeriesOrigin::Observed);
    let model = if seasonal {
        ModelKind::HoltWinters {
            period: WEEKLY_PERIOD,
        }
    } else {
        ModelKind::Holt
    };

    let result = services::forecast(&series, model, FORECAST_HORIZON).map_err(to_py_err)?;
    serde_json::to_string(&result)
        .map_err(|e| PyRuntimeError::new_err(format!("Failed to serialize forecast: {}", e)))
}

/// Shift plan CSV (`Date`, `Forecasted Tickets`, `Agents Needed`) for one sheet.
#[pyfunction]
#[pyo3(signature = (csv, sheet, config_toml=None))]
pub fn shift_plan_csv(csv: &str, sheet: &str, config_toml: Option<&str>) -> PyResult<String> {
    let config = config_from(config_toml)?;
    let report = report_for(csv, sheet, &config)?;
    let plan = report.staffing.ready().ok_or_else(|| {
        let reason = report
            .staffing
            .issue()
            .map(|issue| issue.message.clone())
            .unwrap_or_default();
        PyValueError::new_err(format!("Staffing plan unavailable: {}", reason))
    })?;
    io::shift_plan_csv(plan).map_err(to_py_err)
}
