//! CSV exports handed to the download mechanism of the front end.

use polars::prelude::*;
use std::path::Path;

use crate::error::{AnalyticsError, AnalyticsResult};
use crate::models::{ForecastResult, StaffingPlan};

pub const DATE_COLUMN: &str = "Date";
pub const FORECAST_COLUMN: &str = "Forecasted Tickets";
pub const AGENTS_COLUMN: &str = "Agents Needed";

pub const SHIFT_PLAN_FILE: &str = "shift_plan.csv";
pub const FORECAST_FILE: &str = "forecast.csv";

/// Decimal places for forecasted ticket volumes.
const FLOAT_PRECISION: usize = 2;

/// Shift plan as a DataFrame: `Date`, `Forecasted Tickets`, `Agents Needed`.
pub fn shift_plan_frame(plan: &StaffingPlan) -> PolarsResult<DataFrame> {
    let dates: Vec<String> = plan.rows.iter().map(|r| r.date.to_string()).collect();
    let tickets: Vec<f64> = plan.rows.iter().map(|r| r.forecasted_tickets).collect();
    let agents: Vec<u32> = plan.rows.iter().map(|r| r.agents_needed).collect();

    df!(
        DATE_COLUMN => dates,
        FORECAST_COLUMN => tickets,
        AGENTS_COLUMN => agents
    )
}

/// Forecast as a DataFrame: `Date`, `Forecasted Tickets`.
pub fn forecast_frame(forecast: &ForecastResult) -> PolarsResult<DataFrame> {
    let dates: Vec<String> = forecast.points.iter().map(|p| p.date.to_string()).collect();
    let values: Vec<f64> = forecast.points.iter().map(|p| p.predicted).collect();

    df!(
        DATE_COLUMN => dates,
        FORECAST_COLUMN => values
    )
}

fn frame_to_csv(df: &mut DataFrame) -> AnalyticsResult<String> {
    let mut buf: Vec<u8> = Vec::new();
    CsvWriter::new(&mut buf)
        .include_header(true)
        .with_float_precision(Some(FLOAT_PRECISION))
        .finish(df)?;
    String::from_utf8(buf)
        .map_err(|e| AnalyticsError::load(format!("CSV output is not UTF-8: {}", e)))
}

pub fn shift_plan_csv(plan: &StaffingPlan) -> AnalyticsResult<String> {
    let mut df = shift_plan_frame(plan)?;
    frame_to_csv(&mut df)
}

pub fn forecast_csv(forecast: &ForecastResult) -> AnalyticsResult<String> {
    let mut df = forecast_frame(forecast)?;
    frame_to_csv(&mut df)
}

/// Write a rendered CSV to disk.
pub fn write_csv(path: &Path, csv: &str) -> AnalyticsResult<()> {
    std::fs::write(path, csv)?;
    log::info!("Wrote {}", path.display());
    Ok(())
}
