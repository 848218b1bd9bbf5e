//! Daily volume aggregation.
//!
//! A sheet is reduced to one contiguous [`DailySeries`] through one of three
//! input modes, picked from the columns the sheet carries.

use chrono::NaiveDate;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::{AnalyticsConfig, ColumnSettings};
use crate::error::{AnalyticsError, AnalyticsResult};
use crate::models::DailySeries;
use crate::parsing::{cell_to_date, cell_to_f64};
use crate::services::schema::{has_column, series};

/// Percentage of non-null cells that must parse as dates before an unnamed
/// first column is treated as ticket timestamps.
const FIRST_COLUMN_DATE_PERCENT: usize = 80;

/// Where daily ticket volumes come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum VolumeSource {
    /// One row per ticket with a timestamp or date column.
    RawTimestamps { column: String },
    /// Per-row processed-ticket count over a number of work days.
    PrecomputedRatio {
        count_column: String,
        divisor_column: String,
    },
    /// One row per ticket with separate date and hour columns.
    DateHourGrid {
        date_column: String,
        hour_column: String,
    },
}

impl VolumeSource {
    /// Pick the input mode from the columns present in `df`.
    ///
    /// Checked in order: ratio columns, date + hour, date alone, a configured
    /// timestamp alias, then a first column made mostly of dates.
    pub fn detect(df: &DataFrame, columns: &ColumnSettings) -> AnalyticsResult<Self> {
        if has_column(df, &columns.processed_tickets) && has_column(df, &columns.work_days) {
            return Ok(VolumeSource::PrecomputedRatio {
                count_column: columns.processed_tickets.clone(),
                divisor_column: columns.work_days.clone(),
            });
        }

        if has_column(df, &columns.date) {
            if has_column(df, &columns.hour) {
                return Ok(VolumeSource::DateHourGrid {
                    date_column: columns.date.clone(),
                    hour_column: columns.hour.clone(),
                });
            }
            return Ok(VolumeSource::RawTimestamps {
                column: columns.date.clone(),
            });
        }

        if let Some(alias) = columns
            .timestamp_aliases
            .iter()
            .find(|alias| has_column(df, alias))
        {
            return Ok(VolumeSource::RawTimestamps {
                column: alias.clone(),
            });
        }

        if let Some(first) = df.get_columns().first() {
            if mostly_dates(first.as_materialized_series())? {
                return Ok(VolumeSource::RawTimestamps {
                    column: first.name().to_string(),
                });
            }
        }

        Err(AnalyticsError::missing_columns([columns.date.clone()]))
    }

    pub fn name(&self) -> &'static str {
        match self {
            VolumeSource::RawTimestamps { .. } => "raw_timestamps",
            VolumeSource::PrecomputedRatio { .. } => "precomputed_ratio",
            VolumeSource::DateHourGrid { .. } => "date_hour_grid",
        }
    }

    /// Whether the resulting series carries real calendar dates.
    pub fn has_observed_dates(&self) -> bool {
        !matches!(self, VolumeSource::PrecomputedRatio { .. })
    }
}

fn mostly_dates(column: &Series) -> AnalyticsResult<bool> {
    let mut non_null = 0usize;
    let mut parsed = 0usize;
    for i in 0..column.len() {
        let value = column.get(i)?;
        if value.is_null() {
            continue;
        }
        non_null += 1;
        if cell_to_date(&value).is_ok() {
            parsed += 1;
        }
    }
    Ok(non_null > 0 && parsed * 100 >= FIRST_COLUMN_DATE_PERCENT * non_null)
}

/// Reduce `df` to a daily series using `source`.
///
/// `anchor` is the last day of the series in ratio mode and is ignored
/// otherwise. Unparseable rows are dropped and counted on the result.
pub fn aggregate_daily(
    df: &DataFrame,
    source: &VolumeSource,
    anchor: NaiveDate,
) -> AnalyticsResult<DailySeries> {
    let series = match source {
        VolumeSource::RawTimestamps { column } => count_by_date(df, column)?,
        VolumeSource::DateHourGrid { date_column, .. } => count_by_date(df, date_column)?,
        VolumeSource::PrecomputedRatio {
            count_column,
            divisor_column,
        } => ratio_series(df, count_column, divisor_column, anchor)?,
    };

    if series.dropped_rows > 0 {
        log::warn!(
            "Dropped {} unparseable row(s) while aggregating daily volume ({})",
            series.dropped_rows,
            source.name()
        );
    }
    log::debug!(
        "Daily series {}..{} ({} days, {:?})",
        series.start(),
        series.end(),
        series.len(),
        series.origin()
    );
    Ok(series)
}

/// Detect the input mode and aggregate with the configured anchor.
pub fn daily_volume(
    df: &DataFrame,
    config: &AnalyticsConfig,
) -> AnalyticsResult<(VolumeSource, DailySeries)> {
    let source = VolumeSource::detect(df, &config.columns)?;
    log::info!("Volume source: {}", source.name());
    let series = aggregate_daily(df, &source, config.forecast.anchor())?;
    Ok((source, series))
}

fn count_by_date(df: &DataFrame, column: &str) -> AnalyticsResult<DailySeries> {
    let values = series(df, column)?;

    let mut counts: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    let mut dropped = 0usize;
    for i in 0..values.len() {
        match cell_to_date(&values.get(i)?) {
            Ok(date) => *counts.entry(date).or_insert(0) += 1,
            Err(_) => dropped += 1,
        }
    }

    DailySeries::from_counts(&counts)
        .map(|s| s.with_dropped_rows(dropped))
        .ok_or_else(|| {
            AnalyticsError::degenerate(format!("no parseable dates in column '{}'", column))
        })
}

fn ratio_series(
    df: &DataFrame,
    count_column: &str,
    divisor_column: &str,
    anchor: NaiveDate,
) -> AnalyticsResult<DailySeries> {
    let counts = series(df, count_column)?;
    let divisors = series(df, divisor_column)?;

    let mut rates = Vec::with_capacity(df.height());
    let mut dropped = 0usize;
    for i in 0..df.height() {
        let count = cell_to_f64(&counts.get(i)?);
        let divisor = cell_to_f64(&divisors.get(i)?);
        match (count, divisor) {
            (Ok(count), Ok(divisor)) if divisor != 0.0 && (count / divisor).is_finite() => {
                rates.push(count / divisor)
            }
            _ => dropped += 1,
        }
    }

    if rates.is_empty() {
        return Err(AnalyticsError::degenerate(format!(
            "no usable '{}' / '{}' rows",
            count_column, divisor_column
        )));
    }
    Ok(DailySeries::ending_at(anchor, rates).with_dropped_rows(dropped))
}
