//! Two-dimensional cross-tabulation of ticket rows.

use chrono::{Datelike, Weekday};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::config::ColumnSettings;
use crate::error::AnalyticsResult;
use crate::models::{Aggregation, HeatmapCell, HeatmapMatrix, RegionMap};
use crate::parsing::{cell_to_date, cell_to_f64, cell_to_hour, cell_to_label};
use crate::services::schema::{require_columns, series};

/// How a column is turned into heatmap labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Dimension {
    /// English day name of a date column, Monday first.
    Weekday { column: String },
    /// Hour of day 0-23, ascending.
    HourOfDay { column: String },
    /// Raw text value, lexicographic.
    Category { column: String },
    /// Location mapped to a region, lexicographic.
    Region { column: String },
}

/// Sort key plus display label. Categorical labels share ordinal 0 and sort
/// by text.
type Key = (u32, String);

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

impl Dimension {
    pub fn column(&self) -> &str {
        match self {
            Dimension::Weekday { column }
            | Dimension::HourOfDay { column }
            | Dimension::Category { column }
            | Dimension::Region { column } => column,
        }
    }

    /// Human-readable axis name, e.g. `"Weekday"` or `"Employee Name"`.
    pub fn title(&self) -> String {
        match self {
            Dimension::Weekday { .. } => "Weekday".to_string(),
            Dimension::HourOfDay { .. } => "Hour".to_string(),
            Dimension::Category { column } => column.clone(),
            Dimension::Region { .. } => "Region".to_string(),
        }
    }

    fn key(&self, value: &AnyValue, regions: &RegionMap) -> AnalyticsResult<Key> {
        match self {
            Dimension::Weekday { .. } => {
                let day = cell_to_date(value)?.weekday();
                Ok((day.num_days_from_monday(), weekday_name(day).to_string()))
            }
            Dimension::HourOfDay { .. } => {
                let hour = cell_to_hour(value)?;
                Ok((hour, hour.to_string()))
            }
            Dimension::Category { .. } => Ok((0, cell_to_label(value)?)),
            Dimension::Region { .. } => {
                let location = cell_to_label(value)?;
                Ok((0, regions.region_for(&location).to_string()))
            }
        }
    }
}

/// What to cross-tabulate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeatmapSpec {
    pub rows: Dimension,
    pub columns: Dimension,
    pub aggregation: Aggregation,
}

impl HeatmapSpec {
    /// Ticket counts by weekday and hour.
    pub fn workload(columns: &ColumnSettings) -> Self {
        Self {
            rows: Dimension::Weekday {
                column: columns.date.clone(),
            },
            columns: Dimension::HourOfDay {
                column: columns.hour.clone(),
            },
            aggregation: Aggregation::Count,
        }
    }

    /// Mean per-employee daily tickets by region.
    pub fn region(columns: &ColumnSettings) -> Self {
        Self {
            rows: Dimension::Category {
                column: columns.employee.clone(),
            },
            columns: Dimension::Region {
                column: columns.location.clone(),
            },
            aggregation: Aggregation::Mean {
                measure: columns.measure.clone(),
            },
        }
    }

    fn required_columns(&self) -> Vec<&str> {
        let mut required = vec![self.rows.column(), self.columns.column()];
        if let Aggregation::Mean { measure } = &self.aggregation {
            required.push(measure.as_str());
        }
        required
    }
}

#[derive(Default)]
struct Accumulator {
    sum: f64,
    samples: usize,
}

/// Build a heatmap from `df`.
///
/// Rows whose dimensions (or measure, in mean mode) cannot be read are
/// dropped. Count mode fills every label combination, using zero where no
/// rows fell; mean mode keeps only observed combinations.
pub fn build_heatmap(
    df: &DataFrame,
    spec: &HeatmapSpec,
    regions: &RegionMap,
) -> AnalyticsResult<HeatmapMatrix> {
    require_columns(df, &spec.required_columns())?;

    let row_values = series(df, spec.rows.column())?;
    let column_values = series(df, spec.columns.column())?;
    let measure_values = match &spec.aggregation {
        Aggregation::Count => None,
        Aggregation::Mean { measure } => Some(series(df, measure)?),
    };

    let mut row_keys: BTreeSet<Key> = BTreeSet::new();
    let mut column_keys: BTreeSet<Key> = BTreeSet::new();
    let mut cells: BTreeMap<(Key, Key), Accumulator> = BTreeMap::new();
    let mut dropped = 0usize;

    for i in 0..df.height() {
        let row = spec.rows.key(&row_values.get(i)?, regions);
        let column = spec.columns.key(&column_values.get(i)?, regions);
        let measure = match measure_values {
            None => Ok(1.0),
            Some(values) => cell_to_f64(&values.get(i)?),
        };

        let (row, column, measure) = match (row, column, measure) {
            (Ok(r), Ok(c), Ok(m)) => (r, c, m),
            _ => {
                dropped += 1;
                continue;
            }
        };

        row_keys.insert(row.clone());
        column_keys.insert(column.clone());
        let cell = cells.entry((row, column)).or_default();
        cell.sum += measure;
        cell.samples += 1;
    }

    if dropped > 0 {
        log::debug!(
            "Heatmap {} x {}: dropped {} unreadable row(s)",
            spec.rows.title(),
            spec.columns.title(),
            dropped
        );
    }

    let mut out = Vec::new();
    for row in &row_keys {
        for column in &column_keys {
            let entry = cells.get(&(row.clone(), column.clone()));
            let cell = match (&spec.aggregation, entry) {
                (Aggregation::Count, entry) => {
                    let samples = entry.map(|a| a.samples).unwrap_or(0);
                    Some((samples as f64, samples))
                }
                (Aggregation::Mean { .. }, Some(acc)) => {
                    Some((acc.sum / acc.samples as f64, acc.samples))
                }
                (Aggregation::Mean { .. }, None) => None,
            };
            if let Some((value, samples)) = cell {
                out.push(HeatmapCell {
                    row: row.1.clone(),
                    column: column.1.clone(),
                    value,
                    samples,
                });
            }
        }
    }

    Ok(HeatmapMatrix {
        row_dimension: spec.rows.title(),
        column_dimension: spec.columns.title(),
        aggregation: spec.aggregation.clone(),
        row_labels: row_keys.into_iter().map(|(_, label)| label).collect(),
        column_labels: column_keys.into_iter().map(|(_, label)| label).collect(),
        cells: out,
    })
}
