use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How the dates of a [`DailySeries`] were obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesOrigin {
    /// Dates observed on ticket rows.
    Observed,
    /// Dates fabricated backward from an anchor (count / work-days ratio rows).
    Synthetic,
}

/// Contiguous daily ticket counts.
///
/// Stored as a start date plus one value per day, so the index has no gaps
/// and is strictly increasing by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySeries {
    start: NaiveDate,
    values: Vec<f64>,
    origin: SeriesOrigin,
    /// Rows dropped while building the series (unparseable dates or values)
    pub dropped_rows: usize,
}

impl DailySeries {
    pub fn new(start: NaiveDate, values: Vec<f64>, origin: SeriesOrigin) -> Self {
        Self {
            start,
            values,
            origin,
            dropped_rows: 0,
        }
    }

    /// Build an observed series from per-date counts, filling missing days with zero.
    ///
    /// Returns `None` when `counts` is empty.
    pub fn from_counts(counts: &BTreeMap<NaiveDate, u64>) -> Option<Self> {
        let (&first, _) = counts.iter().next()?;
        let (&last, _) = counts.iter().next_back()?;

        let days = (last - first).num_days() as usize + 1;
        let mut values = vec![0.0; days];
        for (date, count) in counts {
            let offset = (*date - first).num_days() as usize;
            values[offset] = *count as f64;
        }

        Some(Self::new(first, values, SeriesOrigin::Observed))
    }

    /// Build a synthetic series whose last day is `anchor`.
    pub fn ending_at(anchor: NaiveDate, values: Vec<f64>) -> Self {
        let back = values.len().saturating_sub(1) as i64;
        Self::new(anchor - Duration::days(back), values, SeriesOrigin::Synthetic)
    }

    pub fn with_dropped_rows(mut self, dropped_rows: usize) -> Self {
        self.dropped_rows = dropped_rows;
        self
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last date in the series (equal to `start` for an empty series).
    pub fn end(&self) -> NaiveDate {
        let len = self.values.len().saturating_sub(1) as i64;
        self.start + Duration::days(len)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn origin(&self) -> SeriesOrigin {
        self.origin
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn date_at(&self, index: usize) -> NaiveDate {
        self.start + Duration::days(index as i64)
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        (0..self.values.len()).map(move |i| self.date_at(i))
    }

    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }
}
