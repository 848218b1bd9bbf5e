use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike};
use polars::prelude::*;

use crate::error::{AnalyticsError, AnalyticsResult};

/// Days between 0001-01-01 (CE) and the Unix epoch, as used by polars `Date`.
const EPOCH_DAYS_FROM_CE: i32 = 719_163;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d.%m.%Y",
    "%d-%b-%Y",
    "%b %d, %Y",
    "%Y%m%d",
];

/// Parse a timestamp string in any of the accepted layouts.
///
/// Date-only strings resolve to midnight. Offsets in RFC 3339 strings are kept
/// as local wall-clock time so the calendar day matches what the operator sees.
pub fn parse_datetime_str(raw: &str) -> AnalyticsResult<NaiveDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AnalyticsError::parse("empty timestamp"));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.naive_local());
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(dt);
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Ok(date.and_time(chrono::NaiveTime::MIN));
        }
    }

    Err(AnalyticsError::parse(format!(
        "unrecognised timestamp '{}'",
        trimmed
    )))
}

fn date_from_days(days: i32) -> AnalyticsResult<NaiveDate> {
    days.checked_add(EPOCH_DAYS_FROM_CE)
        .and_then(NaiveDate::from_num_days_from_ce_opt)
        .ok_or_else(|| AnalyticsError::parse(format!("date out of range: {} days", days)))
}

fn datetime_from_epoch(value: i64, unit: TimeUnit) -> AnalyticsResult<NaiveDateTime> {
    let dt = match unit {
        TimeUnit::Nanoseconds => Some(DateTime::from_timestamp_nanos(value)),
        TimeUnit::Microseconds => DateTime::from_timestamp_micros(value),
        TimeUnit::Milliseconds => DateTime::from_timestamp_millis(value),
    };
    dt.map(|dt| dt.naive_utc())
        .ok_or_else(|| AnalyticsError::parse(format!("timestamp out of range: {}", value)))
}

/// Interpret a cell as a timestamp.
///
/// Accepts polars `Date`/`Datetime` values and strings. Numbers are rejected:
/// a bare number in a date column is far more likely a data-entry error than
/// an epoch offset.
pub fn cell_to_datetime(value: &AnyValue) -> AnalyticsResult<NaiveDateTime> {
    match value {
        AnyValue::Null => Err(AnalyticsError::parse("missing timestamp")),
        AnyValue::Date(days) => Ok(date_from_days(*days)?.and_time(chrono::NaiveTime::MIN)),
        AnyValue::Datetime(v, unit, _) => datetime_from_epoch(*v, *unit),
        AnyValue::DatetimeOwned(v, unit, _) => datetime_from_epoch(*v, *unit),
        AnyValue::String(s) => parse_datetime_str(s),
        AnyValue::StringOwned(s) => parse_datetime_str(s.as_str()),
        other => Err(AnalyticsError::parse(format!(
            "expected a date, found {}",
            other
        ))),
    }
}

/// Interpret a cell as a calendar date.
pub fn cell_to_date(value: &AnyValue) -> AnalyticsResult<NaiveDate> {
    match value {
        AnyValue::Date(days) => date_from_days(*days),
        other => cell_to_datetime(other).map(|dt| dt.date()),
    }
}

/// Interpret a cell as a finite number.
pub fn cell_to_f64(value: &AnyValue) -> AnalyticsResult<f64> {
    let parsed = match value {
        AnyValue::Null => return Err(AnalyticsError::parse("missing number")),
        AnyValue::Boolean(_) => None,
        AnyValue::String(s) => s.trim().parse::<f64>().ok(),
        AnyValue::StringOwned(s) => s.as_str().trim().parse::<f64>().ok(),
        AnyValue::Date(_) | AnyValue::Datetime(..) | AnyValue::DatetimeOwned(..) => None,
        other => other.extract::<f64>(),
    };

    match parsed {
        Some(v) if v.is_finite() => Ok(v),
        _ => Err(AnalyticsError::parse(format!(
            "expected a number, found {}",
            value
        ))),
    }
}

fn hour_from_str(raw: &str) -> AnalyticsResult<u32> {
    let trimmed = raw.trim();
    if let Ok(hour) = trimmed.parse::<u32>() {
        return Ok(hour);
    }
    if let Ok(hour) = trimmed.parse::<f64>() {
        if hour.fract() == 0.0 && hour >= 0.0 {
            return Ok(hour as u32);
        }
        return Err(AnalyticsError::parse(format!("invalid hour {}", hour)));
    }
    if let Some((head, _)) = trimmed.split_once(':') {
        if let Ok(hour) = head.trim().parse::<u32>() {
            return Ok(hour);
        }
    }
    parse_datetime_str(trimmed).map(|dt| dt.hour())
}

/// Interpret a cell as an hour of day in `0..=23`.
///
/// Accepts integers, integral floats, `"HH"`/`"HH:MM"` strings and timestamps.
pub fn cell_to_hour(value: &AnyValue) -> AnalyticsResult<u32> {
    let hour = match value {
        AnyValue::Null => return Err(AnalyticsError::parse("missing hour")),
        AnyValue::String(s) => hour_from_str(s)?,
        AnyValue::StringOwned(s) => hour_from_str(s.as_str())?,
        AnyValue::Date(_) => 0,
        AnyValue::Datetime(..) | AnyValue::DatetimeOwned(..) => cell_to_datetime(value)?.hour(),
        other => {
            let v = cell_to_f64(other)?;
            if v.fract() != 0.0 || v < 0.0 {
                return Err(AnalyticsError::parse(format!("invalid hour {}", v)));
            }
            v as u32
        }
    };

    if hour > 23 {
        return Err(AnalyticsError::parse(format!("hour {} out of range", hour)));
    }
    Ok(hour)
}

/// Render a cell as display text; `None` for nulls.
pub fn cell_to_string(value: &AnyValue) -> Option<String> {
    match value {
        AnyValue::Null => None,
        AnyValue::String(s) => Some(s.to_string()),
        AnyValue::StringOwned(s) => Some(s.to_string()),
        AnyValue::Date(days) => Some(
            date_from_days(*days)
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|_| days.to_string()),
        ),
        AnyValue::Datetime(..) | AnyValue::DatetimeOwned(..) => Some(
            cell_to_datetime(value)
                .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(|_| value.to_string()),
        ),
        other => Some(other.to_string()),
    }
}

/// Interpret a cell as a non-empty category label.
pub fn cell_to_label(value: &AnyValue) -> AnalyticsResult<String> {
    match cell_to_string(value) {
        Some(label) if !label.trim().is_empty() => Ok(label.trim().to_string()),
        _ => Err(AnalyticsError::parse("missing label")),
    }
}
