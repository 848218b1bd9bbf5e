//! Cell-level parsing for uploaded ticket sheets.
//!
//! Spreadsheet exports mix strings, typed dates and numbers in the same
//! logical column. These helpers turn a single polars [`AnyValue`] into the
//! type an aggregator needs, or a [`ParseError`] the caller uses to drop the
//! row.
//!
//! [`AnyValue`]: polars::prelude::AnyValue
//! [`ParseError`]: crate::error::AnalyticsError::Parse

pub mod cells;

#[cfg(test)]
mod cells_tests;

pub use cells::{
    cell_to_date, cell_to_datetime, cell_to_f64, cell_to_hour, cell_to_label, cell_to_string,
    parse_datetime_str,
};
