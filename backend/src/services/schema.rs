//! Column-presence checks shared by the analytical sections.

use polars::prelude::*;

use crate::error::{AnalyticsError, AnalyticsResult};

pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_column_names().iter().any(|c| c.as_str() == name)
}

/// Fail with a schema error naming every absent column.
pub fn require_columns(df: &DataFrame, names: &[&str]) -> AnalyticsResult<()> {
    let missing: Vec<&str> = names
        .iter()
        .copied()
        .filter(|name| !has_column(df, name))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(AnalyticsError::missing_columns(missing))
    }
}

/// Materialized series for a column already known to exist.
pub fn series<'a>(df: &'a DataFrame, name: &str) -> AnalyticsResult<&'a Series> {
    Ok(df.column(name)?.as_materialized_series())
}
