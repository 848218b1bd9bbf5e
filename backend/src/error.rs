//! Error types for the analytics pipeline.
//!
//! Every analytical section (forecast, staffing, heatmaps) reports its own
//! failure through [`AnalyticsError`]. Apart from load and I/O errors, all
//! variants are recoverable: the pipeline skips the dependent section and
//! keeps rendering the others.

use polars::prelude::PolarsError;
use serde::{Deserialize, Serialize};

/// Result type for analytics operations
pub type AnalyticsResult<T> = Result<T, AnalyticsError>;

/// Coarse classification of an [`AnalyticsError`], stable across messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Schema,
    InsufficientData,
    DegenerateSeries,
    Parse,
    Configuration,
    Load,
    UnknownSheet,
    Internal,
}

/// Error type for the analytics pipeline
#[derive(Debug, thiserror::Error)]
pub enum AnalyticsError {
    /// Required columns are absent from the selected sheet.
    #[error("Schema error: missing required column(s): {}", missing.join(", "))]
    Schema { missing: Vec<String> },

    /// History too short for the requested model.
    #[error("Insufficient data: {model} needs at least {required} daily points, got {available}")]
    InsufficientData {
        model: String,
        required: usize,
        available: usize,
    },

    /// Smoothing parameters cannot be estimated (constant or near-empty series).
    #[error("Degenerate series: {0}")]
    DegenerateSeries(String),

    /// A single cell could not be interpreted.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid configuration (e.g. non-positive agent capacity).
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Workbook could not be loaded.
    #[error("Load error: {0}")]
    Load(String),

    /// The requested sheet does not exist in the workbook.
    #[error("Unknown sheet: {0}")]
    UnknownSheet(String),

    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AnalyticsError {
    /// Create a schema error from a list of missing column names.
    pub fn missing_columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Schema {
            missing: columns.into_iter().map(Into::into).collect(),
        }
    }

    /// Create an insufficient-data error.
    pub fn insufficient(model: impl Into<String>, required: usize, available: usize) -> Self {
        Self::InsufficientData {
            model: model.into(),
            required,
            available,
        }
    }

    /// Create a degenerate-series error.
    pub fn degenerate(message: impl Into<String>) -> Self {
        Self::DegenerateSeries(message.into())
    }

    /// Create a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Create a load error.
    pub fn load(message: impl Into<String>) -> Self {
        Self::Load(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Schema { .. } => ErrorKind::Schema,
            Self::InsufficientData { .. } => ErrorKind::InsufficientData,
            Self::DegenerateSeries(_) => ErrorKind::DegenerateSeries,
            Self::Parse(_) => ErrorKind::Parse,
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::Load(_) => ErrorKind::Load,
            Self::UnknownSheet(_) => ErrorKind::UnknownSheet,
            Self::Polars(_) | Self::Io(_) => ErrorKind::Internal,
        }
    }

    /// Whether the pipeline can skip the failing section and carry on.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Schema { .. }
                | Self::InsufficientData { .. }
                | Self::DegenerateSeries(_)
                | Self::Parse(_)
                | Self::Configuration(_)
        )
    }

    /// Column names reported by a schema error, empty otherwise.
    pub fn missing(&self) -> &[String] {
        match self {
            Self::Schema { missing } => missing,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_lists_columns() {
        let err = AnalyticsError::missing_columns(["Date", "Hour"]);
        assert_eq!(err.kind(), ErrorKind::Schema);
        assert_eq!(err.missing(), &["Date".to_string(), "Hour".to_string()]);
        assert!(err.to_string().contains("Date, Hour"));
    }

    #[test]
    fn test_recoverability() {
        assert!(AnalyticsError::degenerate("constant").is_recoverable());
        assert!(AnalyticsError::insufficient("holt-winters", 14, 3).is_recoverable());
        assert!(!AnalyticsError::load("bad csv").is_recoverable());
        assert!(!AnalyticsError::UnknownSheet("x".into()).is_recoverable());
    }

    #[test]
    fn test_insufficient_message() {
        let err = AnalyticsError::insufficient("holt-winters(7)", 14, 10);
        assert_eq!(
            err.to_string(),
            "Insufficient data: holt-winters(7) needs at least 14 daily points, got 10"
        );
    }
}
