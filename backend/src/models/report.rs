use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, AnalyticsResult, ErrorKind};
use crate::parsing::cell_to_string;

/// Why a dashboard section could not be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    MissingColumns,
    InsufficientData,
    DegenerateSeries,
    InvalidConfiguration,
    /// Cell values could not be interpreted.
    UnreadableData,
    /// A section this one depends on is unavailable.
    UpstreamUnavailable,
    Internal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionIssue {
    pub kind: IssueKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing_columns: Vec<String>,
}

impl SectionIssue {
    pub fn upstream(section: &str) -> Self {
        Self {
            kind: IssueKind::UpstreamUnavailable,
            message: format!("Skipped because the {} section is unavailable", section),
            missing_columns: Vec::new(),
        }
    }
}

impl From<&AnalyticsError> for SectionIssue {
    fn from(err: &AnalyticsError) -> Self {
        let kind = match err.kind() {
            ErrorKind::Schema => IssueKind::MissingColumns,
            ErrorKind::InsufficientData => IssueKind::InsufficientData,
            ErrorKind::DegenerateSeries => IssueKind::DegenerateSeries,
            ErrorKind::Configuration => IssueKind::InvalidConfiguration,
            ErrorKind::Parse => IssueKind::UnreadableData,
            ErrorKind::Load | ErrorKind::UnknownSheet | ErrorKind::Internal => IssueKind::Internal,
        };
        Self {
            kind,
            message: err.to_string(),
            missing_columns: err.missing().to_vec(),
        }
    }
}

/// Outcome of one independently gated dashboard section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Section<T> {
    Ready { data: T },
    Unavailable { issue: SectionIssue },
}

impl<T> Section<T> {
    pub fn from_result(result: AnalyticsResult<T>) -> Self {
        match result {
            Ok(data) => Section::Ready { data },
            Err(err) => Section::Unavailable {
                issue: SectionIssue::from(&err),
            },
        }
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Section::Ready { data } => Some(data),
            Section::Unavailable { .. } => None,
        }
    }

    pub fn issue(&self) -> Option<&SectionIssue> {
        match self {
            Section::Ready { .. } => None,
            Section::Unavailable { issue } => Some(issue),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Section::Ready { .. })
    }
}

/// First rows of the selected sheet, rendered as text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TablePreview {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
    pub total_rows: usize,
}

impl TablePreview {
    pub fn from_frame(df: &DataFrame, n: usize) -> PolarsResult<Self> {
        let columns: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();

        let shown = n.min(df.height());
        let mut rows = Vec::with_capacity(shown);
        for i in 0..shown {
            let mut row = Vec::with_capacity(columns.len());
            for column in df.get_columns() {
                let value = column.as_materialized_series().get(i)?;
                row.push(cell_to_string(&value));
            }
            rows.push(row);
        }

        Ok(Self {
            columns,
            rows,
            total_rows: df.height(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_from_schema_error() {
        let section: Section<u32> =
            Section::from_result(Err(AnalyticsError::missing_columns(["Date"])));
        let issue = section.issue().unwrap();
        assert_eq!(issue.kind, IssueKind::MissingColumns);
        assert_eq!(issue.missing_columns, vec!["Date".to_string()]);
        assert!(!section.is_ready());
    }

    #[test]
    fn test_parse_error_is_not_internal() {
        let issue = SectionIssue::from(&AnalyticsError::parse("expected a number, found x"));
        assert_eq!(issue.kind, IssueKind::UnreadableData);
        assert!(issue.missing_columns.is_empty());

        let json = serde_json::to_value(&issue).unwrap();
        assert_eq!(json["kind"], "unreadable_data");
    }

    #[test]
    fn test_section_serializes_with_status_tag() {
        let section: Section<u32> = Section::Ready { data: 7 };
        let json = serde_json::to_value(&section).unwrap();
        assert_eq!(json["status"], "ready");
        assert_eq!(json["data"], 7);
    }

    #[test]
    fn test_preview_truncates_rows() {
        let df = df!(
            "Ticket" => ["T1", "T2", "T3"],
            "Hour" => [Some(9i64), None, Some(11)]
        )
        .unwrap();

        let preview = TablePreview::from_frame(&df, 2).unwrap();
        assert_eq!(preview.columns, vec!["Ticket", "Hour"]);
        assert_eq!(preview.total_rows, 3);
        assert_eq!(preview.rows.len(), 2);
        assert_eq!(preview.rows[0], vec![Some("T1".to_string()), Some("9".to_string())]);
        assert_eq!(preview.rows[1][1], None);
    }
}
