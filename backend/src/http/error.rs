//! HTTP error handling and response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, ErrorKind};
use crate::models::SectionIssue;

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Resource not found
    NotFound(String),
    /// Invalid request (validation error)
    BadRequest(String),
    /// A report section needed by the request could not be computed
    SectionUnavailable {
        section: &'static str,
        issue: SectionIssue,
    },
    /// Internal server error
    Internal(String),
    /// Analytics pipeline error
    Analytics(AnalyticsError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ApiError::new("NOT_FOUND", msg)),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ApiError::new("BAD_REQUEST", msg))
            }
            AppError::SectionUnavailable { section, issue } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::new(
                    "SECTION_UNAVAILABLE",
                    format!("The {} section is unavailable", section),
                )
                .with_details(issue.message),
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("INTERNAL_ERROR", msg),
            ),
            AppError::Analytics(e) => {
                let msg = e.to_string();
                match e.kind() {
                    ErrorKind::UnknownSheet => {
                        (StatusCode::NOT_FOUND, ApiError::new("UNKNOWN_SHEET", msg))
                    }
                    ErrorKind::Load | ErrorKind::Parse => {
                        (StatusCode::BAD_REQUEST, ApiError::new("LOAD_ERROR", msg))
                    }
                    ErrorKind::Configuration => (
                        StatusCode::BAD_REQUEST,
                        ApiError::new("INVALID_CONFIGURATION", msg),
                    ),
                    _ => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        ApiError::new("ANALYTICS_ERROR", msg),
                    ),
                }
            }
        };

        (status, Json(error)).into_response()
    }
}

impl From<AnalyticsError> for AppError {
    fn from(err: AnalyticsError) -> Self {
        AppError::Analytics(err)
    }
}
