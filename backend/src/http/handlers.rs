//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! dashboard session for computation. Pipeline work runs on the blocking
//! thread pool.

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use super::dto::{
    CreateSessionRequest, HealthResponse, ReportQuery, SelectSheetRequest, SessionResponse, Upload,
};
use super::error::AppError;
use super::state::{AppState, SessionHandle};
use crate::io::{self, WorkbookLoader};
use crate::models::Section;
use crate::services::{DashboardReport, DashboardSession};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

fn session_or_404(state: &AppState, session_id: &str) -> Result<SessionHandle, AppError> {
    state
        .sessions
        .get(session_id)
        .ok_or_else(|| AppError::NotFound(format!("Session {} not found", session_id)))
}

fn session_response(session_id: String, session: &DashboardSession) -> SessionResponse {
    SessionResponse {
        session_id,
        sheets: session.sheet_names().into_iter().map(str::to_string).collect(),
        selected_sheet: session.selected_sheet().map(str::to_string),
    }
}

/// Recompute the report for a session with the request's overrides.
async fn compute_report(
    state: &AppState,
    session_id: &str,
    query: &ReportQuery,
) -> Result<DashboardReport, AppError> {
    let session = session_or_404(state, session_id)?;
    let config = query.apply(&state.config)?;

    tokio::task::spawn_blocking(move || {
        let mut session = session.lock();
        let report = session.run(&config).cloned();
        report
    })
    .await
    .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))?
    .map_err(AppError::from)
}

fn csv_response(filename: &str, body: String) -> Response {
    let disposition = format!("attachment; filename=\"{}\"", filename);
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response()
}

fn ready_or_unavailable<T>(section: &'static str, value: Section<T>) -> Result<T, AppError> {
    match value {
        Section::Ready { data } => Ok(data),
        Section::Unavailable { issue } => Err(AppError::SectionUnavailable { section, issue }),
    }
}

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        sessions: state.sessions.len(),
    }))
}

// =============================================================================
// Sessions
// =============================================================================

/// POST /v1/sessions
///
/// Upload a workbook (base64 Excel file or CSV sheets) and open a session on it.
pub async fn create_session(
    State(state): State<AppState>,
    Json(request): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<SessionResponse>), AppError> {
    let upload = request.into_upload()?;

    let workbook = tokio::task::spawn_blocking(move || match upload {
        Upload::CsvSheets(sheets) => WorkbookLoader::load_from_csv_sheets(sheets),
        Upload::Excel(bytes) => WorkbookLoader::load_from_excel_bytes(bytes),
    })
    .await
        .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))?
        .map_err(|e| AppError::BadRequest(format!("{:#}", e)))?;

    let session_id = state.sessions.create(workbook);
    let session = session_or_404(&state, &session_id)?;
    let response = session_response(session_id, &session.lock());
    log::info!(
        "Opened session {} with {} sheet(s)",
        response.session_id,
        response.sheets.len()
    );

    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /v1/sessions/{session_id}/sheets
pub async fn list_sheets(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> HandlerResult<SessionResponse> {
    let session = session_or_404(&state, &session_id)?;
    let response = session_response(session_id, &session.lock());
    Ok(Json(response))
}

/// PUT /v1/sessions/{session_id}/sheet
///
/// Select the sheet subsequent reports are computed on.
pub async fn select_sheet(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(request): Json<SelectSheetRequest>,
) -> HandlerResult<SessionResponse> {
    let session = session_or_404(&state, &session_id)?;
    let mut guard = session.lock();
    guard.select_sheet(&request.sheet)?;
    let response = session_response(session_id, &guard);
    Ok(Json(response))
}

/// DELETE /v1/sessions/{session_id}
pub async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<StatusCode, AppError> {
    if state.sessions.remove(&session_id) {
        log::info!("Closed session {}", session_id);
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Session {} not found", session_id)))
    }
}

// =============================================================================
// Reports and Exports
// =============================================================================

/// GET /v1/sessions/{session_id}/report
///
/// Full dashboard report for the selected sheet.
pub async fn get_report(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Query(query): Query<ReportQuery>,
) -> HandlerResult<DashboardReport> {
    let report = compute_report(&state, &session_id, &query).await?;
    Ok(Json(report))
}

/// GET /v1/sessions/{session_id}/exports/shift-plan.csv
pub async fn export_shift_plan(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Query(query): Query<ReportQuery>,
) -> Result<Response, AppError> {
    let report = compute_report(&state, &session_id, &query).await?;
    let plan = ready_or_unavailable("staffing", report.staffing)?;
    let csv = io::shift_plan_csv(&plan)?;
    Ok(csv_response(io::SHIFT_PLAN_FILE, csv))
}

/// GET /v1/sessions/{session_id}/exports/forecast.csv
pub async fn export_forecast(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Query(query): Query<ReportQuery>,
) -> Result<Response, AppError> {
    let report = compute_report(&state, &session_id, &query).await?;
    let forecast = ready_or_unavailable("forecast", report.forecast)?;
    let csv = io::forecast_csv(&forecast)?;
    Ok(csv_response(io::FORECAST_FILE, csv))
}
