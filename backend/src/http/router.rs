//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Largest accepted upload body.
const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration - permissive for development, should be restricted in production
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Session lifecycle
        .route("/sessions", post(handlers::create_session))
        .route("/sessions/{session_id}", delete(handlers::delete_session))
        .route("/sessions/{session_id}/sheets", get(handlers::list_sheets))
        .route("/sessions/{session_id}/sheet", put(handlers::select_sheet))
        // Analytics
        .route("/sessions/{session_id}/report", get(handlers::get_report))
        .route(
            "/sessions/{session_id}/exports/shift-plan.csv",
            get(handlers::export_shift_plan),
        )
        .route(
            "/sessions/{session_id}/exports/forecast.csv",
            get(handlers::export_forecast),
        );

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalyticsConfig;

    #[test]
    fn test_router_creation() {
        let state = AppState::new(AnalyticsConfig::default());
        let _router = create_router(state);
    }
}
