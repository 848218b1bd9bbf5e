#![cfg(feature = "http-server")]

mod support;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use desk_analytics::config::AnalyticsConfig;
use desk_analytics::http::{create_router, AppState};

use base64::{engine::general_purpose::STANDARD, Engine as _};

use support::{staff_csv, weekly_tickets_csv, weekly_tickets_xlsx};

fn app() -> Router {
    create_router(AppState::new(AnalyticsConfig::default()))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>, Option<String>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec(), content_type)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn create_session(app: &Router) -> String {
    let body = json!({
        "sheets": [
            { "name": "tickets", "csv": weekly_tickets_csv(3) },
            { "name": "staff", "csv": staff_csv() }
        ]
    });
    let (status, bytes, _) = send(app, json_request("POST", "/v1/sessions", body)).await;
    assert_eq!(status, StatusCode::CREATED);

    let created: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(created["sheets"], json!(["tickets", "staff"]));
    assert_eq!(created["selected_sheet"], "tickets");
    created["session_id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health() {
    let app = app();
    let (status, bytes, _) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);

    let health: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(health["status"], "ok");
    assert_eq!(health["sessions"], 0);
}

#[tokio::test]
async fn test_report_and_exports() {
    let app = app();
    let id = create_session(&app).await;

    let (status, bytes, _) = send(&app, get(&format!("/v1/sessions/{}/report", id))).await;
    assert_eq!(status, StatusCode::OK);
    let report: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(report["sheet"], "tickets");
    assert_eq!(report["forecast"]["status"], "ready");
    assert_eq!(report["forecast"]["data"]["points"].as_array().unwrap().len(), 14);
    assert_eq!(report["region_heatmap"]["status"], "unavailable");
    assert_eq!(
        report["region_heatmap"]["issue"]["kind"],
        "missing_columns"
    );

    let (status, bytes, content_type) = send(
        &app,
        get(&format!(
            "/v1/sessions/{}/exports/shift-plan.csv?tickets_per_day=4",
            id
        )),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(content_type.unwrap().starts_with("text/csv"));
    let csv = String::from_utf8(bytes).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "Date,Forecasted Tickets,Agents Needed");
    assert_eq!(lines[1], "2024-01-22,10.00,3");

    let (status, bytes, _) =
        send(&app, get(&format!("/v1/sessions/{}/exports/forecast.csv", id))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(String::from_utf8(bytes)
        .unwrap()
        .starts_with("Date,Forecasted Tickets\n"));
}

#[tokio::test]
async fn test_sheet_selection() {
    let app = app();
    let id = create_session(&app).await;

    let (status, bytes, _) = send(
        &app,
        json_request(
            "PUT",
            &format!("/v1/sessions/{}/sheet", id),
            json!({ "sheet": "staff" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let session: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(session["selected_sheet"], "staff");

    let (status, bytes, _) = send(
        &app,
        get(&format!("/v1/sessions/{}/exports/shift-plan.csv", id)),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let error: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(error["code"], "SECTION_UNAVAILABLE");

    let (status, _, _) = send(
        &app,
        json_request(
            "PUT",
            &format!("/v1/sessions/{}/sheet", id),
            json!({ "sheet": "nope" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_overrides_and_uploads() {
    let app = app();
    let id = create_session(&app).await;

    let (status, bytes, _) = send(
        &app,
        get(&format!("/v1/sessions/{}/report?seasonality=monthly", id)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(error["code"], "INVALID_CONFIGURATION");

    let (status, _, _) = send(
        &app,
        json_request("POST", "/v1/sessions", json!({ "sheets": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _, _) = send(
        &app,
        json_request(
            "POST",
            "/v1/sessions",
            json!({ "workbook_base64": "%%%" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _, _) = send(
        &app,
        json_request(
            "POST",
            "/v1/sessions",
            json!({ "workbook_base64": STANDARD.encode(b"not a workbook") }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_excel_upload() {
    let app = app();
    let body = json!({ "workbook_base64": STANDARD.encode(weekly_tickets_xlsx(3)) });
    let (status, bytes, _) = send(&app, json_request("POST", "/v1/sessions", body)).await;
    assert_eq!(status, StatusCode::CREATED);

    let created: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(created["sheets"], json!(["tickets", "staff"]));
    assert_eq!(created["selected_sheet"], "tickets");
    let id = created["session_id"].as_str().unwrap();

    let (status, bytes, _) = send(&app, get(&format!("/v1/sessions/{}/report", id))).await;
    assert_eq!(status, StatusCode::OK);
    let report: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(report["volume"]["status"], "ready");
    assert_eq!(report["forecast"]["status"], "ready");
    assert_eq!(report["forecast"]["data"]["points"].as_array().unwrap().len(), 14);
}

#[tokio::test]
async fn test_delete_session() {
    let app = app();
    let id = create_session(&app).await;

    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/v1/sessions/{}", id))
        .body(Body::empty())
        .unwrap();
    let (status, _, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _, _) = send(&app, get(&format!("/v1/sessions/{}/sheets", id))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
