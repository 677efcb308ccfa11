//! API endpoint tests
//!
//! Drives the router directly via tower's `oneshot` without binding a
//! socket.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use drivewatch::api::{ApiState, build_router};
use drivewatch::config::Thresholds;
use pretty_assertions::assert_eq;
use serde_json::Value;
use tower::ServiceExt;

use crate::helpers::*;

fn test_state(notifier: Arc<RecordingNotifier>) -> ApiState {
    let (engine, store) = test_engine(notifier);
    ApiState::new(
        engine,
        store,
        Thresholds {
            soft_gb: 50.0,
            hard_gb: 20.0,
        },
    )
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn post_status_with_camel_case_fields() {
    let notifier = RecordingNotifier::new();
    let app = build_router(test_state(notifier.clone()));

    let response = app
        .oneshot(post_json(
            "/status",
            r#"{"machine":"A","timestamp":"2024-12-10T10:00:00Z","cDriveSpaceGb":15.0,"dDriveSpaceGb":60.0}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["classification"], "critical");
    assert_eq!(json["alerted"], true);
    assert_eq!(notifier.sent_count().await, 1);
}

#[tokio::test]
async fn post_status_with_snake_case_fields() {
    let notifier = RecordingNotifier::new();
    let app = build_router(test_state(notifier.clone()));

    let response = app
        .oneshot(post_json(
            "/status",
            r#"{"machine":"A","timestamp":"2024-12-10T10:00:00Z","c_drive_space_gb":35.0,"d_drive_space_gb":60.0}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["classification"], "warning");
}

#[tokio::test]
async fn post_status_with_empty_machine_is_bad_request() {
    let notifier = RecordingNotifier::new();
    let app = build_router(test_state(notifier.clone()));

    let response = app
        .oneshot(post_json(
            "/status",
            r#"{"machine":"","timestamp":"2024-12-10T10:00:00Z","cDriveSpaceGb":15.0,"dDriveSpaceGb":60.0}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(notifier.sent_count().await, 0);
}

#[tokio::test]
async fn get_status_for_known_machine() {
    let notifier = RecordingNotifier::new();
    let state = test_state(notifier);
    state
        .engine
        .ingest(report("station-01", 80.0, 90.0))
        .await
        .unwrap();

    let app = build_router(state);
    let response = app
        .oneshot(
            Request::builder()
                .uri("/status/station-01")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["machine"], "station-01");
    assert_eq!(json["c_drive_space_gb"], 80.0);
}

#[tokio::test]
async fn get_status_for_unknown_machine_is_not_found() {
    let notifier = RecordingNotifier::new();
    let app = build_router(test_state(notifier));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/status/ghost")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn report_renders_fleet_as_html() {
    let notifier = RecordingNotifier::new();
    let state = test_state(notifier);
    state
        .engine
        .ingest(report("station-01", 15.0, 60.0))
        .await
        .unwrap();

    let app = build_router(state);
    let response = app
        .oneshot(
            Request::builder()
                .uri("/report")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(content_type.starts_with("text/html"));

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("station-01"));
    assert!(html.contains(r#"<tr class="danger">"#));
}

#[tokio::test]
async fn health_endpoint_reports_ok() {
    let notifier = RecordingNotifier::new();
    let app = build_router(test_state(notifier));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
}
