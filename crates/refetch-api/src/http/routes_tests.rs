//! Tests for router assembly and the monitoring endpoints.

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use refetch_scheduler::{ActionSink, SchedulerConfig, SchedulerService, SinkError};

use super::*;
use crate::state::AppState;

struct NullSink;

#[async_trait]
impl ActionSink for NullSink {
    async fn enqueue(&self, _url: &str, _folder: Option<&str>) -> Result<(), SinkError> {
        Ok(())
    }
}

fn create_test_router() -> Router {
    let scheduler = Arc::new(SchedulerService::new(
        Arc::new(NullSink),
        SchedulerConfig::default(),
    ));
    create_router(Arc::new(AppState::new(scheduler)))
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_router();
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["schedules"], 0);
    assert_eq!(json["runners"], 0);
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn test_livez_endpoint() {
    let app = create_test_router();
    let response = app
        .oneshot(Request::builder().uri("/livez").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_list_endpoint_mounted() {
    let app = create_test_router();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/scheduler/list")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_add_endpoint_rejects_get() {
    let app = create_test_router();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/scheduler/add")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = create_test_router();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/scheduler/unknown")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
