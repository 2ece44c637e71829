//! Health and documentation endpoint tests

use super::{build_test_router, get_json, send, TestAppState};
use axum::http::{Method, StatusCode};
use std::sync::atomic::Ordering;
use tenancy_core::api::health::HealthResponse;

#[tokio::test]
async fn test_health() {
    let app = build_test_router(TestAppState::new());

    let (status, body): (StatusCode, Option<HealthResponse>) = get_json(&app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.unwrap().status, "healthy");
}

#[tokio::test]
async fn test_ready_reflects_master_database() {
    let state = TestAppState::new();
    let app = build_test_router(state.clone());

    let response = send(&app, Method::GET, "/ready", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);

    state.ready.store(false, Ordering::SeqCst);
    let response = send(&app, Method::GET, "/ready", None, None).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_openapi_served_in_development() {
    let app = build_test_router(TestAppState::new());

    let (status, body): (StatusCode, Option<serde_json::Value>) =
        get_json(&app, "/api-docs/openapi.json").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.unwrap()["paths"]
        .get("/api/v1/master-users")
        .is_some());
}

#[tokio::test]
async fn test_swagger_hidden_in_production() {
    let mut state = TestAppState::new();
    let mut config = (*state.config).clone();
    config.environment = tenancy_core::config::Environment::Production;
    state.config = std::sync::Arc::new(config);
    let app = build_test_router(state);

    let response = send(&app, Method::GET, "/api-docs/openapi.json", None, None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(&app, Method::GET, "/swagger-ui/", None, None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
