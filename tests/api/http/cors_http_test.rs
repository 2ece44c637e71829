//! CORS behaviour of the production router

use super::{build_test_router, send, TestAppState};
use axum::http::{header, Method, StatusCode};
use tenancy_core::middleware::cors::{ALLOW_HEADERS, ALLOW_ORIGIN};

#[tokio::test]
async fn test_options_any_route_returns_empty_200() {
    let app = build_test_router(TestAppState::new());

    for path in [
        "/api/v1/master-users",
        "/api/v1/tenants/not-even-a-uuid/users",
        "/definitely/not/a/route",
    ] {
        let response = send(&app, Method::OPTIONS, path, None, None).await;

        assert_eq!(response.status(), StatusCode::OK, "path {}", path);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            ALLOW_ORIGIN
        );
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_HEADERS],
            ALLOW_HEADERS
        );
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(body.is_empty());
    }
}

#[tokio::test]
async fn test_regular_responses_carry_cors_headers() {
    let app = build_test_router(TestAppState::new());

    let response = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        ALLOW_ORIGIN
    );

    let response = send(&app, Method::GET, "/missing", None, None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_HEADERS],
        ALLOW_HEADERS
    );
}
