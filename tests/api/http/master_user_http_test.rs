//! Master user API HTTP handler tests

use super::{build_test_router, delete_json, get_json, post_json, put_json, TestAppState};
use crate::api::create_test_user;
use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use tenancy_core::api::{MessageResponse, PaginatedResponse, SuccessResponse};
use tenancy_core::domain::{StringUuid, User};

#[tokio::test]
async fn test_list_master_users_paginated() {
    let state = TestAppState::new();
    for i in 1..=25 {
        state
            .master_repo
            .add_user(create_test_user(&format!("user{}@example.com", i)))
            .await;
    }
    let app = build_test_router(state);

    let (status, body): (StatusCode, Option<PaginatedResponse<User>>) =
        get_json(&app, "/api/v1/master-users?page=2&per_page=10").await;

    assert_eq!(status, StatusCode::OK);
    let response = body.unwrap();
    assert_eq!(response.data.len(), 10);
    assert_eq!(response.pagination.total, 25);
    assert_eq!(response.pagination.page, 2);
    assert_eq!(response.pagination.total_pages, 3);
}

#[tokio::test]
async fn test_list_master_users_rejects_page_zero() {
    let app = build_test_router(TestAppState::new());

    let (status, _): (StatusCode, Option<serde_json::Value>) =
        get_json(&app, "/api/v1/master-users?page=0").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_master_users_rejects_huge_page() {
    let app = build_test_router(TestAppState::new());

    let (status, body): (StatusCode, Option<serde_json::Value>) = get_json(
        &app,
        &format!("/api/v1/master-users?page={}", i64::MAX),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body.unwrap()["error"], "bad_request");
}

#[tokio::test]
async fn test_create_master_user() {
    let state = TestAppState::new();
    let app = build_test_router(state.clone());

    let input = json!({
        "email": "root@example.com",
        "first_name": "Root",
        "last_name": "Admin",
        "password": "a-strong-password"
    });
    let (status, body): (StatusCode, Option<serde_json::Value>) =
        post_json(&app, "/api/v1/master-users", &input).await;

    assert_eq!(status, StatusCode::CREATED);
    let body = body.unwrap();
    assert_eq!(body["data"]["email"], "root@example.com");
    assert!(body["data"].get("password_hash").is_none());
    assert!(body["data"].get("password").is_none());
    assert_eq!(state.master_repo.len().await, 1);
}

#[tokio::test]
async fn test_create_master_user_duplicate_email() {
    let state = TestAppState::new();
    state
        .master_repo
        .add_user(create_test_user("root@example.com"))
        .await;
    let app = build_test_router(state);

    let input = json!({
        "email": "root@example.com",
        "first_name": "Root",
        "last_name": "Admin",
        "password": "a-strong-password"
    });
    let (status, body): (StatusCode, Option<serde_json::Value>) =
        post_json(&app, "/api/v1/master-users", &input).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body.unwrap()["error"], "conflict");
}

#[tokio::test]
async fn test_create_master_user_validation() {
    let app = build_test_router(TestAppState::new());

    let input = json!({
        "email": "not-an-email",
        "first_name": "",
        "last_name": "Admin",
        "password": "short"
    });
    let (status, body): (StatusCode, Option<serde_json::Value>) =
        post_json(&app, "/api/v1/master-users", &input).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body.unwrap()["error"], "validation");
}

#[tokio::test]
async fn test_get_master_user() {
    let state = TestAppState::new();
    let user = create_test_user("jane@example.com");
    let id = user.id;
    state.master_repo.add_user(user).await;
    let app = build_test_router(state);

    let (status, body): (StatusCode, Option<SuccessResponse<User>>) =
        get_json(&app, &format!("/api/v1/master-users/{}", id)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.unwrap().data.email, "jane@example.com");
}

#[tokio::test]
async fn test_get_master_user_not_found() {
    let app = build_test_router(TestAppState::new());

    let (status, body): (StatusCode, Option<serde_json::Value>) =
        get_json(&app, &format!("/api/v1/master-users/{}", StringUuid::new_v4())).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body.unwrap()["error"], "not_found");
}

#[tokio::test]
async fn test_get_master_user_malformed_id() {
    let app = build_test_router(TestAppState::new());

    let (status, _): (StatusCode, Option<serde_json::Value>) =
        get_json(&app, "/api/v1/master-users/not-a-uuid").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_master_user() {
    let state = TestAppState::new();
    let user = create_test_user("jane@example.com");
    let id = user.id;
    state.master_repo.add_user(user).await;
    let app = build_test_router(state);

    let (status, body): (StatusCode, Option<SuccessResponse<User>>) = put_json(
        &app,
        &format!("/api/v1/master-users/{}", id),
        &json!({"first_name": "Janet"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let user = body.unwrap().data;
    assert_eq!(user.first_name, "Janet");
    assert_eq!(user.email, "jane@example.com");
}

#[tokio::test]
async fn test_delete_master_user() {
    let state = TestAppState::new();
    let user = create_test_user("jane@example.com");
    let id = user.id;
    state.master_repo.add_user(user).await;
    let app = build_test_router(state.clone());

    let (status, body): (StatusCode, Option<MessageResponse>) =
        delete_json(&app, &format!("/api/v1/master-users/{}", id)).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.is_some());
    assert_eq!(state.master_repo.len().await, 0);

    let (status, _): (StatusCode, Option<MessageResponse>) =
        delete_json(&app, &format!("/api/v1/master-users/{}", id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
