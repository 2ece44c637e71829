//! Tenant user API HTTP handler tests

use super::{build_test_router, delete_json, get_json, post_json, put_json, TestAppState};
use crate::api::create_test_user;
use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use tenancy_core::api::{MessageResponse, PaginatedResponse, SuccessResponse};
use tenancy_core::domain::{StringUuid, User};

fn users_path(tenant_id: StringUuid) -> String {
    format!("/api/v1/tenants/{}/users", tenant_id)
}

fn new_user_input(email: &str) -> serde_json::Value {
    json!({
        "email": email,
        "first_name": "Ten",
        "last_name": "Ant",
        "password": "tenant-password"
    })
}

#[tokio::test]
async fn test_create_and_list_in_tenant() {
    let tenant = StringUuid::new_v4();
    let state = TestAppState::with_tenants(&[tenant]);
    let app = build_test_router(state.clone());

    let (status, _): (StatusCode, Option<SuccessResponse<User>>) =
        post_json(&app, &users_path(tenant), &new_user_input("a@acme.com")).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body): (StatusCode, Option<PaginatedResponse<User>>) =
        get_json(&app, &users_path(tenant)).await;
    assert_eq!(status, StatusCode::OK);
    let response = body.unwrap();
    assert_eq!(response.data.len(), 1);
    assert_eq!(response.data[0].email, "a@acme.com");
    assert_eq!(state.tenant_repo(tenant).len().await, 1);
}

#[tokio::test]
async fn test_list_tenant_users_rejects_huge_page() {
    let tenant = StringUuid::new_v4();
    let app = build_test_router(TestAppState::with_tenants(&[tenant]));

    let (status, _): (StatusCode, Option<serde_json::Value>) = get_json(
        &app,
        &format!("{}?page={}", users_path(tenant), i64::MAX),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_tenant_is_404() {
    let app = build_test_router(TestAppState::with_tenants(&[StringUuid::new_v4()]));
    let stranger = StringUuid::new_v4();

    let (status, body): (StatusCode, Option<serde_json::Value>) =
        get_json(&app, &users_path(stranger)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body.unwrap()["error"], "not_found");

    let (status, _): (StatusCode, Option<serde_json::Value>) =
        post_json(&app, &users_path(stranger), &new_user_input("x@y.com")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_no_cross_tenant_leakage() {
    let acme = StringUuid::new_v4();
    let globex = StringUuid::new_v4();
    let state = TestAppState::with_tenants(&[acme, globex]);

    let acme_user = create_test_user("wile@acme.com");
    let acme_user_id = acme_user.id;
    state.tenant_repo(acme).add_user(acme_user).await;
    let app = build_test_router(state.clone());

    let (status, body): (StatusCode, Option<PaginatedResponse<User>>) =
        get_json(&app, &users_path(globex)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.unwrap().data.is_empty());

    let (status, _): (StatusCode, Option<serde_json::Value>) = get_json(
        &app,
        &format!("{}/{}", users_path(globex), acme_user_id),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _): (StatusCode, Option<MessageResponse>) = delete_json(
        &app,
        &format!("{}/{}", users_path(globex), acme_user_id),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(state.tenant_repo(acme).len().await, 1);

    // The same email may exist independently in each tenant
    let (status, _): (StatusCode, Option<SuccessResponse<User>>) =
        post_json(&app, &users_path(globex), &new_user_input("wile@acme.com")).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(state.master_repo.len().await, 0);
}

#[tokio::test]
async fn test_get_update_delete_tenant_user() {
    let tenant = StringUuid::new_v4();
    let state = TestAppState::with_tenants(&[tenant]);
    let user = create_test_user("road@acme.com");
    let id = user.id;
    state.tenant_repo(tenant).add_user(user).await;
    let app = build_test_router(state.clone());
    let user_path = format!("{}/{}", users_path(tenant), id);

    let (status, body): (StatusCode, Option<SuccessResponse<User>>) =
        get_json(&app, &user_path).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.unwrap().data.id, id);

    let (status, body): (StatusCode, Option<SuccessResponse<User>>) =
        put_json(&app, &user_path, &json!({"last_name": "Runner"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.unwrap().data.last_name, "Runner");

    let (status, _): (StatusCode, Option<MessageResponse>) = delete_json(&app, &user_path).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(state.tenant_repo(tenant).len().await, 0);
}

#[tokio::test]
async fn test_update_with_invalid_email_rejected() {
    let tenant = StringUuid::new_v4();
    let state = TestAppState::with_tenants(&[tenant]);
    let user = create_test_user("road@acme.com");
    let id = user.id;
    state.tenant_repo(tenant).add_user(user).await;
    let app = build_test_router(state);

    let (status, _): (StatusCode, Option<serde_json::Value>) = put_json(
        &app,
        &format!("{}/{}", users_path(tenant), id),
        &json!({"email": "nope"}),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}
