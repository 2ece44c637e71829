//! Master user API handlers
//!
//! Users of the host application, stored in `master_users` of the master
//! database.

use crate::api::{MessageResponse, PaginatedResponse, PaginationQuery, SuccessResponse};
use crate::domain::{CreateUserInput, StringUuid, UpdateUserInput};
use crate::error::Result;
use crate::state::HasServices;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tracing::info;

#[utoipa::path(
    get,
    path = "/api/v1/master-users",
    tag = "Master Users",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Paginated master users")
    )
)]
/// List master users
pub async fn list<S: HasServices>(
    State(state): State<S>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<impl IntoResponse> {
    let (users, total) = state
        .master_user_service()
        .list(pagination.page, pagination.per_page)
        .await?;

    Ok(Json(PaginatedResponse::new(
        users,
        pagination.page,
        pagination.per_page,
        total,
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/master-users/{id}",
    tag = "Master Users",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "Master user", body = crate::domain::User),
        (status = 404, description = "Unknown user")
    )
)]
/// Get master user by ID
pub async fn get<S: HasServices>(
    State(state): State<S>,
    Path(id): Path<StringUuid>,
) -> Result<impl IntoResponse> {
    let user = state.master_user_service().get(id).await?;
    Ok(Json(SuccessResponse::new(user)))
}

#[utoipa::path(
    post,
    path = "/api/v1/master-users",
    tag = "Master Users",
    request_body = CreateUserInput,
    responses(
        (status = 201, description = "Master user created", body = crate::domain::User),
        (status = 409, description = "Email already in use"),
        (status = 422, description = "Invalid input")
    )
)]
/// Create master user
pub async fn create<S: HasServices>(
    State(state): State<S>,
    Json(input): Json<CreateUserInput>,
) -> Result<impl IntoResponse> {
    let user = state.master_user_service().create(input).await?;
    info!(user_id = %user.id, "Master user created");
    Ok((StatusCode::CREATED, Json(SuccessResponse::new(user))))
}

#[utoipa::path(
    put,
    path = "/api/v1/master-users/{id}",
    tag = "Master Users",
    params(("id" = String, Path, description = "User id")),
    request_body = UpdateUserInput,
    responses(
        (status = 200, description = "Master user updated", body = crate::domain::User),
        (status = 404, description = "Unknown user")
    )
)]
/// Update master user
pub async fn update<S: HasServices>(
    State(state): State<S>,
    Path(id): Path<StringUuid>,
    Json(input): Json<UpdateUserInput>,
) -> Result<impl IntoResponse> {
    let user = state.master_user_service().update(id, input).await?;
    Ok(Json(SuccessResponse::new(user)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/master-users/{id}",
    tag = "Master Users",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "Master user deleted", body = MessageResponse),
        (status = 404, description = "Unknown user")
    )
)]
/// Delete master user
pub async fn delete<S: HasServices>(
    State(state): State<S>,
    Path(id): Path<StringUuid>,
) -> Result<impl IntoResponse> {
    state.master_user_service().delete(id).await?;
    info!(user_id = %id, "Master user deleted");
    Ok(Json(MessageResponse::new("User deleted successfully")))
}
