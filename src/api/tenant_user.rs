//! Tenant user API handlers
//!
//! Every request is served from the database of the tenant named in the
//! path. An unregistered tenant yields 404.

use crate::api::{MessageResponse, PaginatedResponse, PaginationQuery, SuccessResponse};
use crate::domain::{CreateUserInput, StringUuid, UpdateUserInput};
use crate::error::Result;
use crate::state::HasTenants;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tracing::info;

#[utoipa::path(
    get,
    path = "/api/v1/tenants/{tenant_id}/users",
    tag = "Tenant Users",
    params(
        ("tenant_id" = String, Path, description = "Tenant id"),
        PaginationQuery
    ),
    responses(
        (status = 200, description = "Paginated tenant users"),
        (status = 404, description = "Unknown tenant")
    )
)]
/// List users of a tenant
pub async fn list<S: HasTenants>(
    State(state): State<S>,
    Path(tenant_id): Path<StringUuid>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<impl IntoResponse> {
    let service = state.tenant_user_service(tenant_id).await?;
    let (users, total) = service.list(pagination.page, pagination.per_page).await?;

    Ok(Json(PaginatedResponse::new(
        users,
        pagination.page,
        pagination.per_page,
        total,
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/tenants/{tenant_id}/users/{id}",
    tag = "Tenant Users",
    params(
        ("tenant_id" = String, Path, description = "Tenant id"),
        ("id" = String, Path, description = "User id")
    ),
    responses(
        (status = 200, description = "Tenant user", body = crate::domain::User),
        (status = 404, description = "Unknown tenant or user")
    )
)]
/// Get tenant user by ID
pub async fn get<S: HasTenants>(
    State(state): State<S>,
    Path((tenant_id, id)): Path<(StringUuid, StringUuid)>,
) -> Result<impl IntoResponse> {
    let user = state.tenant_user_service(tenant_id).await?.get(id).await?;
    Ok(Json(SuccessResponse::new(user)))
}

#[utoipa::path(
    post,
    path = "/api/v1/tenants/{tenant_id}/users",
    tag = "Tenant Users",
    params(("tenant_id" = String, Path, description = "Tenant id")),
    request_body = CreateUserInput,
    responses(
        (status = 201, description = "Tenant user created", body = crate::domain::User),
        (status = 404, description = "Unknown tenant"),
        (status = 409, description = "Email already in use")
    )
)]
/// Create a user in a tenant
pub async fn create<S: HasTenants>(
    State(state): State<S>,
    Path(tenant_id): Path<StringUuid>,
    Json(input): Json<CreateUserInput>,
) -> Result<impl IntoResponse> {
    let user = state
        .tenant_user_service(tenant_id)
        .await?
        .create(input)
        .await?;
    info!(tenant_id = %tenant_id, user_id = %user.id, "Tenant user created");
    Ok((StatusCode::CREATED, Json(SuccessResponse::new(user))))
}

#[utoipa::path(
    put,
    path = "/api/v1/tenants/{tenant_id}/users/{id}",
    tag = "Tenant Users",
    params(
        ("tenant_id" = String, Path, description = "Tenant id"),
        ("id" = String, Path, description = "User id")
    ),
    request_body = UpdateUserInput,
    responses(
        (status = 200, description = "Tenant user updated", body = crate::domain::User),
        (status = 404, description = "Unknown tenant or user")
    )
)]
/// Update a tenant user
pub async fn update<S: HasTenants>(
    State(state): State<S>,
    Path((tenant_id, id)): Path<(StringUuid, StringUuid)>,
    Json(input): Json<UpdateUserInput>,
) -> Result<impl IntoResponse> {
    let user = state
        .tenant_user_service(tenant_id)
        .await?
        .update(id, input)
        .await?;
    Ok(Json(SuccessResponse::new(user)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/tenants/{tenant_id}/users/{id}",
    tag = "Tenant Users",
    params(
        ("tenant_id" = String, Path, description = "Tenant id"),
        ("id" = String, Path, description = "User id")
    ),
    responses(
        (status = 200, description = "Tenant user deleted", body = MessageResponse),
        (status = 404, description = "Unknown tenant or user")
    )
)]
/// Delete a tenant user
pub async fn delete<S: HasTenants>(
    State(state): State<S>,
    Path((tenant_id, id)): Path<(StringUuid, StringUuid)>,
) -> Result<impl IntoResponse> {
    state.tenant_user_service(tenant_id).await?.delete(id).await?;
    info!(tenant_id = %tenant_id, user_id = %id, "Tenant user deleted");
    Ok(Json(MessageResponse::new("User deleted successfully")))
}
