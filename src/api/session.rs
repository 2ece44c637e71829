//! Session login/logout handlers

use crate::api::{MessageResponse, SuccessResponse};
use crate::domain::{ClientProfile, HostProfile, LoginInput, SessionProfile, StringUuid};
use crate::error::{AppError, Result};
use crate::session;
use crate::state::{HasServices, HasTenants};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use tower_sessions::Session;
use tracing::info;

#[utoipa::path(
    post,
    path = "/api/v1/sessions/host",
    tag = "Sessions",
    request_body = LoginInput,
    responses(
        (status = 200, description = "Logged in as a master user", body = SessionProfile),
        (status = 401, description = "Invalid credentials")
    )
)]
/// Log in a master user
pub async fn host_login<S: HasServices>(
    State(state): State<S>,
    session: Session,
    Json(input): Json<LoginInput>,
) -> Result<impl IntoResponse> {
    let user = state.master_user_service().authenticate(&input).await?;

    let profile = SessionProfile::Host(HostProfile {
        user_id: user.id,
        email: user.email,
    });
    session::start(&session, &profile).await?;
    info!(user_id = %profile.user_id(), "Host session started");

    Ok(Json(SuccessResponse::new(profile)))
}

#[utoipa::path(
    post,
    path = "/api/v1/tenants/{tenant_id}/sessions",
    tag = "Sessions",
    params(("tenant_id" = String, Path, description = "Tenant id")),
    request_body = LoginInput,
    responses(
        (status = 200, description = "Logged in as a tenant user", body = SessionProfile),
        (status = 401, description = "Invalid credentials"),
        (status = 404, description = "Unknown tenant")
    )
)]
/// Log in a tenant user
pub async fn client_login<S: HasTenants>(
    State(state): State<S>,
    Path(tenant_id): Path<StringUuid>,
    session: Session,
    Json(input): Json<LoginInput>,
) -> Result<impl IntoResponse> {
    let user = state
        .tenant_user_service(tenant_id)
        .await?
        .authenticate(&input)
        .await?;

    let profile = SessionProfile::Client(ClientProfile {
        user_id: user.id,
        tenant_id,
        email: user.email,
    });
    session::start(&session, &profile).await?;
    info!(user_id = %profile.user_id(), tenant_id = %tenant_id, "Client session started");

    Ok(Json(SuccessResponse::new(profile)))
}

#[utoipa::path(
    get,
    path = "/api/v1/sessions/me",
    tag = "Sessions",
    responses(
        (status = 200, description = "Profile of the current session", body = SessionProfile),
        (status = 401, description = "No active session")
    )
)]
/// Current session profile
pub async fn me(session: Session) -> Result<impl IntoResponse> {
    let profile = session::current_profile(&session)
        .await?
        .ok_or_else(|| AppError::Unauthorized("No active session".to_string()))?;
    Ok(Json(SuccessResponse::new(profile)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/sessions",
    tag = "Sessions",
    responses(
        (status = 200, description = "Session ended", body = MessageResponse)
    )
)]
/// Log out
pub async fn logout(session: Session) -> Result<impl IntoResponse> {
    session::end(&session).await?;
    Ok(Json(MessageResponse::new("Logged out")))
}
