//! OpenAPI 3.0 documentation assembly
//!
//! Served through Swagger UI in development only.

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Tenancy Core API",
        version = "0.1.0",
        description = "Multitenant backend: master users, tenant users and sessions",
        license(name = "Proprietary"),
        contact(name = "Tenancy Team")
    ),
    tags(
        (name = "System", description = "Health checks"),
        (name = "Master Users", description = "Users stored in the master database"),
        (name = "Tenant Users", description = "Users stored in each tenant database"),
        (name = "Sessions", description = "Cookie session login and logout"),
    ),
    components(
        schemas(
            crate::api::PaginationQuery,
            crate::api::PaginationMeta,
            crate::api::MessageResponse,
            crate::api::health::HealthResponse,
            crate::domain::StringUuid,
            crate::domain::User,
            crate::domain::CreateUserInput,
            crate::domain::UpdateUserInput,
            crate::domain::LoginInput,
            crate::domain::HostProfile,
            crate::domain::ClientProfile,
            crate::domain::SessionProfile,
            crate::domain::TenantConnectionInformation,
        ),
    ),
    paths(
        crate::api::health::health,
        crate::api::health::ready,

        crate::api::master_user::list,
        crate::api::master_user::get,
        crate::api::master_user::create,
        crate::api::master_user::update,
        crate::api::master_user::delete,

        crate::api::tenant_user::list,
        crate::api::tenant_user::get,
        crate::api::tenant_user::create,
        crate::api::tenant_user::update,
        crate::api::tenant_user::delete,

        crate::api::session::host_login,
        crate::api::session::client_login,
        crate::api::session::me,
        crate::api::session::logout,
    ),
)]
pub struct ApiDoc;
