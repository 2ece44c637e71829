//! Application state traits for dependency injection
//!
//! Handlers are generic over these traits so the same code runs against
//! the production `AppState` and against in-memory test states.

use crate::config::Config;
use crate::domain::StringUuid;
use crate::error::Result;
use crate::repository::UserRepository;
use crate::service::UserService;
use std::future::Future;

/// Access to the master-database services
pub trait HasServices: Clone + Send + Sync + 'static {
    /// The master user repository type
    type MasterUserRepo: UserRepository;

    /// Get the application configuration
    fn config(&self) -> &Config;

    /// Get the service for users stored in the master database
    fn master_user_service(&self) -> &UserService<Self::MasterUserRepo>;

    /// Whether the master database is reachable
    fn check_ready(&self) -> impl Future<Output = bool> + Send;
}

/// Access to per-tenant services
pub trait HasTenants: Clone + Send + Sync + 'static {
    /// The tenant user repository type
    type TenantUserRepo: UserRepository;

    /// Get the user service bound to one tenant's database.
    ///
    /// Fails with `NotFound` when the tenant is not registered.
    fn tenant_user_service(
        &self,
        tenant_id: StringUuid,
    ) -> impl Future<Output = Result<UserService<Self::TenantUserRepo>>> + Send;
}
