//! Data access layer (Repository pattern)

pub mod tenant_registry;
pub mod user;

pub use tenant_registry::{TenantRegistryRepository, TenantRegistryRepositoryImpl};
pub use user::{UserRepository, UserRepositoryImpl, UserTable};
