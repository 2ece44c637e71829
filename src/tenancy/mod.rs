//! Tenant resolution and tenant schema migration

pub mod connection;
pub mod migration;

pub use connection::{MySqlTenantConnector, TenantConnections, TenantConnector};
pub use migration::{
    migrate_all_tenants, SqlxTenantMigrator, TenantMigrationFailure, TenantMigrationReport,
    TenantSchemaMigrator,
};
