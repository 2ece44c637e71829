//! Tenant registry repository (master database)

use crate::domain::{StringUuid, TenantConnectionInformation};
use crate::error::Result;
use async_trait::async_trait;
use sqlx::MySqlPool;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TenantRegistryRepository: Send + Sync {
    /// Every registered tenant, oldest first
    async fn list_all(&self) -> Result<Vec<TenantConnectionInformation>>;
    async fn find_by_id(&self, id: StringUuid) -> Result<Option<TenantConnectionInformation>>;
}

pub struct TenantRegistryRepositoryImpl {
    pool: MySqlPool,
}

impl TenantRegistryRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TenantRegistryRepository for TenantRegistryRepositoryImpl {
    async fn list_all(&self) -> Result<Vec<TenantConnectionInformation>> {
        let tenants = sqlx::query_as::<_, TenantConnectionInformation>(
            r#"
            SELECT id, name, host, port, username, password, schema_name, created_at, updated_at
            FROM tenant_connection_information
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(tenants)
    }

    async fn find_by_id(&self, id: StringUuid) -> Result<Option<TenantConnectionInformation>> {
        let tenant = sqlx::query_as::<_, TenantConnectionInformation>(
            r#"
            SELECT id, name, host, port, username, password, schema_name, created_at, updated_at
            FROM tenant_connection_information
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(tenant)
    }
}
