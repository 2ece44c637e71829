//! Tenant connection resolution
//!
//! A tenant's database is reached through the connection parameters stored
//! in the master registry. Pools are opened on first use and kept for the
//! lifetime of the process.

use crate::domain::{StringUuid, TenantConnectionInformation};
use crate::error::{AppError, Result};
use crate::repository::TenantRegistryRepository;
use async_trait::async_trait;
use sqlx::mysql::MySqlPoolOptions;
use sqlx::MySqlPool;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// Opens a pool to a tenant database
#[async_trait]
pub trait TenantConnector: Send + Sync {
    async fn connect(&self, tenant: &TenantConnectionInformation) -> Result<MySqlPool>;
}

pub struct MySqlTenantConnector {
    max_connections: u32,
}

impl MySqlTenantConnector {
    pub fn new(max_connections: u32) -> Self {
        Self { max_connections }
    }
}

#[async_trait]
impl TenantConnector for MySqlTenantConnector {
    async fn connect(&self, tenant: &TenantConnectionInformation) -> Result<MySqlPool> {
        let pool = MySqlPoolOptions::new()
            .max_connections(self.max_connections)
            .connect_with(tenant.connect_options())
            .await?;
        Ok(pool)
    }
}

/// Resolves tenant ids to database pools
pub struct TenantConnections<R: TenantRegistryRepository> {
    registry: Arc<R>,
    connector: Arc<dyn TenantConnector>,
    pools: RwLock<HashMap<StringUuid, MySqlPool>>,
}

impl<R: TenantRegistryRepository> TenantConnections<R> {
    pub fn new(registry: Arc<R>, connector: Arc<dyn TenantConnector>) -> Self {
        Self {
            registry,
            connector,
            pools: RwLock::new(HashMap::new()),
        }
    }

    /// Pool for the given tenant; `NotFound` if the tenant is not registered
    pub async fn pool_for(&self, tenant_id: StringUuid) -> Result<MySqlPool> {
        if let Some(pool) = self.pools.read().await.get(&tenant_id) {
            return Ok(pool.clone());
        }

        let tenant = self
            .registry
            .find_by_id(tenant_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Tenant {} not found", tenant_id)))?;

        let pool = self.connector.connect(&tenant).await?;

        let mut pools = self.pools.write().await;
        if let Some(existing) = pools.get(&tenant_id).cloned() {
            // A concurrent request opened one first; keep it.
            drop(pools);
            pool.close().await;
            return Ok(existing);
        }
        pools.insert(tenant_id, pool.clone());
        info!(tenant_id = %tenant_id, schema = %tenant.schema_name, "Opened tenant connection");
        Ok(pool)
    }

    /// Number of tenant pools currently open
    pub async fn open_count(&self) -> usize {
        self.pools.read().await.len()
    }

    pub async fn close_all(&self) {
        let pools: Vec<MySqlPool> = self.pools.write().await.drain().map(|(_, p)| p).collect();
        for pool in pools {
            pool.close().await;
        }
    }
}
