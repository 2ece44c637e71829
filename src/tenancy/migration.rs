//! Tenant schema migration
//!
//! Every tenant database receives the additive migration set under
//! `migrations/tenant`. Tenants are processed one at a time in registry
//! order.

use crate::config::TenantMigrationPolicy;
use crate::domain::{StringUuid, TenantConnectionInformation};
use crate::error::Result;
use crate::repository::TenantRegistryRepository;
use crate::tenancy::TenantConnector;
use async_trait::async_trait;
use sqlx::migrate::Migrator;
use std::sync::Arc;
use tracing::{error, info, warn};

static TENANT_MIGRATOR: Migrator = sqlx::migrate!("./migrations/tenant");

/// Brings one tenant database up to the current tenant schema
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TenantSchemaMigrator: Send + Sync {
    async fn migrate(&self, tenant: &TenantConnectionInformation) -> Result<()>;
}

pub struct SqlxTenantMigrator {
    connector: Arc<dyn TenantConnector>,
}

impl SqlxTenantMigrator {
    pub fn new(connector: Arc<dyn TenantConnector>) -> Self {
        Self { connector }
    }
}

#[async_trait]
impl TenantSchemaMigrator for SqlxTenantMigrator {
    async fn migrate(&self, tenant: &TenantConnectionInformation) -> Result<()> {
        let pool = self.connector.connect(tenant).await?;
        let result = TENANT_MIGRATOR.run(&pool).await;
        pool.close().await;
        result?;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct TenantMigrationFailure {
    pub tenant_id: StringUuid,
    pub tenant_name: String,
    pub error: String,
}

/// Outcome of a migration run over the whole registry
#[derive(Debug, Clone, Default)]
pub struct TenantMigrationReport {
    pub migrated: Vec<StringUuid>,
    pub failed: Vec<TenantMigrationFailure>,
}

impl TenantMigrationReport {
    pub fn attempted(&self) -> usize {
        self.migrated.len() + self.failed.len()
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Error naming the failed tenants, if any
    pub fn ensure_complete(&self) -> anyhow::Result<()> {
        if self.is_success() {
            return Ok(());
        }
        let names: Vec<&str> = self.failed.iter().map(|f| f.tenant_name.as_str()).collect();
        anyhow::bail!(
            "{} of {} tenant migrations failed: {}",
            self.failed.len(),
            self.attempted(),
            names.join(", ")
        )
    }
}

/// Migrate every registered tenant.
///
/// With [`TenantMigrationPolicy::FailFast`] the first failure stops the run
/// and is returned as an error; remaining tenants are not attempted. With
/// [`TenantMigrationPolicy::Isolated`] every tenant is attempted and the
/// failures are collected in the report.
pub async fn migrate_all_tenants<R, M>(
    registry: &R,
    migrator: &M,
    policy: TenantMigrationPolicy,
) -> anyhow::Result<TenantMigrationReport>
where
    R: TenantRegistryRepository + ?Sized,
    M: TenantSchemaMigrator + ?Sized,
{
    let tenants = registry
        .list_all()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read tenant registry: {}", e))?;

    if tenants.is_empty() {
        info!("Tenant registry is empty, no tenant migrations to run");
        return Ok(TenantMigrationReport::default());
    }

    info!(count = tenants.len(), ?policy, "Migrating tenant schemas");
    let mut report = TenantMigrationReport::default();

    for tenant in &tenants {
        match migrator.migrate(tenant).await {
            Ok(()) => {
                info!(tenant_id = %tenant.id, tenant = %tenant.name, "Tenant schema migrated");
                report.migrated.push(tenant.id);
            }
            Err(e) => {
                if policy == TenantMigrationPolicy::FailFast {
                    error!(tenant_id = %tenant.id, tenant = %tenant.name, error = %e, "Tenant migration failed");
                    anyhow::bail!(
                        "Migration of tenant {} ({}) failed: {}",
                        tenant.name,
                        tenant.id,
                        e
                    );
                }
                warn!(tenant_id = %tenant.id, tenant = %tenant.name, error = %e, "Tenant migration failed, continuing");
                report.failed.push(TenantMigrationFailure {
                    tenant_id: tenant.id,
                    tenant_name: tenant.name.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    info!(
        migrated = report.migrated.len(),
        failed = report.failed.len(),
        "Tenant migrations finished"
    );
    Ok(report)
}
