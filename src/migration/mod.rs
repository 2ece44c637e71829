//! Schema migrations for the master and tenant databases
//!
//! Master migrations live under `migrations/master` and tenant migrations
//! under `migrations/tenant`. Both sets are additive only.

use crate::config::Config;
use crate::repository::TenantRegistryRepositoryImpl;
use crate::session::MySqlSessionStore;
use crate::tenancy::{
    migrate_all_tenants, MySqlTenantConnector, SqlxTenantMigrator, TenantMigrationReport,
};
use anyhow::{Context, Result};
use sqlx::mysql::MySqlPoolOptions;
use sqlx::migrate::Migrator;
use sqlx::MySqlPool;
use std::sync::Arc;
use tracing::{info, warn};

static MASTER_MIGRATOR: Migrator = sqlx::migrate!("./migrations/master");

/// Open the master database pool; any failure is fatal to startup
pub async fn connect_master(config: &Config) -> Result<MySqlPool> {
    info!("Connecting to master database...");
    let pool = MySqlPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await
        .context("Failed to connect to master database")?;
    Ok(pool)
}

pub async fn run_master_migrations(pool: &MySqlPool) -> Result<()> {
    info!("Running master database migrations...");
    MASTER_MIGRATOR
        .run(pool)
        .await
        .context("Failed to run master migrations")?;
    info!("Master database migrations completed");
    Ok(())
}

/// Create the sessions table unless the deployment manages it itself
pub async fn prepare_session_table(store: &MySqlSessionStore, config: &Config) -> Result<()> {
    if config.session.skip_create_table {
        info!(table = store.table_name(), "Skipping session table creation");
        return Ok(());
    }
    store
        .migrate()
        .await
        .with_context(|| format!("Failed to create session table {}", store.table_name()))?;
    Ok(())
}

/// Migrate every registered tenant according to the configured policy
pub async fn run_tenant_migrations(
    pool: &MySqlPool,
    config: &Config,
) -> Result<TenantMigrationReport> {
    let registry = TenantRegistryRepositoryImpl::new(pool.clone());
    let migrator = SqlxTenantMigrator::new(Arc::new(MySqlTenantConnector::new(1)));

    let report = migrate_all_tenants(&registry, &migrator, config.tenant_migration_policy).await?;
    for failure in &report.failed {
        warn!(
            tenant_id = %failure.tenant_id,
            tenant = %failure.tenant_name,
            error = %failure.error,
            "Tenant left on its previous schema"
        );
    }
    Ok(report)
}

/// Run every migration and return; used by the `migrate` command
pub async fn run_migrations(config: &Config) -> Result<()> {
    let pool = connect_master(config).await?;
    run_master_migrations(&pool).await?;

    let store = MySqlSessionStore::new(
        pool.clone(),
        crate::crypto::EncryptionKey::derive_from_password(&config.session.password),
    )
    .with_table_name(&config.session.table_name)
    .map_err(anyhow::Error::msg)?;
    prepare_session_table(&store, config).await?;

    let report = run_tenant_migrations(&pool, config).await;
    pool.close().await;
    let report = report?;
    info!(
        migrated = report.migrated.len(),
        failed = report.failed.len(),
        "All migrations completed"
    );

    // Partial runs under the isolated policy still fail the command.
    report.ensure_complete()
}
