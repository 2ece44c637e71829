//! Configuration management for Tenancy Core
//!
//! The first block of variables keeps the names the deployment has always
//! used (`dialect`, `connectionString`, `sessionsPassword`, `port`,
//! `environment`, `showSwag`); everything else is upper-case.

use anyhow::{bail, Context, Result};
use std::env;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server host
    pub http_host: String,
    /// HTTP server port
    pub http_port: u16,
    /// Deployment environment
    pub environment: Environment,
    /// Open the Swagger UI in a browser on startup (development only)
    pub show_swagger: bool,
    /// Master database configuration
    pub database: DatabaseConfig,
    /// Session store configuration
    pub session: SessionConfig,
    /// What to do when a tenant schema migration fails
    pub tenant_migration_policy: TenantMigrationPolicy,
    /// Telemetry configuration
    pub telemetry: TelemetryConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            _ => Err(format!("Unknown environment: {}", s)),
        }
    }
}

/// Supported database dialects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    MySql,
}

impl std::str::FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mysql" => Ok(Dialect::MySql),
            _ => Err(format!("Unsupported dialect: {} (only mysql is supported)", s)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub dialect: Dialect,
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    /// Pool size for each tenant database
    pub tenant_max_connections: u32,
}

#[derive(Clone)]
pub struct SessionConfig {
    /// Key material for cookie and row encryption
    pub password: String,
    pub table_name: String,
    pub skip_create_table: bool,
    pub cleanup_interval: Duration,
    /// Sessions expire after this much inactivity
    pub ttl_secs: i64,
}

impl std::fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionConfig")
            .field("password", &"[REDACTED]")
            .field("table_name", &self.table_name)
            .field("skip_create_table", &self.skip_create_table)
            .field("cleanup_interval", &self.cleanup_interval)
            .field("ttl_secs", &self.ttl_secs)
            .finish()
    }
}

/// Failure policy for the startup migration of tenant schemas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TenantMigrationPolicy {
    /// The first failing tenant aborts startup
    #[default]
    FailFast,
    /// Every tenant is attempted, failures are reported
    Isolated,
}

impl std::str::FromStr for TenantMigrationPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fail_fast" | "fail-fast" => Ok(TenantMigrationPolicy::FailFast),
            "isolated" => Ok(TenantMigrationPolicy::Isolated),
            _ => Err(format!("Unknown tenant migration policy: {}", s)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// "text" or "json"
    pub log_format: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let dialect = var("dialect")
            .context("dialect is required")?
            .parse::<Dialect>()
            .map_err(anyhow::Error::msg)?;

        let password = var("sessionsPassword").context("sessionsPassword is required")?;

        let environment = match var("environment") {
            Some(value) => value.parse().map_err(anyhow::Error::msg)?,
            None => Environment::Production,
        };

        let cleanup_interval_secs: u64 = var("SESSION_CLEANUP_INTERVAL_SECS")
            .unwrap_or_else(|| "3600".to_string())
            .parse()
            .context("Invalid SESSION_CLEANUP_INTERVAL_SECS")?;
        if cleanup_interval_secs == 0 {
            bail!("SESSION_CLEANUP_INTERVAL_SECS must be greater than zero");
        }

        Ok(Self {
            http_host: var("HTTP_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            http_port: var("port")
                .unwrap_or_else(|| "8000".to_string())
                .parse()
                .context("Invalid port")?,
            environment,
            show_swagger: var("showSwag")
                .map(|s| s.to_lowercase() == "true")
                .unwrap_or(false),
            database: DatabaseConfig {
                dialect,
                url: var("connectionString").context("connectionString is required")?,
                max_connections: var("DATABASE_MAX_CONNECTIONS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(10),
                min_connections: var("DATABASE_MIN_CONNECTIONS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(1),
                tenant_max_connections: var("TENANT_MAX_CONNECTIONS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(5),
            },
            session: SessionConfig {
                password,
                table_name: var("SESSION_TABLE_NAME").unwrap_or_else(|| "sessions".to_string()),
                skip_create_table: var("SESSION_SKIP_CREATE_TABLE")
                    .map(|s| s.to_lowercase() == "true")
                    .unwrap_or(false),
                cleanup_interval: Duration::from_secs(cleanup_interval_secs),
                ttl_secs: var("SESSION_TTL_SECS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(86400),
            },
            tenant_migration_policy: match var("TENANT_MIGRATION_POLICY") {
                Some(value) => value.parse().map_err(anyhow::Error::msg)?,
                None => TenantMigrationPolicy::default(),
            },
            telemetry: TelemetryConfig {
                log_format: var("LOG_FORMAT").unwrap_or_else(|| "text".to_string()),
            },
        })
    }

    /// Get HTTP server address
    pub fn http_addr(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    /// URL of the Swagger UI page on the local listener
    pub fn swagger_url(&self) -> String {
        format!("http://localhost:{}/swagger-ui/", self.http_port)
    }
}
