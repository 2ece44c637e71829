//! Tenant registry domain model

use super::common::StringUuid;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::mysql::MySqlConnectOptions;
use sqlx::FromRow;
use utoipa::ToSchema;

/// Row of the master `tenant_connection_information` table describing how
/// to reach one tenant's database.
#[derive(Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct TenantConnectionInformation {
    pub id: StringUuid,
    pub name: String,
    pub host: String,
    pub port: u16,
    pub username: String,
    #[serde(skip_serializing, default)]
    #[schema(ignore)]
    pub password: String,
    /// Database (schema) name on the tenant's server
    pub schema_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TenantConnectionInformation {
    /// Connection options for this tenant's database
    pub fn connect_options(&self) -> MySqlConnectOptions {
        MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.username)
            .password(&self.password)
            .database(&self.schema_name)
    }
}

impl std::fmt::Debug for TenantConnectionInformation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TenantConnectionInformation")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("schema_name", &self.schema_name)
            .finish()
    }
}

impl Default for TenantConnectionInformation {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: StringUuid::new_v4(),
            name: String::new(),
            host: "localhost".to_string(),
            port: 3306,
            username: String::new(),
            password: String::new(),
            schema_name: String::new(),
            created_at: now,
            updated_at: now,
        }
    }
}
