//! MySQL-backed session store
//!
//! Records are serialized to JSON and encrypted with AES-256-GCM before they
//! touch the `data` column, so a dump of the sessions table reveals nothing
//! beyond ids and expiry dates.

use crate::crypto::{decrypt, encrypt, EncryptionKey};
use async_trait::async_trait;
use sqlx::MySqlPool;
use std::sync::Arc;
use time::OffsetDateTime;
use tower_sessions::session::{Id, Record};
use tower_sessions::session_store::{self, ExpiredDeletion, SessionStore};

#[derive(Clone)]
pub struct MySqlSessionStore {
    pool: MySqlPool,
    key: Arc<EncryptionKey>,
    table_name: String,
}

impl std::fmt::Debug for MySqlSessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlSessionStore")
            .field("table_name", &self.table_name)
            .field("key", &"[REDACTED]")
            .finish()
    }
}

impl MySqlSessionStore {
    pub fn new(pool: MySqlPool, key: EncryptionKey) -> Self {
        Self {
            pool,
            key: Arc::new(key),
            table_name: "sessions".to_string(),
        }
    }

    /// Use a different table; only ASCII letters, digits and `_` are accepted
    pub fn with_table_name(mut self, table_name: impl AsRef<str>) -> Result<Self, String> {
        let table_name = table_name.as_ref();
        if !is_valid_identifier(table_name) {
            return Err(format!("Invalid session table name: {:?}", table_name));
        }
        self.table_name = table_name.to_string();
        Ok(self)
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Create the sessions table if it does not exist
    pub async fn migrate(&self) -> sqlx::Result<()> {
        let create_table = format!(
            r#"
            CREATE TABLE IF NOT EXISTS `{}` (
                id VARCHAR(128) NOT NULL PRIMARY KEY,
                data TEXT NOT NULL,
                expiry_date TIMESTAMP(6) NOT NULL,
                INDEX idx_{}_expiry_date (expiry_date)
            )
            "#,
            self.table_name, self.table_name
        );
        sqlx::query(&create_table).execute(&self.pool).await?;
        Ok(())
    }

    fn seal(&self, record: &Record) -> session_store::Result<String> {
        let json = serde_json::to_string(record)
            .map_err(|e| session_store::Error::Encode(e.to_string()))?;
        encrypt(&self.key, &json).map_err(|e| session_store::Error::Encode(e.to_string()))
    }

    fn open(&self, data: &str) -> session_store::Result<Record> {
        let json =
            decrypt(&self.key, data).map_err(|e| session_store::Error::Decode(e.to_string()))?;
        serde_json::from_str(&json).map_err(|e| session_store::Error::Decode(e.to_string()))
    }

    async fn id_exists(&self, id: &Id) -> session_store::Result<bool> {
        let query = format!(
            "SELECT EXISTS(SELECT 1 FROM `{}` WHERE id = ?)",
            self.table_name
        );
        let exists: i64 = sqlx::query_scalar(&query)
            .bind(id.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(backend)?;
        Ok(exists > 0)
    }
}

fn is_valid_identifier(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= 64
        && name
            .chars()
            .next()
            .map(|c| c.is_ascii_alphabetic() || c == '_')
            .unwrap_or(false)
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn backend(err: sqlx::Error) -> session_store::Error {
    session_store::Error::Backend(err.to_string())
}

#[async_trait]
impl SessionStore for MySqlSessionStore {
    async fn create(&self, record: &mut Record) -> session_store::Result<()> {
        while self.id_exists(&record.id).await? {
            record.id = Id::default();
        }
        self.save(record).await
    }

    async fn save(&self, record: &Record) -> session_store::Result<()> {
        let data = self.seal(record)?;
        let query = format!(
            r#"
            INSERT INTO `{}` (id, data, expiry_date)
            VALUES (?, ?, ?)
            ON DUPLICATE KEY UPDATE data = VALUES(data), expiry_date = VALUES(expiry_date)
            "#,
            self.table_name
        );
        sqlx::query(&query)
            .bind(record.id.to_string())
            .bind(data)
            .bind(record.expiry_date)
            .execute(&self.pool)
            .await
            .map_err(backend)?;
        Ok(())
    }

    async fn load(&self, session_id: &Id) -> session_store::Result<Option<Record>> {
        let query = format!(
            "SELECT data FROM `{}` WHERE id = ? AND expiry_date > ?",
            self.table_name
        );
        let data: Option<String> = sqlx::query_scalar(&query)
            .bind(session_id.to_string())
            .bind(OffsetDateTime::now_utc())
            .fetch_optional(&self.pool)
            .await
            .map_err(backend)?;

        data.map(|d| self.open(&d)).transpose()
    }

    async fn delete(&self, session_id: &Id) -> session_store::Result<()> {
        let query = format!("DELETE FROM `{}` WHERE id = ?", self.table_name);
        sqlx::query(&query)
            .bind(session_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(backend)?;
        Ok(())
    }
}

#[async_trait]
impl ExpiredDeletion for MySqlSessionStore {
    async fn delete_expired(&self) -> session_store::Result<()> {
        let query = format!("DELETE FROM `{}` WHERE expiry_date < ?", self.table_name);
        let result = sqlx::query(&query)
            .bind(OffsetDateTime::now_utc())
            .execute(&self.pool)
            .await
            .map_err(backend)?;
        tracing::debug!(removed = result.rows_affected(), "Deleted expired sessions");
        Ok(())
    }
}
