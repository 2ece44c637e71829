//! User repository
//!
//! One implementation serves both the master `master_users` table and the
//! per-tenant `users` tables; the table is fixed at construction.

use crate::domain::{NewUser, StringUuid, User, UserChanges};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use sqlx::MySqlPool;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, input: &NewUser) -> Result<User>;
    async fn find_by_id(&self, id: StringUuid) -> Result<Option<User>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<User>>;
    async fn count(&self) -> Result<i64>;
    async fn update(&self, id: StringUuid, changes: &UserChanges) -> Result<User>;
    async fn delete(&self, id: StringUuid) -> Result<()>;
}

/// Which user table a repository reads and writes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserTable {
    /// `master_users` in the master database
    Master,
    /// `users` in a tenant database
    Tenant,
}

impl UserTable {
    fn name(self) -> &'static str {
        match self {
            UserTable::Master => "master_users",
            UserTable::Tenant => "users",
        }
    }
}

#[derive(Clone)]
pub struct UserRepositoryImpl {
    pool: MySqlPool,
    table: UserTable,
}

impl UserRepositoryImpl {
    pub fn new(pool: MySqlPool, table: UserTable) -> Self {
        Self { pool, table }
    }

    pub fn master(pool: MySqlPool) -> Self {
        Self::new(pool, UserTable::Master)
    }

    pub fn tenant(pool: MySqlPool) -> Self {
        Self::new(pool, UserTable::Tenant)
    }

    fn select_sql(&self, filter: &str) -> String {
        format!(
            "SELECT id, email, first_name, last_name, password_hash, created_at, updated_at FROM {} {}",
            self.table.name(),
            filter
        )
    }
}

#[async_trait]
impl UserRepository for UserRepositoryImpl {
    async fn create(&self, input: &NewUser) -> Result<User> {
        let id = StringUuid::new_v4();

        let sql = format!(
            r#"
            INSERT INTO {} (id, email, first_name, last_name, password_hash, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, NOW(), NOW())
            "#,
            self.table.name()
        );
        sqlx::query(&sql)
            .bind(id)
            .bind(&input.email)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.password_hash)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::from_insert(e, "User"))?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to create user")))
    }

    async fn find_by_id(&self, id: StringUuid) -> Result<Option<User>> {
        let sql = self.select_sql("WHERE id = ?");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let sql = self.select_sql("WHERE email = ?");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<User>> {
        let sql = self.select_sql("ORDER BY created_at DESC LIMIT ? OFFSET ?");
        let users = sqlx::query_as::<_, User>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(users)
    }

    async fn count(&self) -> Result<i64> {
        let sql = format!("SELECT COUNT(*) FROM {}", self.table.name());
        let row: (i64,) = sqlx::query_as(&sql).fetch_one(&self.pool).await?;
        Ok(row.0)
    }

    async fn update(&self, id: StringUuid, changes: &UserChanges) -> Result<User> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))?;

        let email = changes.email.as_ref().unwrap_or(&existing.email);
        let first_name = changes.first_name.as_ref().unwrap_or(&existing.first_name);
        let last_name = changes.last_name.as_ref().unwrap_or(&existing.last_name);
        let password_hash = changes
            .password_hash
            .as_ref()
            .unwrap_or(&existing.password_hash);

        let sql = format!(
            r#"
            UPDATE {}
            SET email = ?, first_name = ?, last_name = ?, password_hash = ?, updated_at = NOW()
            WHERE id = ?
            "#,
            self.table.name()
        );
        sqlx::query(&sql)
            .bind(email)
            .bind(first_name)
            .bind(last_name)
            .bind(password_hash)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::from_insert(e, "User"))?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to update user")))
    }

    async fn delete(&self, id: StringUuid) -> Result<()> {
        let sql = format!("DELETE FROM {} WHERE id = ?", self.table.name());
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("User {} not found", id)));
        }

        Ok(())
    }
}
