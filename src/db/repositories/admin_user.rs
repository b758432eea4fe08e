//! Admin user repository
//!
//! Holds the login audit record for the configured admin identity.

use crate::models::AdminUser;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

/// Admin user repository trait
#[async_trait]
pub trait AdminUserRepository: Send + Sync {
    /// Ensure an audit row exists for the given email. Existing rows are
    /// left untouched.
    async fn ensure_exists(&self, email: &str, password_hash: &str) -> Result<()>;

    /// Look up the audit record by email
    async fn get_by_email(&self, email: &str) -> Result<Option<AdminUser>>;
}

/// SQLx-based admin user repository implementation
pub struct SqlxAdminUserRepository {
    pool: SqlitePool,
}

impl SqlxAdminUserRepository {
    /// Create a new SQLx admin user repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: SqlitePool) -> Arc<dyn AdminUserRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl AdminUserRepository for SqlxAdminUserRepository {
    async fn ensure_exists(&self, email: &str, password_hash: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO admin_users (email, password_hash, role, created_at)
            VALUES (?, ?, 'admin', ?)
            ON CONFLICT(email) DO NOTHING
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .bind(chrono::Utc::now())
        .execute(&self.pool)
        .await
        .context("Failed to upsert admin user")?;
        Ok(())
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<AdminUser>> {
        let row = sqlx::query("SELECT * FROM admin_users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to get admin user")?;

        Ok(row.map(|row| AdminUser {
            id: row.get("id"),
            email: row.get("email"),
            password_hash: row.get("password_hash"),
            role: row.get("role"),
            created_at: row.get("created_at"),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};

    #[tokio::test]
    async fn test_ensure_exists_is_idempotent() {
        let pool = create_test_pool().await.unwrap();
        migrations::run_migrations(&pool).await.unwrap();
        let repo = SqlxAdminUserRepository::new(pool);

        repo.ensure_exists("admin@example.com", "env").await.unwrap();
        repo.ensure_exists("admin@example.com", "other").await.unwrap();

        let user = repo.get_by_email("admin@example.com").await.unwrap().unwrap();
        // First write wins; later logins never rewrite the record
        assert_eq!(user.password_hash, "env");
        assert_eq!(user.role, "admin");
    }
}
