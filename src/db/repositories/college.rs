//! College repository
//!
//! Database operations for colleges. Free-text filtering matches name,
//! slug and location case-insensitively; listings are ordered by most
//! recently updated.

use crate::models::College;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

/// Filter for college listings
#[derive(Debug, Clone, Default)]
pub struct CollegeFilter {
    /// Free-text filter over name, slug and location
    pub q: Option<String>,
}

/// College repository trait
#[async_trait]
pub trait CollegeRepository: Send + Sync {
    /// Create a new college
    async fn create(&self, college: &College) -> Result<College>;

    /// Get college by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<College>>;

    /// Get college by slug
    async fn get_by_slug(&self, slug: &str) -> Result<Option<College>>;

    /// List colleges matching the filter, ordered by updated_at descending
    async fn list(&self, filter: &CollegeFilter, offset: i64, limit: i64) -> Result<Vec<College>>;

    /// Count colleges matching the filter
    async fn count(&self, filter: &CollegeFilter) -> Result<i64>;

    /// Update an existing college
    async fn update(&self, college: &College) -> Result<College>;

    /// Delete a college by ID. Returns false if nothing was deleted.
    async fn delete(&self, id: i64) -> Result<bool>;
}

/// SQLx-based college repository implementation
pub struct SqlxCollegeRepository {
    pool: SqlitePool,
}

impl SqlxCollegeRepository {
    /// Create a new SQLx college repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: SqlitePool) -> Arc<dyn CollegeRepository> {
        Arc::new(Self::new(pool))
    }
}

fn map_row(row: &sqlx::sqlite::SqliteRow) -> College {
    College {
        id: row.get("id"),
        name: row.get("name"),
        slug: row.get("slug"),
        location: row.get("location"),
        logo_url: row.get("logo_url"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn like_pattern(q: &str) -> String {
    format!("%{}%", q.to_lowercase())
}

#[async_trait]
impl CollegeRepository for SqlxCollegeRepository {
    async fn create(&self, college: &College) -> Result<College> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO colleges (name, slug, location, logo_url, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&college.name)
        .bind(&college.slug)
        .bind(&college.location)
        .bind(&college.logo_url)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .context("Failed to insert college")?;

        let mut created = college.clone();
        created.id = result.last_insert_rowid();
        created.created_at = now;
        created.updated_at = now;
        Ok(created)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<College>> {
        let row = sqlx::query("SELECT * FROM colleges WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to get college by id")?;
        Ok(row.as_ref().map(map_row))
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Option<College>> {
        let row = sqlx::query("SELECT * FROM colleges WHERE slug = ?")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to get college by slug")?;
        Ok(row.as_ref().map(map_row))
    }

    async fn list(&self, filter: &CollegeFilter, offset: i64, limit: i64) -> Result<Vec<College>> {
        let rows = match &filter.q {
            Some(q) => {
                sqlx::query(
                    r#"
                    SELECT * FROM colleges
                    WHERE LOWER(name) LIKE ?1
                       OR LOWER(slug) LIKE ?1
                       OR LOWER(COALESCE(location, '')) LIKE ?1
                    ORDER BY updated_at DESC
                    LIMIT ?2 OFFSET ?3
                    "#,
                )
                .bind(like_pattern(q))
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query("SELECT * FROM colleges ORDER BY updated_at DESC LIMIT ? OFFSET ?")
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(&self.pool)
                    .await
            }
        }
        .context("Failed to list colleges")?;

        Ok(rows.iter().map(map_row).collect())
    }

    async fn count(&self, filter: &CollegeFilter) -> Result<i64> {
        let count: i64 = match &filter.q {
            Some(q) => {
                sqlx::query_scalar(
                    r#"
                    SELECT COUNT(*) FROM colleges
                    WHERE LOWER(name) LIKE ?1
                       OR LOWER(slug) LIKE ?1
                       OR LOWER(COALESCE(location, '')) LIKE ?1
                    "#,
                )
                .bind(like_pattern(q))
                .fetch_one(&self.pool)
                .await
            }
            None => {
                sqlx::query_scalar("SELECT COUNT(*) FROM colleges")
                    .fetch_one(&self.pool)
                    .await
            }
        }
        .context("Failed to count colleges")?;

        Ok(count)
    }

    async fn update(&self, college: &College) -> Result<College> {
        let now = Utc::now();
        sqlx::query(
            r#"
            UPDATE colleges
            SET name = ?, slug = ?, location = ?, logo_url = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&college.name)
        .bind(&college.slug)
        .bind(&college.location)
        .bind(&college.logo_url)
        .bind(now)
        .bind(college.id)
        .execute(&self.pool)
        .await
        .context("Failed to update college")?;

        let mut updated = college.clone();
        updated.updated_at = now;
        Ok(updated)
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM colleges WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete college")?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};

    async fn setup() -> SqlxCollegeRepository {
        let pool = create_test_pool().await.unwrap();
        migrations::run_migrations(&pool).await.unwrap();
        SqlxCollegeRepository::new(pool)
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let repo = setup().await;
        let created = repo
            .create(&College::new("GGSIPU".into(), "ggsipu".into()))
            .await
            .unwrap();
        assert!(created.id > 0);

        let by_id = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(by_id.name, "GGSIPU");

        let by_slug = repo.get_by_slug("ggsipu").await.unwrap().unwrap();
        assert_eq!(by_slug.id, created.id);
    }

    #[tokio::test]
    async fn test_list_filters_on_location() {
        let repo = setup().await;
        let mut a = College::new("Alpha".into(), "alpha".into());
        a.location = Some("Delhi".into());
        repo.create(&a).await.unwrap();
        repo.create(&College::new("Beta".into(), "beta".into()))
            .await
            .unwrap();

        let filter = CollegeFilter {
            q: Some("delhi".into()),
        };
        let items = repo.list(&filter, 0, 10).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Alpha");
        assert_eq!(repo.count(&filter).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_slug_rejected() {
        let repo = setup().await;
        repo.create(&College::new("One".into(), "same".into()))
            .await
            .unwrap();
        assert!(repo
            .create(&College::new("Two".into(), "same".into()))
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_delete_missing_returns_false() {
        let repo = setup().await;
        assert!(!repo.delete(999).await.unwrap());
    }
}
