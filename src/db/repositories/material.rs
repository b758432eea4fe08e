//! Material repository
//!
//! Tags are stored as a JSON array in a TEXT column; rows with unreadable
//! tag payloads decode to an empty tag list rather than failing the query.

use crate::models::{Material, MaterialType};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

/// Filter for material listings
#[derive(Debug, Clone, Default)]
pub struct MaterialFilter {
    /// Free-text filter over title and description
    pub q: Option<String>,
    /// Restrict to one subject
    pub subject_id: Option<i64>,
    /// Restrict to one material type
    pub material_type: Option<MaterialType>,
}

/// Material repository trait
#[async_trait]
pub trait MaterialRepository: Send + Sync {
    /// Create a new material
    async fn create(&self, material: &Material) -> Result<Material>;

    /// Get material by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Material>>;

    /// List materials matching the filter, ordered by updated_at descending
    async fn list(&self, filter: &MaterialFilter, offset: i64, limit: i64)
        -> Result<Vec<Material>>;

    /// Count materials matching the filter
    async fn count(&self, filter: &MaterialFilter) -> Result<i64>;

    /// Update an existing material
    async fn update(&self, material: &Material) -> Result<Material>;

    /// Delete a material by ID. Returns false if nothing was deleted.
    async fn delete(&self, id: i64) -> Result<bool>;
}

/// SQLx-based material repository implementation
pub struct SqlxMaterialRepository {
    pool: SqlitePool,
}

impl SqlxMaterialRepository {
    /// Create a new SQLx material repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: SqlitePool) -> Arc<dyn MaterialRepository> {
        Arc::new(Self::new(pool))
    }
}

fn map_row(row: &sqlx::sqlite::SqliteRow) -> Material {
    let type_str: String = row.get("material_type");
    let tags_json: String = row.get("tags");
    Material {
        id: row.get("id"),
        subject_id: row.get("subject_id"),
        material_type: type_str.parse().unwrap_or_default(),
        title: row.get("title"),
        description: row.get("description"),
        file_url: row.get("file_url"),
        external_url: row.get("external_url"),
        tags: serde_json::from_str(&tags_json).unwrap_or_default(),
        year: row.get("year"),
        author: row.get("author"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

const FILTER_CLAUSE: &str = r#"
    WHERE (?1 = '' OR LOWER(title) LIKE ?1 OR LOWER(COALESCE(description, '')) LIKE ?1)
      AND (?2 = 0 OR subject_id = ?2)
      AND (?3 = '' OR material_type = ?3)
"#;

fn filter_binds(filter: &MaterialFilter) -> (String, i64, String) {
    let pattern = filter
        .q
        .as_deref()
        .map(|q| format!("%{}%", q.to_lowercase()))
        .unwrap_or_default();
    let type_str = filter
        .material_type
        .map(|t| t.to_string())
        .unwrap_or_default();
    (pattern, filter.subject_id.unwrap_or(0), type_str)
}

#[async_trait]
impl MaterialRepository for SqlxMaterialRepository {
    async fn create(&self, material: &Material) -> Result<Material> {
        let now = Utc::now();
        let tags_json = serde_json::to_string(&material.tags).context("Failed to encode tags")?;
        let result = sqlx::query(
            r#"
            INSERT INTO materials
                (subject_id, material_type, title, description, file_url, external_url,
                 tags, year, author, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(material.subject_id)
        .bind(material.material_type.to_string())
        .bind(&material.title)
        .bind(&material.description)
        .bind(&material.file_url)
        .bind(&material.external_url)
        .bind(tags_json)
        .bind(material.year)
        .bind(&material.author)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .context("Failed to insert material")?;

        let mut created = material.clone();
        created.id = result.last_insert_rowid();
        created.created_at = now;
        created.updated_at = now;
        Ok(created)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Material>> {
        let row = sqlx::query("SELECT * FROM materials WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to get material by id")?;
        Ok(row.as_ref().map(map_row))
    }

    async fn list(
        &self,
        filter: &MaterialFilter,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Material>> {
        let (pattern, subject_id, type_str) = filter_binds(filter);
        let sql = format!(
            "SELECT * FROM materials {} ORDER BY updated_at DESC LIMIT ?4 OFFSET ?5",
            FILTER_CLAUSE
        );
        let rows = sqlx::query(&sql)
            .bind(pattern)
            .bind(subject_id)
            .bind(type_str)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .context("Failed to list materials")?;

        Ok(rows.iter().map(map_row).collect())
    }

    async fn count(&self, filter: &MaterialFilter) -> Result<i64> {
        let (pattern, subject_id, type_str) = filter_binds(filter);
        let sql = format!("SELECT COUNT(*) FROM materials {}", FILTER_CLAUSE);
        sqlx::query_scalar(&sql)
            .bind(pattern)
            .bind(subject_id)
            .bind(type_str)
            .fetch_one(&self.pool)
            .await
            .context("Failed to count materials")
    }

    async fn update(&self, material: &Material) -> Result<Material> {
        let now = Utc::now();
        let tags_json = serde_json::to_string(&material.tags).context("Failed to encode tags")?;
        sqlx::query(
            r#"
            UPDATE materials
            SET subject_id = ?, material_type = ?, title = ?, description = ?,
                file_url = ?, external_url = ?, tags = ?, year = ?, author = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(material.subject_id)
        .bind(material.material_type.to_string())
        .bind(&material.title)
        .bind(&material.description)
        .bind(&material.file_url)
        .bind(&material.external_url)
        .bind(tags_json)
        .bind(material.year)
        .bind(&material.author)
        .bind(now)
        .bind(material.id)
        .execute(&self.pool)
        .await
        .context("Failed to update material")?;

        let mut updated = material.clone();
        updated.updated_at = now;
        Ok(updated)
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM materials WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete material")?;
        Ok(result.rows_affected() > 0)
    }
}
