//! Course repository

use crate::models::Course;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

/// Filter for course listings
#[derive(Debug, Clone, Default)]
pub struct CourseFilter {
    /// Free-text filter over name and slug
    pub q: Option<String>,
    /// Restrict to one college
    pub college_id: Option<i64>,
}

/// Course repository trait
#[async_trait]
pub trait CourseRepository: Send + Sync {
    /// Create a new course
    async fn create(&self, course: &Course) -> Result<Course>;

    /// Get course by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Course>>;

    /// List courses matching the filter, ordered by updated_at descending
    async fn list(&self, filter: &CourseFilter, offset: i64, limit: i64) -> Result<Vec<Course>>;

    /// Count courses matching the filter
    async fn count(&self, filter: &CourseFilter) -> Result<i64>;

    /// Update an existing course
    async fn update(&self, course: &Course) -> Result<Course>;

    /// Delete a course by ID. Returns false if nothing was deleted.
    async fn delete(&self, id: i64) -> Result<bool>;
}

/// SQLx-based course repository implementation
pub struct SqlxCourseRepository {
    pool: SqlitePool,
}

impl SqlxCourseRepository {
    /// Create a new SQLx course repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: SqlitePool) -> Arc<dyn CourseRepository> {
        Arc::new(Self::new(pool))
    }
}

fn map_row(row: &sqlx::sqlite::SqliteRow) -> Course {
    Course {
        id: row.get("id"),
        college_id: row.get("college_id"),
        name: row.get("name"),
        slug: row.get("slug"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

// Shared WHERE clause for list and count. ?1 is the LIKE pattern (or '' when
// no free-text filter), ?2 the college id (or 0 for all).
const FILTER_CLAUSE: &str = r#"
    WHERE (?1 = '' OR LOWER(name) LIKE ?1 OR LOWER(slug) LIKE ?1)
      AND (?2 = 0 OR college_id = ?2)
"#;

fn filter_binds(filter: &CourseFilter) -> (String, i64) {
    let pattern = filter
        .q
        .as_deref()
        .map(|q| format!("%{}%", q.to_lowercase()))
        .unwrap_or_default();
    (pattern, filter.college_id.unwrap_or(0))
}

#[async_trait]
impl CourseRepository for SqlxCourseRepository {
    async fn create(&self, course: &Course) -> Result<Course> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO courses (college_id, name, slug, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(course.college_id)
        .bind(&course.name)
        .bind(&course.slug)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .context("Failed to insert course")?;

        let mut created = course.clone();
        created.id = result.last_insert_rowid();
        created.created_at = now;
        created.updated_at = now;
        Ok(created)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Course>> {
        let row = sqlx::query("SELECT * FROM courses WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to get course by id")?;
        Ok(row.as_ref().map(map_row))
    }

    async fn list(&self, filter: &CourseFilter, offset: i64, limit: i64) -> Result<Vec<Course>> {
        let (pattern, college_id) = filter_binds(filter);
        let sql = format!(
            "SELECT * FROM courses {} ORDER BY updated_at DESC LIMIT ?3 OFFSET ?4",
            FILTER_CLAUSE
        );
        let rows = sqlx::query(&sql)
            .bind(pattern)
            .bind(college_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .context("Failed to list courses")?;

        Ok(rows.iter().map(map_row).collect())
    }

    async fn count(&self, filter: &CourseFilter) -> Result<i64> {
        let (pattern, college_id) = filter_binds(filter);
        let sql = format!("SELECT COUNT(*) FROM courses {}", FILTER_CLAUSE);
        sqlx::query_scalar(&sql)
            .bind(pattern)
            .bind(college_id)
            .fetch_one(&self.pool)
            .await
            .context("Failed to count courses")
    }

    async fn update(&self, course: &Course) -> Result<Course> {
        let now = Utc::now();
        sqlx::query(
            r#"
            UPDATE courses
            SET college_id = ?, name = ?, slug = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(course.college_id)
        .bind(&course.name)
        .bind(&course.slug)
        .bind(now)
        .bind(course.id)
        .execute(&self.pool)
        .await
        .context("Failed to update course")?;

        let mut updated = course.clone();
        updated.updated_at = now;
        Ok(updated)
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM courses WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete course")?;
        Ok(result.rows_affected() > 0)
    }
}
