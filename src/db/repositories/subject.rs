//! Subject repository

use crate::models::Subject;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

/// Filter for subject listings
#[derive(Debug, Clone, Default)]
pub struct SubjectFilter {
    /// Free-text filter over name, slug and code
    pub q: Option<String>,
    /// Restrict to one course
    pub course_id: Option<i64>,
}

/// Subject repository trait
#[async_trait]
pub trait SubjectRepository: Send + Sync {
    /// Create a new subject
    async fn create(&self, subject: &Subject) -> Result<Subject>;

    /// Get subject by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Subject>>;

    /// List subjects matching the filter, ordered by updated_at descending
    async fn list(&self, filter: &SubjectFilter, offset: i64, limit: i64) -> Result<Vec<Subject>>;

    /// Count subjects matching the filter
    async fn count(&self, filter: &SubjectFilter) -> Result<i64>;

    /// Update an existing subject
    async fn update(&self, subject: &Subject) -> Result<Subject>;

    /// Delete a subject by ID. Returns false if nothing was deleted.
    async fn delete(&self, id: i64) -> Result<bool>;
}

/// SQLx-based subject repository implementation
pub struct SqlxSubjectRepository {
    pool: SqlitePool,
}

impl SqlxSubjectRepository {
    /// Create a new SQLx subject repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: SqlitePool) -> Arc<dyn SubjectRepository> {
        Arc::new(Self::new(pool))
    }
}

fn map_row(row: &sqlx::sqlite::SqliteRow) -> Subject {
    Subject {
        id: row.get("id"),
        course_id: row.get("course_id"),
        name: row.get("name"),
        slug: row.get("slug"),
        code: row.get("code"),
        semester: row.get("semester"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

const FILTER_CLAUSE: &str = r#"
    WHERE (?1 = '' OR LOWER(name) LIKE ?1 OR LOWER(slug) LIKE ?1 OR LOWER(COALESCE(code, '')) LIKE ?1)
      AND (?2 = 0 OR course_id = ?2)
"#;

fn filter_binds(filter: &SubjectFilter) -> (String, i64) {
    let pattern = filter
        .q
        .as_deref()
        .map(|q| format!("%{}%", q.to_lowercase()))
        .unwrap_or_default();
    (pattern, filter.course_id.unwrap_or(0))
}

#[async_trait]
impl SubjectRepository for SqlxSubjectRepository {
    async fn create(&self, subject: &Subject) -> Result<Subject> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO subjects (course_id, name, slug, code, semester, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(subject.course_id)
        .bind(&subject.name)
        .bind(&subject.slug)
        .bind(&subject.code)
        .bind(subject.semester)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .context("Failed to insert subject")?;

        let mut created = subject.clone();
        created.id = result.last_insert_rowid();
        created.created_at = now;
        created.updated_at = now;
        Ok(created)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Subject>> {
        let row = sqlx::query("SELECT * FROM subjects WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to get subject by id")?;
        Ok(row.as_ref().map(map_row))
    }

    async fn list(&self, filter: &SubjectFilter, offset: i64, limit: i64) -> Result<Vec<Subject>> {
        let (pattern, course_id) = filter_binds(filter);
        let sql = format!(
            "SELECT * FROM subjects {} ORDER BY updated_at DESC LIMIT ?3 OFFSET ?4",
            FILTER_CLAUSE
        );
        let rows = sqlx::query(&sql)
            .bind(pattern)
            .bind(course_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .context("Failed to list subjects")?;

        Ok(rows.iter().map(map_row).collect())
    }

    async fn count(&self, filter: &SubjectFilter) -> Result<i64> {
        let (pattern, course_id) = filter_binds(filter);
        let sql = format!("SELECT COUNT(*) FROM subjects {}", FILTER_CLAUSE);
        sqlx::query_scalar(&sql)
            .bind(pattern)
            .bind(course_id)
            .fetch_one(&self.pool)
            .await
            .context("Failed to count subjects")
    }

    async fn update(&self, subject: &Subject) -> Result<Subject> {
        let now = Utc::now();
        sqlx::query(
            r#"
            UPDATE subjects
            SET course_id = ?, name = ?, slug = ?, code = ?, semester = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(subject.course_id)
        .bind(&subject.name)
        .bind(&subject.slug)
        .bind(&subject.code)
        .bind(subject.semester)
        .bind(now)
        .bind(subject.id)
        .execute(&self.pool)
        .await
        .context("Failed to update subject")?;

        let mut updated = subject.clone();
        updated.updated_at = now;
        Ok(updated)
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM subjects WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete subject")?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::college::{CollegeRepository, SqlxCollegeRepository};
    use crate::db::repositories::course::{CourseRepository, SqlxCourseRepository};
    use crate::db::{create_test_pool, migrations};
    use crate::models::{College, Course};

    async fn setup() -> (SqlxSubjectRepository, i64) {
        let pool = create_test_pool().await.unwrap();
        migrations::run_migrations(&pool).await.unwrap();
        let college = SqlxCollegeRepository::new(pool.clone())
            .create(&College::new("C".into(), "c".into()))
            .await
            .unwrap();
        let course = SqlxCourseRepository::new(pool.clone())
            .create(&Course::new(college.id, "B.Tech".into(), "btech".into()))
            .await
            .unwrap();
        (SqlxSubjectRepository::new(pool), course.id)
    }

    #[tokio::test]
    async fn test_code_search() {
        let (repo, course_id) = setup().await;
        let mut subject = Subject::new(course_id, "Data Structures".into(), "data-structures".into());
        subject.code = Some("CS-201".into());
        subject.semester = Some(3);
        repo.create(&subject).await.unwrap();

        let filter = SubjectFilter {
            q: Some("cs-201".into()),
            ..Default::default()
        };
        let found = repo.list(&filter, 0, 10).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].semester, Some(3));
    }

    #[tokio::test]
    async fn test_cascade_delete_from_course() {
        let (repo, course_id) = setup().await;
        let created = repo
            .create(&Subject::new(course_id, "OS".into(), "os".into()))
            .await
            .unwrap();

        sqlx::query("DELETE FROM courses WHERE id = ?")
            .bind(course_id)
            .execute(&repo.pool)
            .await
            .unwrap();

        assert!(repo.get_by_id(created.id).await.unwrap().is_none());
    }
}
