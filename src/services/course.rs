//! Course service

use crate::db::repositories::{CourseFilter, CourseRepository};
use crate::models::Course;
use crate::services::slug::generate_slug;
use crate::services::{is_fk_violation, is_unique_violation};
use std::sync::Arc;

/// Error types for course service operations
#[derive(Debug, thiserror::Error)]
pub enum CourseServiceError {
    /// Course not found
    #[error("Course not found: {0}")]
    NotFound(i64),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Slug already taken within the college
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Input for creating a course
#[derive(Debug, Clone, Default)]
pub struct CreateCourseInput {
    pub college_id: i64,
    pub name: String,
    pub slug: Option<String>,
}

/// Input for a partial course update
#[derive(Debug, Clone, Default)]
pub struct UpdateCourseInput {
    pub college_id: Option<i64>,
    pub name: Option<String>,
    pub slug: Option<String>,
}

/// Course service
pub struct CourseService {
    repo: Arc<dyn CourseRepository>,
}

impl CourseService {
    /// Create a new course service
    pub fn new(repo: Arc<dyn CourseRepository>) -> Self {
        Self { repo }
    }

    /// List courses with free-text filter, optional college restriction
    /// and pagination.
    pub async fn list(
        &self,
        q: Option<String>,
        college_id: Option<i64>,
        page: u32,
        page_size: u32,
    ) -> Result<(Vec<Course>, i64), CourseServiceError> {
        let filter = CourseFilter { q, college_id };
        let offset = (page as i64 - 1) * page_size as i64;
        let items = self.repo.list(&filter, offset, page_size as i64).await?;
        let total = self.repo.count(&filter).await?;
        Ok((items, total))
    }

    /// Get a course by ID
    pub async fn get(&self, id: i64) -> Result<Course, CourseServiceError> {
        self.repo
            .get_by_id(id)
            .await?
            .ok_or(CourseServiceError::NotFound(id))
    }

    /// Create a course under a college
    pub async fn create(&self, input: CreateCourseInput) -> Result<Course, CourseServiceError> {
        let name = input.name.trim().to_string();
        if name.len() < 2 {
            return Err(CourseServiceError::ValidationError(
                "Name must be at least 2 characters".to_string(),
            ));
        }

        let slug = resolve_slug(input.slug.as_deref(), &name)?;
        let course = Course::new(input.college_id, name, slug);

        self.repo.create(&course).await.map_err(map_storage_error)
    }

    /// Apply a partial update. The slug is re-derived only when the name
    /// changes and no explicit slug is given.
    pub async fn update(
        &self,
        id: i64,
        input: UpdateCourseInput,
    ) -> Result<Course, CourseServiceError> {
        let mut course = self.get(id).await?;

        if let Some(college_id) = input.college_id {
            course.college_id = college_id;
        }
        if let Some(name) = input.name {
            let name = name.trim().to_string();
            if name.len() < 2 {
                return Err(CourseServiceError::ValidationError(
                    "Name must be at least 2 characters".to_string(),
                ));
            }
            if input.slug.is_none() {
                course.slug = resolve_slug(None, &name)?;
            }
            course.name = name;
        }
        if let Some(slug) = input.slug {
            course.slug = resolve_slug(Some(&slug), &course.name)?;
        }

        self.repo.update(&course).await.map_err(map_storage_error)
    }

    /// Hard-delete a course
    pub async fn delete(&self, id: i64) -> Result<(), CourseServiceError> {
        if !self.repo.delete(id).await? {
            return Err(CourseServiceError::NotFound(id));
        }
        Ok(())
    }
}

fn resolve_slug(explicit: Option<&str>, name: &str) -> Result<String, CourseServiceError> {
    let slug = match explicit.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => s.to_string(),
        None => generate_slug(name),
    };
    if slug.is_empty() {
        return Err(CourseServiceError::ValidationError(
            "Cannot derive a slug from the given name".to_string(),
        ));
    }
    Ok(slug)
}

fn map_storage_error(err: anyhow::Error) -> CourseServiceError {
    if is_unique_violation(&err) {
        CourseServiceError::Conflict(
            "A course with this slug already exists in the college".to_string(),
        )
    } else if is_fk_violation(&err) {
        CourseServiceError::ValidationError("Unknown college".to_string())
    } else {
        CourseServiceError::InternalError(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{CollegeRepository, SqlxCollegeRepository, SqlxCourseRepository};
    use crate::db::{create_test_pool, migrations};
    use crate::models::College;

    async fn setup() -> (CourseService, i64) {
        let pool = create_test_pool().await.unwrap();
        migrations::run_migrations(&pool).await.unwrap();
        let college = SqlxCollegeRepository::new(pool.clone())
            .create(&College::new("GGSIPU".into(), "ggsipu".into()))
            .await
            .unwrap();
        (
            CourseService::new(SqlxCourseRepository::boxed(pool)),
            college.id,
        )
    }

    #[tokio::test]
    async fn test_create_derives_slug() {
        let (service, college_id) = setup().await;
        let course = service
            .create(CreateCourseInput {
                college_id,
                name: "B.Tech CSE".into(),
                slug: None,
            })
            .await
            .unwrap();
        assert_eq!(course.slug, "b-tech-cse");
    }

    #[tokio::test]
    async fn test_unknown_college_is_validation_error() {
        let (service, _) = setup().await;
        let err = service
            .create(CreateCourseInput {
                college_id: 999,
                name: "B.Tech CSE".into(),
                slug: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, CourseServiceError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_duplicate_slug_within_college_is_conflict() {
        let (service, college_id) = setup().await;
        let input = CreateCourseInput {
            college_id,
            name: "MBA".into(),
            slug: None,
        };
        service.create(input.clone()).await.unwrap();
        let err = service.create(input).await.unwrap_err();
        assert!(matches!(err, CourseServiceError::Conflict(_)));
    }
}
