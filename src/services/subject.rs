//! Subject service

use crate::db::repositories::{SubjectFilter, SubjectRepository};
use crate::models::Subject;
use crate::services::slug::generate_slug;
use crate::services::{is_fk_violation, is_unique_violation};
use std::sync::Arc;

/// Error types for subject service operations
#[derive(Debug, thiserror::Error)]
pub enum SubjectServiceError {
    /// Subject not found
    #[error("Subject not found: {0}")]
    NotFound(i64),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Slug already taken within the course
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Input for creating a subject
#[derive(Debug, Clone, Default)]
pub struct CreateSubjectInput {
    pub course_id: i64,
    pub name: String,
    pub slug: Option<String>,
    pub code: Option<String>,
    pub semester: Option<i64>,
}

/// Input for a partial subject update
#[derive(Debug, Clone, Default)]
pub struct UpdateSubjectInput {
    pub course_id: Option<i64>,
    pub name: Option<String>,
    pub slug: Option<String>,
    pub code: Option<String>,
    pub semester: Option<i64>,
}

/// Subject service
pub struct SubjectService {
    repo: Arc<dyn SubjectRepository>,
}

impl SubjectService {
    /// Create a new subject service
    pub fn new(repo: Arc<dyn SubjectRepository>) -> Self {
        Self { repo }
    }

    /// List subjects with free-text filter, optional course restriction
    /// and pagination.
    pub async fn list(
        &self,
        q: Option<String>,
        course_id: Option<i64>,
        page: u32,
        page_size: u32,
    ) -> Result<(Vec<Subject>, i64), SubjectServiceError> {
        let filter = SubjectFilter { q, course_id };
        let offset = (page as i64 - 1) * page_size as i64;
        let items = self.repo.list(&filter, offset, page_size as i64).await?;
        let total = self.repo.count(&filter).await?;
        Ok((items, total))
    }

    /// Get a subject by ID
    pub async fn get(&self, id: i64) -> Result<Subject, SubjectServiceError> {
        self.repo
            .get_by_id(id)
            .await?
            .ok_or(SubjectServiceError::NotFound(id))
    }

    /// Create a subject under a course
    pub async fn create(&self, input: CreateSubjectInput) -> Result<Subject, SubjectServiceError> {
        let name = input.name.trim().to_string();
        if name.len() < 2 {
            return Err(SubjectServiceError::ValidationError(
                "Name must be at least 2 characters".to_string(),
            ));
        }
        validate_semester(input.semester)?;

        let slug = resolve_slug(input.slug.as_deref(), &name)?;
        let mut subject = Subject::new(input.course_id, name, slug);
        subject.code = input.code.filter(|s| !s.trim().is_empty());
        subject.semester = input.semester;

        self.repo.create(&subject).await.map_err(map_storage_error)
    }

    /// Apply a partial update. The slug is re-derived only when the name
    /// changes and no explicit slug is given.
    pub async fn update(
        &self,
        id: i64,
        input: UpdateSubjectInput,
    ) -> Result<Subject, SubjectServiceError> {
        let mut subject = self.get(id).await?;

        if let Some(course_id) = input.course_id {
            subject.course_id = course_id;
        }
        if let Some(name) = input.name {
            let name = name.trim().to_string();
            if name.len() < 2 {
                return Err(SubjectServiceError::ValidationError(
                    "Name must be at least 2 characters".to_string(),
                ));
            }
            if input.slug.is_none() {
                subject.slug = resolve_slug(None, &name)?;
            }
            subject.name = name;
        }
        if let Some(slug) = input.slug {
            subject.slug = resolve_slug(Some(&slug), &subject.name)?;
        }
        if let Some(code) = input.code {
            subject.code = Some(code).filter(|s| !s.trim().is_empty());
        }
        if input.semester.is_some() {
            validate_semester(input.semester)?;
            subject.semester = input.semester;
        }

        self.repo.update(&subject).await.map_err(map_storage_error)
    }

    /// Hard-delete a subject
    pub async fn delete(&self, id: i64) -> Result<(), SubjectServiceError> {
        if !self.repo.delete(id).await? {
            return Err(SubjectServiceError::NotFound(id));
        }
        Ok(())
    }
}

fn validate_semester(semester: Option<i64>) -> Result<(), SubjectServiceError> {
    if let Some(s) = semester {
        if !(1..=12).contains(&s) {
            return Err(SubjectServiceError::ValidationError(
                "Semester must be between 1 and 12".to_string(),
            ));
        }
    }
    Ok(())
}

fn resolve_slug(explicit: Option<&str>, name: &str) -> Result<String, SubjectServiceError> {
    let slug = match explicit.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => s.to_string(),
        None => generate_slug(name),
    };
    if slug.is_empty() {
        return Err(SubjectServiceError::ValidationError(
            "Cannot derive a slug from the given name".to_string(),
        ));
    }
    Ok(slug)
}

fn map_storage_error(err: anyhow::Error) -> SubjectServiceError {
    if is_unique_violation(&err) {
        SubjectServiceError::Conflict(
            "A subject with this slug already exists in the course".to_string(),
        )
    } else if is_fk_violation(&err) {
        SubjectServiceError::ValidationError("Unknown course".to_string())
    } else {
        SubjectServiceError::InternalError(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{
        CollegeRepository, CourseRepository, SqlxCollegeRepository, SqlxCourseRepository,
        SqlxSubjectRepository,
    };
    use crate::db::{create_test_pool, migrations};
    use crate::models::{College, Course};

    async fn setup() -> (SubjectService, i64) {
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
        (
            SubjectService::new(SqlxSubjectRepository::boxed(pool)),
            course.id,
        )
    }

    #[tokio::test]
    async fn test_create_with_code_and_semester() {
        let (service, course_id) = setup().await;
        let subject = service
            .create(CreateSubjectInput {
                course_id,
                name: "Data Structures".into(),
                code: Some("CS-201".into()),
                semester: Some(3),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(subject.slug, "data-structures");
        assert_eq!(subject.semester, Some(3));
    }

    #[tokio::test]
    async fn test_semester_out_of_range_rejected() {
        let (service, course_id) = setup().await;
        let err = service
            .create(CreateSubjectInput {
                course_id,
                name: "Data Structures".into(),
                semester: Some(13),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, SubjectServiceError::ValidationError(_)));
    }
}
