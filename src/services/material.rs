//! Material service

use crate::db::repositories::{MaterialFilter, MaterialRepository};
use crate::models::{Material, MaterialType};
use crate::services::is_fk_violation;
use chrono::Datelike;
use std::sync::Arc;

/// Error types for material service operations
#[derive(Debug, thiserror::Error)]
pub enum MaterialServiceError {
    /// Material not found
    #[error("Material not found: {0}")]
    NotFound(i64),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Input for creating a material
#[derive(Debug, Clone, Default)]
pub struct CreateMaterialInput {
    pub subject_id: i64,
    pub material_type: MaterialType,
    pub title: String,
    pub description: Option<String>,
    pub file_url: Option<String>,
    pub external_url: Option<String>,
    pub tags: Vec<String>,
    pub year: Option<i64>,
    pub author: Option<String>,
}

/// Input for a partial material update
#[derive(Debug, Clone, Default)]
pub struct UpdateMaterialInput {
    pub subject_id: Option<i64>,
    pub material_type: Option<MaterialType>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub file_url: Option<String>,
    pub external_url: Option<String>,
    pub tags: Option<Vec<String>>,
    pub year: Option<i64>,
    pub author: Option<String>,
}

/// Material service
pub struct MaterialService {
    repo: Arc<dyn MaterialRepository>,
}

impl MaterialService {
    /// Create a new material service
    pub fn new(repo: Arc<dyn MaterialRepository>) -> Self {
        Self { repo }
    }

    /// List materials with free-text filter, optional subject and type
    /// restrictions, and pagination.
    pub async fn list(
        &self,
        q: Option<String>,
        subject_id: Option<i64>,
        material_type: Option<MaterialType>,
        page: u32,
        page_size: u32,
    ) -> Result<(Vec<Material>, i64), MaterialServiceError> {
        let filter = MaterialFilter {
            q,
            subject_id,
            material_type,
        };
        let offset = (page as i64 - 1) * page_size as i64;
        let items = self.repo.list(&filter, offset, page_size as i64).await?;
        let total = self.repo.count(&filter).await?;
        Ok((items, total))
    }

    /// Get a material by ID
    pub async fn get(&self, id: i64) -> Result<Material, MaterialServiceError> {
        self.repo
            .get_by_id(id)
            .await?
            .ok_or(MaterialServiceError::NotFound(id))
    }

    /// Create a material under a subject
    pub async fn create(
        &self,
        input: CreateMaterialInput,
    ) -> Result<Material, MaterialServiceError> {
        let title = input.title.trim().to_string();
        if title.len() < 2 {
            return Err(MaterialServiceError::ValidationError(
                "Title must be at least 2 characters".to_string(),
            ));
        }
        validate_year(input.year)?;

        let mut material = Material::new(input.subject_id, input.material_type, title);
        material.description = input.description.filter(|s| !s.trim().is_empty());
        material.file_url = input.file_url.filter(|s| !s.trim().is_empty());
        material.external_url = input.external_url.filter(|s| !s.trim().is_empty());
        material.tags = normalize_tags(input.tags);
        material.year = input.year;
        material.author = input.author.filter(|s| !s.trim().is_empty());

        self.repo.create(&material).await.map_err(map_storage_error)
    }

    /// Apply a partial update
    pub async fn update(
        &self,
        id: i64,
        input: UpdateMaterialInput,
    ) -> Result<Material, MaterialServiceError> {
        let mut material = self.get(id).await?;

        if let Some(subject_id) = input.subject_id {
            material.subject_id = subject_id;
        }
        if let Some(material_type) = input.material_type {
            material.material_type = material_type;
        }
        if let Some(title) = input.title {
            let title = title.trim().to_string();
            if title.len() < 2 {
                return Err(MaterialServiceError::ValidationError(
                    "Title must be at least 2 characters".to_string(),
                ));
            }
            material.title = title;
        }
        if let Some(description) = input.description {
            material.description = Some(description).filter(|s| !s.trim().is_empty());
        }
        if let Some(file_url) = input.file_url {
            material.file_url = Some(file_url).filter(|s| !s.trim().is_empty());
        }
        if let Some(external_url) = input.external_url {
            material.external_url = Some(external_url).filter(|s| !s.trim().is_empty());
        }
        if let Some(tags) = input.tags {
            material.tags = normalize_tags(tags);
        }
        if input.year.is_some() {
            validate_year(input.year)?;
            material.year = input.year;
        }
        if let Some(author) = input.author {
            material.author = Some(author).filter(|s| !s.trim().is_empty());
        }

        self.repo.update(&material).await.map_err(map_storage_error)
    }

    /// Hard-delete a material
    pub async fn delete(&self, id: i64) -> Result<(), MaterialServiceError> {
        if !self.repo.delete(id).await? {
            return Err(MaterialServiceError::NotFound(id));
        }
        Ok(())
    }
}

fn validate_year(year: Option<i64>) -> Result<(), MaterialServiceError> {
    if let Some(y) = year {
        let current = chrono::Utc::now().year() as i64;
        if !(1900..=current).contains(&y) {
            return Err(MaterialServiceError::ValidationError(format!(
                "Year must be between 1900 and {}",
                current
            )));
        }
    }
    Ok(())
}

fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    tags.into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

fn map_storage_error(err: anyhow::Error) -> MaterialServiceError {
    if is_fk_violation(&err) {
        MaterialServiceError::ValidationError("Unknown subject".to_string())
    } else {
        MaterialServiceError::InternalError(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{
        CollegeRepository, CourseRepository, SqlxCollegeRepository, SqlxCourseRepository,
        SqlxMaterialRepository, SqlxSubjectRepository, SubjectRepository,
    };
    use crate::db::{create_test_pool, migrations};
    use crate::models::{College, Course, Subject};

    async fn setup() -> (MaterialService, i64) {
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
        let subject = SqlxSubjectRepository::new(pool.clone())
            .create(&Subject::new(course.id, "DS".into(), "ds".into()))
            .await
            .unwrap();
        (
            MaterialService::new(SqlxMaterialRepository::boxed(pool)),
            subject.id,
        )
    }

    #[tokio::test]
    async fn test_create_normalizes_tags() {
        let (service, subject_id) = setup().await;
        let material = service
            .create(CreateMaterialInput {
                subject_id,
                material_type: MaterialType::Notes,
                title: "Unit 1".into(),
                tags: vec![" trees ".into(), "".into(), "graphs".into()],
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(material.tags, vec!["trees".to_string(), "graphs".to_string()]);
    }

    #[tokio::test]
    async fn test_year_bounds() {
        let (service, subject_id) = setup().await;
        let err = service
            .create(CreateMaterialInput {
                subject_id,
                material_type: MaterialType::Notes,
                title: "Old Notes".into(),
                year: Some(1800),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, MaterialServiceError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_unknown_subject_is_validation_error() {
        let (service, _) = setup().await;
        let err = service
            .create(CreateMaterialInput {
                subject_id: 999,
                material_type: MaterialType::Notes,
                title: "Orphan".into(),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, MaterialServiceError::ValidationError(_)));
    }
}
