//! College service
//!
//! Business logic for college management: validation, slug derivation and
//! conflict mapping on top of the repository.

use crate::db::repositories::{CollegeFilter, CollegeRepository};
use crate::models::College;
use crate::services::slug::generate_slug;
use crate::services::is_unique_violation;
use std::sync::Arc;

/// Error types for college service operations
#[derive(Debug, thiserror::Error)]
pub enum CollegeServiceError {
    /// College not found
    #[error("College not found: {0}")]
    NotFound(i64),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Slug already taken
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Input for creating a college
#[derive(Debug, Clone, Default)]
pub struct CreateCollegeInput {
    pub name: String,
    pub slug: Option<String>,
    pub location: Option<String>,
    pub logo_url: Option<String>,
}

/// Input for a partial college update
#[derive(Debug, Clone, Default)]
pub struct UpdateCollegeInput {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub location: Option<String>,
    pub logo_url: Option<String>,
}

/// College service
pub struct CollegeService {
    repo: Arc<dyn CollegeRepository>,
}

impl CollegeService {
    /// Create a new college service
    pub fn new(repo: Arc<dyn CollegeRepository>) -> Self {
        Self { repo }
    }

    /// List colleges with free-text filter and pagination.
    /// Returns the items for the page plus the total match count.
    pub async fn list(
        &self,
        q: Option<String>,
        page: u32,
        page_size: u32,
    ) -> Result<(Vec<College>, i64), CollegeServiceError> {
        let filter = CollegeFilter { q };
        let offset = (page as i64 - 1) * page_size as i64;
        let items = self.repo.list(&filter, offset, page_size as i64).await?;
        let total = self.repo.count(&filter).await?;
        Ok((items, total))
    }

    /// Get a college by ID
    pub async fn get(&self, id: i64) -> Result<College, CollegeServiceError> {
        self.repo
            .get_by_id(id)
            .await?
            .ok_or(CollegeServiceError::NotFound(id))
    }

    /// Create a college. The slug is derived from the name when not
    /// supplied explicitly.
    pub async fn create(&self, input: CreateCollegeInput) -> Result<College, CollegeServiceError> {
        let name = input.name.trim().to_string();
        if name.len() < 2 {
            return Err(CollegeServiceError::ValidationError(
                "Name must be at least 2 characters".to_string(),
            ));
        }

        let slug = resolve_slug(input.slug.as_deref(), &name)?;

        let mut college = College::new(name, slug);
        college.location = input.location.filter(|s| !s.trim().is_empty());
        college.logo_url = input.logo_url.filter(|s| !s.trim().is_empty());

        self.repo.create(&college).await.map_err(map_conflict)
    }

    /// Apply a partial update. The slug is re-derived only when the name
    /// changes and no explicit slug is given.
    pub async fn update(
        &self,
        id: i64,
        input: UpdateCollegeInput,
    ) -> Result<College, CollegeServiceError> {
        let mut college = self.get(id).await?;

        if let Some(name) = input.name {
            let name = name.trim().to_string();
            if name.len() < 2 {
                return Err(CollegeServiceError::ValidationError(
                    "Name must be at least 2 characters".to_string(),
                ));
            }
            if input.slug.is_none() {
                college.slug = resolve_slug(None, &name)?;
            }
            college.name = name;
        }
        if let Some(slug) = input.slug {
            college.slug = resolve_slug(Some(&slug), &college.name)?;
        }
        if let Some(location) = input.location {
            college.location = Some(location).filter(|s| !s.trim().is_empty());
        }
        if let Some(logo_url) = input.logo_url {
            college.logo_url = Some(logo_url).filter(|s| !s.trim().is_empty());
        }

        self.repo.update(&college).await.map_err(map_conflict)
    }

    /// Hard-delete a college (and, via the schema, its courses, subjects
    /// and materials).
    pub async fn delete(&self, id: i64) -> Result<(), CollegeServiceError> {
        if !self.repo.delete(id).await? {
            return Err(CollegeServiceError::NotFound(id));
        }
        Ok(())
    }
}

fn resolve_slug(explicit: Option<&str>, name: &str) -> Result<String, CollegeServiceError> {
    let slug = match explicit.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => s.to_string(),
        None => generate_slug(name),
    };
    if slug.is_empty() {
        return Err(CollegeServiceError::ValidationError(
            "Cannot derive a slug from the given name".to_string(),
        ));
    }
    Ok(slug)
}

fn map_conflict(err: anyhow::Error) -> CollegeServiceError {
    if is_unique_violation(&err) {
        CollegeServiceError::Conflict("A college with this slug already exists".to_string())
    } else {
        CollegeServiceError::InternalError(err)
    }
}
