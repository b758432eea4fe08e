//! Subject API endpoints
//!
//! Handles HTTP requests for subject management:
//! - GET /api/subjects - List subjects (paginated, filter by course)
//! - POST /api/subjects - Create a subject (admin)
//! - GET /api/subjects/{id} - Get a subject
//! - PATCH /api/subjects/{id} - Update a subject (admin)
//! - DELETE /api/subjects/{id} - Delete a subject (admin)

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::api::common::{
    resolve_page, resolve_page_size, resolve_query, ItemEnvelope, OkResponse, Paginated,
};
use crate::api::middleware::{ApiError, AppState};
use crate::models::Subject;
use crate::services::subject::SubjectServiceError;
use crate::services::{CreateSubjectInput, UpdateSubjectInput};

impl From<SubjectServiceError> for ApiError {
    fn from(err: SubjectServiceError) -> Self {
        match err {
            SubjectServiceError::NotFound(id) => {
                ApiError::not_found(format!("Subject {} not found", id))
            }
            SubjectServiceError::ValidationError(msg) => ApiError::validation_error(msg),
            SubjectServiceError::Conflict(msg) => ApiError::conflict(msg),
            SubjectServiceError::InternalError(e) => ApiError::internal_error(e.to_string()),
        }
    }
}

/// Query parameters for listing subjects
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSubjectsQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub q: Option<String>,
    pub course_id: Option<i64>,
}

/// Request body for creating a subject
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubjectRequest {
    pub course_id: i64,
    pub name: String,
    pub slug: Option<String>,
    pub code: Option<String>,
    pub semester: Option<i64>,
}

/// Request body for a partial subject update
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSubjectRequest {
    pub course_id: Option<i64>,
    pub name: Option<String>,
    pub slug: Option<String>,
    pub code: Option<String>,
    pub semester: Option<i64>,
}

/// GET /api/subjects - List subjects
pub async fn list_subjects(
    State(state): State<AppState>,
    Query(query): Query<ListSubjectsQuery>,
) -> Result<Json<Paginated<Subject>>, ApiError> {
    let page = resolve_page(query.page);
    let page_size = resolve_page_size(query.page_size);

    let (items, total) = state
        .subject_service
        .list(resolve_query(query.q), query.course_id, page, page_size)
        .await?;

    Ok(Json(Paginated {
        items,
        total,
        page,
        page_size,
    }))
}

/// GET /api/subjects/{id} - Get a subject
pub async fn get_subject(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ItemEnvelope<Subject>>, ApiError> {
    let item = state.subject_service.get(id).await?;
    Ok(Json(ItemEnvelope { item }))
}

/// POST /api/subjects - Create a subject
pub async fn create_subject(
    State(state): State<AppState>,
    Json(body): Json<CreateSubjectRequest>,
) -> Result<Json<ItemEnvelope<Subject>>, ApiError> {
    let item = state
        .subject_service
        .create(CreateSubjectInput {
            course_id: body.course_id,
            name: body.name,
            slug: body.slug,
            code: body.code,
            semester: body.semester,
        })
        .await?;

    Ok(Json(ItemEnvelope { item }))
}

/// PATCH /api/subjects/{id} - Update a subject
pub async fn update_subject(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateSubjectRequest>,
) -> Result<Json<ItemEnvelope<Subject>>, ApiError> {
    let item = state
        .subject_service
        .update(
            id,
            UpdateSubjectInput {
                course_id: body.course_id,
                name: body.name,
                slug: body.slug,
                code: body.code,
                semester: body.semester,
            },
        )
        .await?;

    Ok(Json(ItemEnvelope { item }))
}

/// DELETE /api/subjects/{id} - Delete a subject
pub async fn delete_subject(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<OkResponse>, ApiError> {
    state.subject_service.delete(id).await?;
    Ok(Json(OkResponse::ok()))
}
