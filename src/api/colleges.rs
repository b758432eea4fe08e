//! College API endpoints
//!
//! Handles HTTP requests for college management:
//! - GET /api/colleges - List colleges (paginated, searchable)
//! - POST /api/colleges - Create a college (admin)
//! - GET /api/colleges/{id} - Get a college
//! - PATCH /api/colleges/{id} - Update a college (admin)
//! - DELETE /api/colleges/{id} - Delete a college (admin)

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::api::common::{
    resolve_page, resolve_page_size, resolve_query, ItemEnvelope, OkResponse, Paginated,
};
use crate::api::middleware::{ApiError, AppState};
use crate::models::College;
use crate::services::college::CollegeServiceError;
use crate::services::{CreateCollegeInput, UpdateCollegeInput};

impl From<CollegeServiceError> for ApiError {
    fn from(err: CollegeServiceError) -> Self {
        match err {
            CollegeServiceError::NotFound(id) => {
                ApiError::not_found(format!("College {} not found", id))
            }
            CollegeServiceError::ValidationError(msg) => ApiError::validation_error(msg),
            CollegeServiceError::Conflict(msg) => ApiError::conflict(msg),
            CollegeServiceError::InternalError(e) => ApiError::internal_error(e.to_string()),
        }
    }
}

/// Query parameters for listing colleges
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCollegesQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub q: Option<String>,
}

/// Request body for creating a college
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCollegeRequest {
    pub name: String,
    pub slug: Option<String>,
    pub location: Option<String>,
    pub logo_url: Option<String>,
}

/// Request body for a partial college update
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCollegeRequest {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub location: Option<String>,
    pub logo_url: Option<String>,
}

/// GET /api/colleges - List colleges
pub async fn list_colleges(
    State(state): State<AppState>,
    Query(query): Query<ListCollegesQuery>,
) -> Result<Json<Paginated<College>>, ApiError> {
    let page = resolve_page(query.page);
    let page_size = resolve_page_size(query.page_size);

    let (items, total) = state
        .college_service
        .list(resolve_query(query.q), page, page_size)
        .await?;

    Ok(Json(Paginated {
        items,
        total,
        page,
        page_size,
    }))
}

/// GET /api/colleges/{id} - Get a college
pub async fn get_college(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ItemEnvelope<College>>, ApiError> {
    let item = state.college_service.get(id).await?;
    Ok(Json(ItemEnvelope { item }))
}

/// POST /api/colleges - Create a college
pub async fn create_college(
    State(state): State<AppState>,
    Json(body): Json<CreateCollegeRequest>,
) -> Result<Json<ItemEnvelope<College>>, ApiError> {
    let item = state
        .college_service
        .create(CreateCollegeInput {
            name: body.name,
            slug: body.slug,
            location: body.location,
            logo_url: body.logo_url,
        })
        .await?;

    Ok(Json(ItemEnvelope { item }))
}

/// PATCH /api/colleges/{id} - Update a college
pub async fn update_college(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateCollegeRequest>,
) -> Result<Json<ItemEnvelope<College>>, ApiError> {
    let item = state
        .college_service
        .update(
            id,
            UpdateCollegeInput {
                name: body.name,
                slug: body.slug,
                location: body.location,
                logo_url: body.logo_url,
            },
        )
        .await?;

    Ok(Json(ItemEnvelope { item }))
}

/// DELETE /api/colleges/{id} - Delete a college
///
/// Children cascade at the storage level.
pub async fn delete_college(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<OkResponse>, ApiError> {
    state.college_service.delete(id).await?;
    Ok(Json(OkResponse::ok()))
}
