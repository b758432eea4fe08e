//! Material API endpoints
//!
//! Handles HTTP requests for study-material management:
//! - GET /api/materials - List materials (paginated, filter by subject/type)
//! - POST /api/materials - Create a material (admin)
//! - GET /api/materials/{id} - Get a material
//! - PATCH /api/materials/{id} - Update a material (admin)
//! - DELETE /api/materials/{id} - Delete a material (admin)

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::api::common::{
    resolve_page, resolve_page_size, resolve_query, ItemEnvelope, OkResponse, Paginated,
};
use crate::api::middleware::{ApiError, AppState};
use crate::models::{Material, MaterialType};
use crate::services::material::MaterialServiceError;
use crate::services::{CreateMaterialInput, UpdateMaterialInput};

impl From<MaterialServiceError> for ApiError {
    fn from(err: MaterialServiceError) -> Self {
        match err {
            MaterialServiceError::NotFound(id) => {
                ApiError::not_found(format!("Material {} not found", id))
            }
            MaterialServiceError::ValidationError(msg) => ApiError::validation_error(msg),
            MaterialServiceError::InternalError(e) => ApiError::internal_error(e.to_string()),
        }
    }
}

/// Query parameters for listing materials
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListMaterialsQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub q: Option<String>,
    pub subject_id: Option<i64>,
    /// Material type filter; an unknown value is a 400
    #[serde(rename = "type")]
    pub material_type: Option<String>,
}

/// Request body for creating a material
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMaterialRequest {
    pub subject_id: i64,
    #[serde(rename = "type")]
    pub material_type: MaterialType,
    pub title: String,
    pub description: Option<String>,
    pub file_url: Option<String>,
    pub external_url: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub year: Option<i64>,
    pub author: Option<String>,
}

/// Request body for a partial material update
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMaterialRequest {
    pub subject_id: Option<i64>,
    #[serde(rename = "type")]
    pub material_type: Option<MaterialType>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub file_url: Option<String>,
    pub external_url: Option<String>,
    pub tags: Option<Vec<String>>,
    pub year: Option<i64>,
    pub author: Option<String>,
}

/// GET /api/materials - List materials
pub async fn list_materials(
    State(state): State<AppState>,
    Query(query): Query<ListMaterialsQuery>,
) -> Result<Json<Paginated<Material>>, ApiError> {
    let page = resolve_page(query.page);
    let page_size = resolve_page_size(query.page_size);

    let material_type = query
        .material_type
        .map(|raw| {
            raw.parse::<MaterialType>()
                .map_err(ApiError::validation_error)
        })
        .transpose()?;

    let (items, total) = state
        .material_service
        .list(
            resolve_query(query.q),
            query.subject_id,
            material_type,
            page,
            page_size,
        )
        .await?;

    Ok(Json(Paginated {
        items,
        total,
        page,
        page_size,
    }))
}

/// GET /api/materials/{id} - Get a material
pub async fn get_material(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ItemEnvelope<Material>>, ApiError> {
    let item = state.material_service.get(id).await?;
    Ok(Json(ItemEnvelope { item }))
}

/// POST /api/materials - Create a material
pub async fn create_material(
    State(state): State<AppState>,
    Json(body): Json<CreateMaterialRequest>,
) -> Result<Json<ItemEnvelope<Material>>, ApiError> {
    let item = state
        .material_service
        .create(CreateMaterialInput {
            subject_id: body.subject_id,
            material_type: body.material_type,
            title: body.title,
            description: body.description,
            file_url: body.file_url,
            external_url: body.external_url,
            tags: body.tags,
            year: body.year,
            author: body.author,
        })
        .await?;

    Ok(Json(ItemEnvelope { item }))
}

/// PATCH /api/materials/{id} - Update a material
pub async fn update_material(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateMaterialRequest>,
) -> Result<Json<ItemEnvelope<Material>>, ApiError> {
    let item = state
        .material_service
        .update(
            id,
            UpdateMaterialInput {
                subject_id: body.subject_id,
                material_type: body.material_type,
                title: body.title,
                description: body.description,
                file_url: body.file_url,
                external_url: body.external_url,
                tags: body.tags,
                year: body.year,
                author: body.author,
            },
        )
        .await?;

    Ok(Json(ItemEnvelope { item }))
}

/// DELETE /api/materials/{id} - Delete a material
pub async fn delete_material(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<OkResponse>, ApiError> {
    state.material_service.delete(id).await?;
    Ok(Json(OkResponse::ok()))
}
