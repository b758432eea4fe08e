//! Course API endpoints
//!
//! Handles HTTP requests for course management:
//! - GET /api/courses - List courses (paginated, filter by college)
//! - POST /api/courses - Create a course (admin)
//! - GET /api/courses/{id} - Get a course
//! - PATCH /api/courses/{id} - Update a course (admin)
//! - DELETE /api/courses/{id} - Delete a course (admin)

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::api::common::{
    resolve_page, resolve_page_size, resolve_query, ItemEnvelope, OkResponse, Paginated,
};
use crate::api::middleware::{ApiError, AppState};
use crate::models::Course;
use crate::services::course::CourseServiceError;
use crate::services::{CreateCourseInput, UpdateCourseInput};

impl From<CourseServiceError> for ApiError {
    fn from(err: CourseServiceError) -> Self {
        match err {
            CourseServiceError::NotFound(id) => {
                ApiError::not_found(format!("Course {} not found", id))
            }
            CourseServiceError::ValidationError(msg) => ApiError::validation_error(msg),
            CourseServiceError::Conflict(msg) => ApiError::conflict(msg),
            CourseServiceError::InternalError(e) => ApiError::internal_error(e.to_string()),
        }
    }
}

/// Query parameters for listing courses
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCoursesQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub q: Option<String>,
    pub college_id: Option<i64>,
}

/// Request body for creating a course
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourseRequest {
    pub college_id: i64,
    pub name: String,
    pub slug: Option<String>,
}

/// Request body for a partial course update
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCourseRequest {
    pub college_id: Option<i64>,
    pub name: Option<String>,
    pub slug: Option<String>,
}

/// GET /api/courses - List courses
pub async fn list_courses(
    State(state): State<AppState>,
    Query(query): Query<ListCoursesQuery>,
) -> Result<Json<Paginated<Course>>, ApiError> {
    let page = resolve_page(query.page);
    let page_size = resolve_page_size(query.page_size);

    let (items, total) = state
        .course_service
        .list(resolve_query(query.q), query.college_id, page, page_size)
        .await?;

    Ok(Json(Paginated {
        items,
        total,
        page,
        page_size,
    }))
}

/// GET /api/courses/{id} - Get a course
pub async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ItemEnvelope<Course>>, ApiError> {
    let item = state.course_service.get(id).await?;
    Ok(Json(ItemEnvelope { item }))
}

/// POST /api/courses - Create a course
pub async fn create_course(
    State(state): State<AppState>,
    Json(body): Json<CreateCourseRequest>,
) -> Result<Json<ItemEnvelope<Course>>, ApiError> {
    let item = state
        .course_service
        .create(CreateCourseInput {
            college_id: body.college_id,
            name: body.name,
            slug: body.slug,
        })
        .await?;

    Ok(Json(ItemEnvelope { item }))
}

/// PATCH /api/courses/{id} - Update a course
pub async fn update_course(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateCourseRequest>,
) -> Result<Json<ItemEnvelope<Course>>, ApiError> {
    let item = state
        .course_service
        .update(
            id,
            UpdateCourseInput {
                college_id: body.college_id,
                name: body.name,
                slug: body.slug,
            },
        )
        .await?;

    Ok(Json(ItemEnvelope { item }))
}

/// DELETE /api/courses/{id} - Delete a course
pub async fn delete_course(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<OkResponse>, ApiError> {
    state.course_service.delete(id).await?;
    Ok(Json(OkResponse::ok()))
}
