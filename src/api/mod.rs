//! API layer - HTTP handlers and routing
//!
//! This module contains all HTTP endpoints for the StudySprint catalog:
//! - Auth endpoints (admin login/logout)
//! - College / Course / Subject / Material CRUD endpoints
//! - Upload endpoint
//! - The admin page gate and static file serving
//!
//! Reads are public; every mutation sits behind the admin session
//! middleware.

pub mod auth;
pub mod colleges;
pub mod common;
pub mod courses;
pub mod materials;
pub mod middleware;
pub mod subjects;
pub mod upload;

use axum::{
    http::{header, HeaderValue, Method},
    middleware as axum_middleware,
    routing::{delete, get, patch, post},
    Router,
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

pub use common::{ItemEnvelope, OkResponse, Paginated};
pub use middleware::{ApiError, AppState};

/// Build the main API router
pub fn build_api_router(state: AppState) -> Router<AppState> {
    // Mutation routes (need a valid admin session)
    let admin_routes = Router::new()
        .route("/colleges", post(colleges::create_college))
        .route("/colleges/{id}", patch(colleges::update_college))
        .route("/colleges/{id}", delete(colleges::delete_college))
        .route("/courses", post(courses::create_course))
        .route("/courses/{id}", patch(courses::update_course))
        .route("/courses/{id}", delete(courses::delete_course))
        .route("/subjects", post(subjects::create_subject))
        .route("/subjects/{id}", patch(subjects::update_subject))
        .route("/subjects/{id}", delete(subjects::delete_subject))
        .route("/materials", post(materials::create_material))
        .route("/materials/{id}", patch(materials::update_material))
        .route("/materials/{id}", delete(materials::delete_material))
        .nest("/upload", upload::router(state.upload_config.max_file_size))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::require_admin,
        ));

    // Public routes
    Router::new()
        .nest("/auth", auth::router())
        .route("/colleges", get(colleges::list_colleges))
        .route("/colleges/{id}", get(colleges::get_college))
        .route("/courses", get(courses::list_courses))
        .route("/courses/{id}", get(courses::get_course))
        .route("/subjects", get(subjects::list_subjects))
        .route("/subjects/{id}", get(subjects::get_subject))
        .route("/materials", get(materials::list_materials))
        .route("/materials/{id}", get(materials::get_material))
        .merge(admin_routes)
}

/// Build the complete router with middleware
pub fn build_router(state: AppState, cors_origin: &str) -> Router {
    // CORS must allow credentials for cookie auth
    let cors = CorsLayer::new()
        .allow_origin(cors_origin.parse::<HeaderValue>().unwrap())
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::COOKIE])
        .allow_credentials(true);

    Router::new()
        .nest("/api", build_api_router(state.clone()))
        // Static file serving (admin SPA and uploaded assets)
        .fallback_service(ServeDir::new("static"))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::admin_gate,
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
