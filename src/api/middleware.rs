//! API middleware
//!
//! Contains middleware for:
//! - Session validation for admin-only API routes
//! - The admin page gate (redirects anonymous visitors to the login page)

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::{AuthConfig, UploadConfig};
use crate::db::repositories::AdminUserRepository;
use crate::services::college::CollegeService;
use crate::services::course::CourseService;
use crate::services::material::MaterialService;
use crate::services::subject::SubjectService;
use crate::services::{verify_session, AdminSession, SESSION_COOKIE};

/// Application state containing shared services
#[derive(Clone)]
pub struct AppState {
    pub college_service: Arc<CollegeService>,
    pub course_service: Arc<CourseService>,
    pub subject_service: Arc<SubjectService>,
    pub material_service: Arc<MaterialService>,
    pub admin_user_repo: Arc<dyn AdminUserRepository>,
    pub auth_config: Arc<AuthConfig>,
    pub upload_config: Arc<UploadConfig>,
    /// Mark session cookies Secure (production behind TLS)
    pub secure_cookies: bool,
}

/// Verified admin session extracted from the request cookie
#[derive(Debug, Clone)]
pub struct AuthenticatedAdmin(pub AdminSession);

/// Error response for API errors
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ApiErrorDetail {
                code: code.into(),
                message: message.into(),
                details: None,
            },
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new("UNAUTHORIZED", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("NOT_FOUND", message)
    }

    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new("CONFLICT", message)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new("INTERNAL_ERROR", message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.error.code.as_str() {
            "UNAUTHORIZED" => StatusCode::UNAUTHORIZED,
            "FORBIDDEN" => StatusCode::FORBIDDEN,
            "NOT_FOUND" => StatusCode::NOT_FOUND,
            "VALIDATION_ERROR" => StatusCode::BAD_REQUEST,
            "CONFLICT" => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(self)).into_response()
    }
}

/// Extract the admin session cookie value from the request
fn extract_session_cookie(request: &Request) -> Option<String> {
    let cookie_header = request.headers().get(header::COOKIE)?;
    let cookie_str = cookie_header.to_str().ok()?;

    for cookie in cookie_str.split(';') {
        let cookie = cookie.trim();
        if let Some(token) = cookie.strip_prefix(SESSION_COOKIE) {
            if let Some(value) = token.strip_prefix('=') {
                return Some(value.to_string());
            }
        }
    }

    None
}

/// Admin authentication middleware for API routes
///
/// Every mutation route sits behind this regardless of the page gate.
pub async fn require_admin(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_session_cookie(&request)
        .ok_or_else(|| ApiError::unauthorized("Authentication required"))?;

    let session = verify_session(&token, state.auth_config.session_secret())
        .ok_or_else(|| ApiError::unauthorized("Invalid or expired session"))?;

    request.extensions_mut().insert(AuthenticatedAdmin(session));
    Ok(next.run(request).await)
}

/// Admin page gate
///
/// Paths outside `/admin` pass through untouched, as does the login page
/// itself. Any other `/admin` path without a valid session cookie is
/// answered with a 303 redirect to the login page carrying the original
/// path in `next`.
pub async fn admin_gate(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let path = request.uri().path();

    if !path.starts_with("/admin") || path == "/admin/login" {
        return next.run(request).await;
    }

    let authed = extract_session_cookie(&request)
        .and_then(|token| verify_session(&token, state.auth_config.session_secret()))
        .is_some();

    if authed {
        return next.run(request).await;
    }

    let location = format!("/admin/login?next={}", urlencoding::encode(path));
    match HeaderValue::from_str(&location) {
        Ok(value) => (StatusCode::SEE_OTHER, [(header::LOCATION, value)]).into_response(),
        Err(_) => StatusCode::SEE_OTHER.into_response(),
    }
}
