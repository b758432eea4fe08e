//! Authentication API endpoints
//!
//! Handles HTTP requests for admin authentication:
//! - POST /api/auth/login - Admin login
//! - POST /api/auth/logout - Admin logout
//!
//! There is a single admin identity configured in `auth`; login compares
//! the submitted email case-insensitively and runs the password through
//! the credential ladder (configured hash first, plaintext fallback).

use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use serde::Deserialize;

use crate::api::common::OkResponse;
use crate::api::middleware::{ApiError, AppState};
use crate::services::password::{hash_password, verify_admin_password};
use crate::services::{
    create_session, REMEMBERED_SESSION_SECS, SESSION_COOKIE, SHORT_SESSION_SECS,
};

/// Request body for admin login. An omitted `remember` means a
/// remembered (7-day) session.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    #[serde(default = "default_remember")]
    pub remember: bool,
}

fn default_remember() -> bool {
    true
}

/// Build the auth router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
}

/// Minimal email shape check: non-empty local part and a domain with a
/// dot, no whitespace.
fn is_email_shaped(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.contains(char::is_whitespace)
}

fn session_cookie(state: &AppState, token: &str, max_age: i64) -> Result<HeaderValue, ApiError> {
    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE, token, max_age
    );
    if state.secure_cookies {
        cookie.push_str("; Secure");
    }

    HeaderValue::from_str(&cookie)
        .map_err(|e| ApiError::internal_error(format!("Failed to build session cookie: {}", e)))
}

/// POST /api/auth/login - Admin login
///
/// Missing fields are a 400, a credential mismatch is a 401. The two
/// failure modes stay distinguishable but the 401 message never says
/// which credential was wrong.
async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (Some(email), Some(password)) = (body.email, body.password) else {
        return Err(ApiError::validation_error("email and password are required"));
    };
    if !is_email_shaped(email.trim()) {
        return Err(ApiError::validation_error("A valid email is required"));
    }
    if password.len() < 6 {
        return Err(ApiError::validation_error(
            "Password must be at least 6 characters",
        ));
    }

    let auth = &state.auth_config;
    let email_matches = email.trim().eq_ignore_ascii_case(&auth.admin_email);
    let password_matches = verify_admin_password(
        &password,
        &auth.admin_password,
        auth.admin_password_hash.as_deref(),
    );
    if !email_matches || !password_matches {
        return Err(ApiError::unauthorized("Invalid email or password"));
    }

    // Best-effort audit bootstrap; never affects the auth decision.
    match hash_password(&password) {
        Ok(hash) => {
            if let Err(e) = state
                .admin_user_repo
                .ensure_exists(&auth.admin_email, &hash)
                .await
            {
                tracing::warn!("Failed to record admin user: {}", e);
            }
        }
        Err(e) => tracing::warn!("Failed to hash admin password for audit row: {}", e),
    }

    let max_age = if body.remember {
        REMEMBERED_SESSION_SECS
    } else {
        SHORT_SESSION_SECS
    };
    let token = create_session(&auth.admin_email, max_age, auth.session_secret());

    let mut headers = HeaderMap::new();
    headers.insert(header::SET_COOKIE, session_cookie(&state, &token, max_age)?);

    Ok((headers, Json(OkResponse::ok())))
}

/// POST /api/auth/logout - Admin logout
///
/// Pure cookie clearing; there is no server-side session store to revoke
/// from, so an old token stays valid until its own expiry.
async fn logout(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let mut headers = HeaderMap::new();
    headers.insert(header::SET_COOKIE, session_cookie(&state, "", 0)?);

    Ok((headers, Json(OkResponse::ok())))
}
