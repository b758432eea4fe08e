//! End-to-end API tests over an in-memory database.

use std::sync::Arc;

use axum_test::{TestServer, TestServerConfig};
use serde_json::{json, Value};

use studysprint::api::{build_router, AppState};
use studysprint::config::{AuthConfig, UploadConfig};
use studysprint::db::repositories::{
    SqlxAdminUserRepository, SqlxCollegeRepository, SqlxCourseRepository, SqlxMaterialRepository,
    SqlxSubjectRepository,
};
use studysprint::db::{create_test_pool, migrations};
use studysprint::services::college::CollegeService;
use studysprint::services::course::CourseService;
use studysprint::services::material::MaterialService;
use studysprint::services::subject::SubjectService;

const ADMIN_EMAIL: &str = "admin@example.com";
const ADMIN_PASSWORD: &str = "correct horse battery staple";

async fn test_server() -> TestServer {
    let pool = create_test_pool().await.unwrap();
    migrations::run_migrations(&pool).await.unwrap();

    let auth = AuthConfig {
        admin_email: ADMIN_EMAIL.to_string(),
        admin_password: ADMIN_PASSWORD.to_string(),
        admin_password_hash: None,
        session_secret: Some("e2e-test-secret".to_string()),
    };

    let state = AppState {
        college_service: Arc::new(CollegeService::new(SqlxCollegeRepository::boxed(
            pool.clone(),
        ))),
        course_service: Arc::new(CourseService::new(SqlxCourseRepository::boxed(pool.clone()))),
        subject_service: Arc::new(SubjectService::new(SqlxSubjectRepository::boxed(
            pool.clone(),
        ))),
        material_service: Arc::new(MaterialService::new(SqlxMaterialRepository::boxed(
            pool.clone(),
        ))),
        admin_user_repo: SqlxAdminUserRepository::boxed(pool.clone()),
        auth_config: Arc::new(auth),
        upload_config: Arc::new(UploadConfig::default()),
        secure_cookies: false,
    };

    let app = build_router(state, "http://localhost:3000");

    let config = TestServerConfig {
        save_cookies: true,
        ..TestServerConfig::default()
    };
    TestServer::new_with_config(app, config).unwrap()
}

async fn login(server: &TestServer, remember: bool) {
    let response = server
        .post("/api/auth/login")
        .json(&json!({
            "email": ADMIN_EMAIL,
            "password": ADMIN_PASSWORD,
            "remember": remember,
        }))
        .await;
    assert_eq!(response.status_code(), 200);
}

#[tokio::test]
async fn test_admin_page_redirects_anonymous_visitors() {
    let server = test_server().await;

    let response = server.get("/admin/colleges").await;
    assert_eq!(response.status_code(), 303);
    assert_eq!(
        response.header("location").to_str().unwrap(),
        "/admin/login?next=%2Fadmin%2Fcolleges"
    );
}

#[tokio::test]
async fn test_login_page_is_never_gated() {
    let server = test_server().await;

    let response = server.get("/admin/login").await;
    assert_ne!(response.status_code(), 303);
}

#[tokio::test]
async fn test_non_admin_pages_pass_through() {
    let server = test_server().await;

    let response = server.get("/about").await;
    assert_ne!(response.status_code(), 303);
}

#[tokio::test]
async fn test_admin_page_passes_with_session() {
    let server = test_server().await;
    login(&server, false).await;

    let response = server.get("/admin/colleges").await;
    assert_ne!(response.status_code(), 303);
}

#[tokio::test]
async fn test_login_rejects_bad_credentials() {
    let server = test_server().await;

    let response = server
        .post("/api/auth/login")
        .json(&json!({
            "email": ADMIN_EMAIL,
            "password": "wrong-password",
            "remember": false,
        }))
        .await;
    assert_eq!(response.status_code(), 401);

    let response = server
        .post("/api/auth/login")
        .json(&json!({
            "email": "someone@else.test",
            "password": ADMIN_PASSWORD,
        }))
        .await;
    assert_eq!(response.status_code(), 401);
}

#[tokio::test]
async fn test_login_rejects_missing_fields() {
    let server = test_server().await;

    let response = server
        .post("/api/auth/login")
        .json(&json!({ "email": ADMIN_EMAIL }))
        .await;
    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_login_rejects_malformed_credentials() {
    let server = test_server().await;

    // Not email-shaped
    let response = server
        .post("/api/auth/login")
        .json(&json!({
            "email": "not-an-email",
            "password": ADMIN_PASSWORD,
        }))
        .await;
    assert_eq!(response.status_code(), 400);

    // Too short to ever be a valid password
    let response = server
        .post("/api/auth/login")
        .json(&json!({
            "email": ADMIN_EMAIL,
            "password": "short",
        }))
        .await;
    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_login_email_is_case_insensitive() {
    let server = test_server().await;

    let response = server
        .post("/api/auth/login")
        .json(&json!({
            "email": "ADMIN@Example.COM",
            "password": ADMIN_PASSWORD,
        }))
        .await;
    assert_eq!(response.status_code(), 200);
}

#[tokio::test]
async fn test_session_cookie_lifetimes() {
    let server = test_server().await;

    let response = server
        .post("/api/auth/login")
        .json(&json!({
            "email": ADMIN_EMAIL,
            "password": ADMIN_PASSWORD,
            "remember": false,
        }))
        .await;
    let cookie = response.header("set-cookie").to_str().unwrap().to_string();
    assert!(cookie.starts_with("studysprint_admin="));
    assert!(cookie.contains("Max-Age=28800"));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));

    let response = server
        .post("/api/auth/login")
        .json(&json!({
            "email": ADMIN_EMAIL,
            "password": ADMIN_PASSWORD,
            "remember": true,
        }))
        .await;
    let cookie = response.header("set-cookie").to_str().unwrap().to_string();
    assert!(cookie.contains("Max-Age=604800"));

    // Omitting `remember` means a remembered session
    let response = server
        .post("/api/auth/login")
        .json(&json!({
            "email": ADMIN_EMAIL,
            "password": ADMIN_PASSWORD,
        }))
        .await;
    let cookie = response.header("set-cookie").to_str().unwrap().to_string();
    assert!(cookie.contains("Max-Age=604800"));
}

#[tokio::test]
async fn test_mutations_require_session() {
    let server = test_server().await;

    let response = server
        .post("/api/colleges")
        .json(&json!({ "name": "GGSIPU" }))
        .await;
    assert_eq!(response.status_code(), 401);

    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_listing_is_public() {
    let server = test_server().await;

    let response = server.get("/api/colleges").await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["items"], json!([]));
    assert_eq!(body["total"], 0);
    assert_eq!(body["page"], 1);
    assert_eq!(body["pageSize"], 10);
}

#[tokio::test]
async fn test_page_size_is_clamped() {
    let server = test_server().await;

    let response = server.get("/api/colleges?page=0&pageSize=500").await;
    let body: Value = response.json();
    assert_eq!(body["page"], 1);
    assert_eq!(body["pageSize"], 50);
}

#[tokio::test]
async fn test_college_crud_roundtrip() {
    let server = test_server().await;
    login(&server, false).await;

    let response = server
        .post("/api/colleges")
        .json(&json!({ "name": "GGSIPU", "location": "Delhi" }))
        .await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["item"]["slug"], "ggsipu");
    let id = body["item"]["id"].as_i64().unwrap();

    let response = server
        .patch(&format!("/api/colleges/{}", id))
        .json(&json!({ "location": "New Delhi" }))
        .await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["item"]["location"], "New Delhi");
    assert_eq!(body["item"]["slug"], "ggsipu");

    let response = server.get("/api/colleges?q=delhi").await;
    let body: Value = response.json();
    assert_eq!(body["total"], 1);

    // Whitespace-only q is no filter at all
    let response = server.get("/api/colleges?q=%20%20").await;
    let body: Value = response.json();
    assert_eq!(body["total"], 1);

    let response = server.delete(&format!("/api/colleges/{}", id)).await;
    assert_eq!(response.status_code(), 200);

    let response = server.get(&format!("/api/colleges/{}", id)).await;
    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn test_duplicate_slug_is_a_conflict() {
    let server = test_server().await;
    login(&server, false).await;

    let response = server
        .post("/api/colleges")
        .json(&json!({ "name": "Delhi University" }))
        .await;
    assert_eq!(response.status_code(), 200);

    let response = server
        .post("/api/colleges")
        .json(&json!({ "name": "Delhi-University" }))
        .await;
    assert_eq!(response.status_code(), 409);

    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "CONFLICT");
}

#[tokio::test]
async fn test_course_requires_known_college() {
    let server = test_server().await;
    login(&server, false).await;

    let response = server
        .post("/api/courses")
        .json(&json!({ "collegeId": 9999, "name": "B.Tech CSE" }))
        .await;
    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_material_type_filter_rejects_unknown_values() {
    let server = test_server().await;

    let response = server.get("/api/materials?type=PODCAST").await;
    assert_eq!(response.status_code(), 400);

    let response = server.get("/api/materials?type=NOTES").await;
    assert_eq!(response.status_code(), 200);
}

#[tokio::test]
async fn test_logout_clears_the_session() {
    let server = test_server().await;
    login(&server, false).await;

    let response = server
        .post("/api/colleges")
        .json(&json!({ "name": "Before Logout U" }))
        .await;
    assert_eq!(response.status_code(), 200);

    let response = server.post("/api/auth/logout").await;
    assert_eq!(response.status_code(), 200);
    let cookie = response.header("set-cookie").to_str().unwrap().to_string();
    assert!(cookie.contains("Max-Age=0"));

    let response = server
        .post("/api/colleges")
        .json(&json!({ "name": "After Logout U" }))
        .await;
    assert_eq!(response.status_code(), 401);

    let response = server.get("/admin/colleges").await;
    assert_eq!(response.status_code(), 303);
}
