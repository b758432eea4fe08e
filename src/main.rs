//! StudySprint - content catalog backend for student study material

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use studysprint::{
    api::{self, AppState},
    config::Config,
    db::{
        self,
        repositories::{
            SqlxAdminUserRepository, SqlxCollegeRepository, SqlxCourseRepository,
            SqlxMaterialRepository, SqlxSubjectRepository,
        },
    },
    services::{
        college::CollegeService, course::CourseService, material::MaterialService,
        subject::SubjectService,
    },
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "studysprint=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting StudySprint catalog...");

    // Load configuration
    let config = Config::load_with_env(Path::new("config.yml"))?;
    tracing::info!("Configuration loaded");

    if config.auth.uses_dev_secret() {
        tracing::warn!(
            "auth.session_secret is not set; sessions are signed with the \
             insecure development secret"
        );
    }

    // Initialize database
    let pool = db::create_pool(&config.database).await?;
    tracing::info!("Database connected: {}", config.database.url);

    // Run migrations
    db::migrations::run_migrations(&pool).await?;
    tracing::info!("Database migrations completed");

    // Create services
    let college_service = Arc::new(CollegeService::new(SqlxCollegeRepository::boxed(
        pool.clone(),
    )));
    let course_service = Arc::new(CourseService::new(SqlxCourseRepository::boxed(pool.clone())));
    let subject_service = Arc::new(SubjectService::new(SqlxSubjectRepository::boxed(
        pool.clone(),
    )));
    let material_service = Arc::new(MaterialService::new(SqlxMaterialRepository::boxed(
        pool.clone(),
    )));
    let admin_user_repo = SqlxAdminUserRepository::boxed(pool.clone());

    // Build application state
    let state = AppState {
        college_service,
        course_service,
        subject_service,
        material_service,
        admin_user_repo,
        auth_config: Arc::new(config.auth.clone()),
        upload_config: Arc::new(config.upload.clone()),
        secure_cookies: config.server.secure_cookies,
    };

    // Build router
    let app = api::build_router(state, &config.server.cors_origin);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
