//! Database migrations
//!
//! Code-based migrations embedded in the binary for single-binary
//! deployment. Each migration is a versioned SQL string; applied versions
//! are tracked in the `_migrations` table.
//!
//! Slug uniqueness within a parent scope (course slug within a college,
//! subject slug within a course) is enforced here with UNIQUE constraints
//! so that two concurrent creates with the same derived slug cannot both
//! succeed.

use anyhow::{Context, Result};
use sqlx::SqlitePool;

/// A database migration
#[derive(Debug, Clone)]
pub struct Migration {
    /// Migration version number (unique and sequential)
    pub version: i32,
    /// Human-readable migration name
    pub name: &'static str,
    /// SQL statements, separated by semicolons
    pub up: &'static str,
}

/// All migrations for the StudySprint catalog.
pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "create_colleges",
        up: r#"
            CREATE TABLE IF NOT EXISTS colleges (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                slug TEXT NOT NULL UNIQUE,
                location TEXT,
                logo_url TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_colleges_updated_at ON colleges(updated_at)
        "#,
    },
    Migration {
        version: 2,
        name: "create_courses",
        up: r#"
            CREATE TABLE IF NOT EXISTS courses (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                college_id INTEGER NOT NULL REFERENCES colleges(id) ON DELETE CASCADE,
                name TEXT NOT NULL,
                slug TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                UNIQUE(college_id, slug)
            );
            CREATE INDEX IF NOT EXISTS idx_courses_college_id ON courses(college_id)
        "#,
    },
    Migration {
        version: 3,
        name: "create_subjects",
        up: r#"
            CREATE TABLE IF NOT EXISTS subjects (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                course_id INTEGER NOT NULL REFERENCES courses(id) ON DELETE CASCADE,
                name TEXT NOT NULL,
                slug TEXT NOT NULL,
                code TEXT,
                semester INTEGER,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                UNIQUE(course_id, slug)
            );
            CREATE INDEX IF NOT EXISTS idx_subjects_course_id ON subjects(course_id)
        "#,
    },
    Migration {
        version: 4,
        name: "create_materials",
        up: r#"
            CREATE TABLE IF NOT EXISTS materials (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                subject_id INTEGER NOT NULL REFERENCES subjects(id) ON DELETE CASCADE,
                material_type TEXT NOT NULL,
                title TEXT NOT NULL,
                description TEXT,
                file_url TEXT,
                external_url TEXT,
                tags TEXT NOT NULL DEFAULT '[]',
                year INTEGER,
                author TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_materials_subject_id ON materials(subject_id);
            CREATE INDEX IF NOT EXISTS idx_materials_type ON materials(material_type)
        "#,
    },
    Migration {
        version: 5,
        name: "create_admin_users",
        up: r#"
            CREATE TABLE IF NOT EXISTS admin_users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                email TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                role TEXT NOT NULL DEFAULT 'admin',
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
        "#,
    },
];

/// Run all pending migrations. Returns how many were applied.
pub async fn run_migrations(pool: &SqlitePool) -> Result<usize> {
    create_migrations_table(pool).await?;

    let applied: Vec<i32> = sqlx::query_scalar("SELECT version FROM _migrations ORDER BY version")
        .fetch_all(pool)
        .await
        .context("Failed to read applied migrations")?;

    let mut count = 0;

    for migration in MIGRATIONS {
        if !applied.contains(&migration.version) {
            tracing::info!(
                "Applying migration {}: {}",
                migration.version,
                migration.name
            );
            apply_migration(pool, migration)
                .await
                .with_context(|| format!("Failed to apply migration: {}", migration.name))?;
            count += 1;
        }
    }

    if count > 0 {
        tracing::info!("Applied {} migration(s)", count);
    } else {
        tracing::debug!("No pending migrations");
    }

    Ok(count)
}

async fn create_migrations_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS _migrations (
            version INTEGER PRIMARY KEY,
            name VARCHAR(255) NOT NULL UNIQUE,
            applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

async fn apply_migration(pool: &SqlitePool, migration: &Migration) -> Result<()> {
    // Migration SQL may contain multiple statements
    for statement in migration.up.split(';') {
        let statement = statement.trim();
        if !statement.is_empty() {
            sqlx::query(statement)
                .execute(pool)
                .await
                .context("Failed to execute migration statement")?;
        }
    }

    sqlx::query("INSERT INTO _migrations (version, name) VALUES (?, ?)")
        .bind(migration.version)
        .bind(migration.name)
        .execute(pool)
        .await?;

    Ok(())
}
