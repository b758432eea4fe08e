//! Subject model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Subject entity, e.g. "Data Structures" within a course.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    /// Unique identifier
    pub id: i64,
    /// Owning course
    pub course_id: i64,
    /// Display name
    pub name: String,
    /// URL-friendly slug, unique within the course
    pub slug: String,
    /// Optional subject code, e.g. "CS-201"
    pub code: Option<String>,
    /// Optional semester (1-12)
    pub semester: Option<i64>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Subject {
    /// Create a new Subject with ID 0; the database assigns the real ID.
    pub fn new(course_id: i64, name: String, slug: String) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            course_id,
            name,
            slug,
            code: None,
            semester: None,
            created_at: now,
            updated_at: now,
        }
    }
}
