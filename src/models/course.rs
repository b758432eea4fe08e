//! Course model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Course entity, e.g. "B.Tech CSE" within a college.
///
/// The slug is unique within its college, not globally.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    /// Unique identifier
    pub id: i64,
    /// Owning college
    pub college_id: i64,
    /// Display name
    pub name: String,
    /// URL-friendly slug, unique within the college
    pub slug: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Course {
    /// Create a new Course with ID 0; the database assigns the real ID.
    pub fn new(college_id: i64, name: String, slug: String) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            college_id,
            name,
            slug,
            created_at: now,
            updated_at: now,
        }
    }
}
