//! College model
//!
//! A college is the root of the catalog hierarchy. Its slug is globally
//! unique; every course belongs to exactly one college.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// College entity representing an institution in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct College {
    /// Unique identifier
    pub id: i64,
    /// Display name
    pub name: String,
    /// URL-friendly slug, unique across colleges
    pub slug: String,
    /// Optional campus location
    pub location: Option<String>,
    /// Optional logo image URL
    pub logo_url: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl College {
    /// Create a new College. The ID will be set to 0 and should be
    /// assigned by the database.
    pub fn new(name: String, slug: String) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            name,
            slug,
            location: None,
            logo_url: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_college_new() {
        let college = College::new("GGSIPU".to_string(), "ggsipu".to_string());

        assert_eq!(college.id, 0);
        assert_eq!(college.name, "GGSIPU");
        assert_eq!(college.slug, "ggsipu");
        assert!(college.location.is_none());
    }
}
