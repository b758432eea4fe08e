//! Material model
//!
//! A material is a study artifact attached to a subject: lecture notes,
//! a syllabus, a guide, and so on. Previous-year papers and videos are
//! covered by the type enum rather than separate entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of study material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum MaterialType {
    Notes,
    Syllabus,
    Guide,
    Assignment,
    Ppt,
    #[default]
    Other,
}

impl fmt::Display for MaterialType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MaterialType::Notes => "NOTES",
            MaterialType::Syllabus => "SYLLABUS",
            MaterialType::Guide => "GUIDE",
            MaterialType::Assignment => "ASSIGNMENT",
            MaterialType::Ppt => "PPT",
            MaterialType::Other => "OTHER",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for MaterialType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "NOTES" => Ok(MaterialType::Notes),
            "SYLLABUS" => Ok(MaterialType::Syllabus),
            "GUIDE" => Ok(MaterialType::Guide),
            "ASSIGNMENT" => Ok(MaterialType::Assignment),
            "PPT" => Ok(MaterialType::Ppt),
            "OTHER" => Ok(MaterialType::Other),
            other => Err(format!("Unknown material type: {}", other)),
        }
    }
}

/// Material entity representing a study artifact.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    /// Unique identifier
    pub id: i64,
    /// Owning subject
    pub subject_id: i64,
    /// Kind of material
    #[serde(rename = "type")]
    pub material_type: MaterialType,
    /// Display title
    pub title: String,
    /// Optional description
    pub description: Option<String>,
    /// Optional URL of an uploaded file
    pub file_url: Option<String>,
    /// Optional external link
    pub external_url: Option<String>,
    /// Free-form tags
    pub tags: Vec<String>,
    /// Optional year the material applies to
    pub year: Option<i64>,
    /// Optional author credit
    pub author: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Material {
    /// Create a new Material with ID 0; the database assigns the real ID.
    pub fn new(subject_id: i64, material_type: MaterialType, title: String) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            subject_id,
            material_type,
            title,
            description: None,
            file_url: None,
            external_url: None,
            tags: Vec::new(),
            year: None,
            author: None,
            created_at: now,
            updated_at: now,
        }
    }
}
