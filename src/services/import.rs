//! CSV bulk import
//!
//! Column mapping plus per-entity row importers. Import semantics are
//! best-effort partial success: every row is processed independently, a
//! skipped or failed row never aborts the batch, and no transaction spans
//! the whole import.
//!
//! Parent references in the CSV are human-readable (college name, course
//! or subject slug) and are resolved case-insensitively against an
//! in-memory list of already-loaded parents. When two parents share a
//! case-insensitive name, the first match wins.

use std::collections::HashMap;

use crate::models::{College, Course, MaterialType, Subject};
use crate::services::college::CollegeService;
use crate::services::course::{CourseService, CreateCourseInput};
use crate::services::csv::CsvBatch;
use crate::services::material::{CreateMaterialInput, MaterialService};
use crate::services::subject::{CreateSubjectInput, SubjectService};
use crate::services::CreateCollegeInput;

/// Expected logical fields for a college import.
pub const COLLEGE_IMPORT_FIELDS: &[&str] = &["name", "slug", "location"];

/// Expected logical fields for a course import.
pub const COURSE_IMPORT_FIELDS: &[&str] = &["name", "slug", "collegeName"];

/// Expected logical fields for a subject import.
pub const SUBJECT_IMPORT_FIELDS: &[&str] = &["name", "slug", "code", "semester", "courseSlug"];

/// Expected logical fields for a material import.
pub const MATERIAL_IMPORT_FIELDS: &[&str] = &[
    "title",
    "type",
    "subjectSlug",
    "year",
    "author",
    "tags",
    "externalUrl",
    "fileUrl",
    "description",
];

/// Mapping from expected logical field to the chosen CSV header.
pub type Mapping = HashMap<String, String>;

/// Aggregate result of a bulk import.
///
/// Deliberately coarse: only the number of rows handed to the create
/// operation is reported, with no per-row accept/reject manifest. A row
/// that the persistence layer later rejects still counts as submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImportSummary {
    /// Rows in the batch
    pub rows_total: usize,
    /// Rows that passed validation and were handed to create
    pub rows_submitted: usize,
}

/// Whether every expected field has been mapped to some header.
/// Import must not start on a partial mapping.
pub fn mapping_complete(expected: &[&str], mapping: &Mapping) -> bool {
    expected
        .iter()
        .all(|field| mapping.get(*field).is_some_and(|h| !h.is_empty()))
}

/// Re-key each CSV row from header names to expected field names using
/// the mapping. Fields whose mapped header is missing from a row become
/// empty strings.
pub fn apply_mapping(
    expected: &[&str],
    batch: &CsvBatch,
    mapping: &Mapping,
) -> Vec<HashMap<String, String>> {
    batch
        .rows
        .iter()
        .map(|row| {
            expected
                .iter()
                .map(|field| {
                    let value = mapping
                        .get(*field)
                        .and_then(|header| row.get(header))
                        .cloned()
                        .unwrap_or_default();
                    (field.to_string(), value)
                })
                .collect()
        })
        .collect()
}

fn field<'a>(row: &'a HashMap<String, String>, name: &str) -> &'a str {
    row.get(name).map(String::as_str).unwrap_or("").trim()
}

fn optional(row: &HashMap<String, String>, name: &str) -> Option<String> {
    let value = field(row, name);
    (!value.is_empty()).then(|| value.to_string())
}

/// Split a raw tag cell on comma or pipe, dropping empty tokens.
pub fn split_tags(raw: &str) -> Vec<String> {
    raw.split(['|', ','])
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

/// Parse a numeric cell; anything that is not a finite integer degrades
/// to absent rather than failing the row.
pub fn parse_optional_int(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    raw.parse().ok()
}

fn find_college<'a>(colleges: &'a [College], name: &str) -> Option<&'a College> {
    colleges.iter().find(|c| c.name.eq_ignore_ascii_case(name))
}

fn find_course<'a>(courses: &'a [Course], slug: &str) -> Option<&'a Course> {
    courses.iter().find(|c| c.slug.eq_ignore_ascii_case(slug))
}

fn find_subject<'a>(subjects: &'a [Subject], slug: &str) -> Option<&'a Subject> {
    subjects.iter().find(|s| s.slug.eq_ignore_ascii_case(slug))
}

/// Import college rows. Rows with an empty name are skipped.
pub async fn import_colleges(
    rows: &[HashMap<String, String>],
    service: &CollegeService,
) -> ImportSummary {
    let mut summary = ImportSummary {
        rows_total: rows.len(),
        ..Default::default()
    };

    for row in rows {
        let name = field(row, "name");
        if name.is_empty() {
            continue;
        }

        let input = CreateCollegeInput {
            name: name.to_string(),
            slug: optional(row, "slug"),
            location: optional(row, "location"),
            logo_url: None,
        };
        summary.rows_submitted += 1;
        if let Err(e) = service.create(input).await {
            tracing::warn!("Skipping college row '{}': {}", name, e);
        }
    }

    summary
}

/// Import course rows. Rows missing a name or whose college reference
/// does not resolve are skipped.
pub async fn import_courses(
    rows: &[HashMap<String, String>],
    colleges: &[College],
    service: &CourseService,
) -> ImportSummary {
    let mut summary = ImportSummary {
        rows_total: rows.len(),
        ..Default::default()
    };

    for row in rows {
        let name = field(row, "name");
        let college_name = field(row, "collegeName");
        if name.is_empty() || college_name.is_empty() {
            continue;
        }
        let Some(college) = find_college(colleges, college_name) else {
            continue;
        };

        let input = CreateCourseInput {
            college_id: college.id,
            name: name.to_string(),
            slug: optional(row, "slug"),
        };
        summary.rows_submitted += 1;
        if let Err(e) = service.create(input).await {
            tracing::warn!("Skipping course row '{}': {}", name, e);
        }
    }

    summary
}

/// Import subject rows. Rows missing a name or whose course slug does
/// not resolve are skipped; an unparsable semester degrades to absent.
pub async fn import_subjects(
    rows: &[HashMap<String, String>],
    courses: &[Course],
    service: &SubjectService,
) -> ImportSummary {
    let mut summary = ImportSummary {
        rows_total: rows.len(),
        ..Default::default()
    };

    for row in rows {
        let name = field(row, "name");
        let course_slug = field(row, "courseSlug");
        if name.is_empty() || course_slug.is_empty() {
            continue;
        }
        let Some(course) = find_course(courses, course_slug) else {
            continue;
        };

        let input = CreateSubjectInput {
            course_id: course.id,
            name: name.to_string(),
            slug: optional(row, "slug"),
            code: optional(row, "code"),
            semester: parse_optional_int(field(row, "semester")),
        };
        summary.rows_submitted += 1;
        if let Err(e) = service.create(input).await {
            tracing::warn!("Skipping subject row '{}': {}", name, e);
        }
    }

    summary
}

/// Import material rows. Rows missing title/type/subject or whose
/// subject slug does not resolve are skipped; an unrecognized type falls
/// back to OTHER and an unparsable year degrades to absent.
pub async fn import_materials(
    rows: &[HashMap<String, String>],
    subjects: &[Subject],
    service: &MaterialService,
) -> ImportSummary {
    let mut summary = ImportSummary {
        rows_total: rows.len(),
        ..Default::default()
    };

    for row in rows {
        let title = field(row, "title");
        let type_raw = field(row, "type");
        let subject_slug = field(row, "subjectSlug");
        if title.is_empty() || type_raw.is_empty() || subject_slug.is_empty() {
            continue;
        }
        let Some(subject) = find_subject(subjects, subject_slug) else {
            continue;
        };

        let input = CreateMaterialInput {
            subject_id: subject.id,
            material_type: type_raw.parse().unwrap_or(MaterialType::Other),
            title: title.to_string(),
            description: optional(row, "description"),
            file_url: optional(row, "fileUrl"),
            external_url: optional(row, "externalUrl"),
            tags: split_tags(field(row, "tags")),
            year: parse_optional_int(field(row, "year")),
            author: optional(row, "author"),
        };
        summary.rows_submitted += 1;
        if let Err(e) = service.create(input).await {
            tracing::warn!("Skipping material row '{}': {}", title, e);
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{
        CollegeRepository, CourseRepository, SqlxCollegeRepository, SqlxCourseRepository,
        SqlxMaterialRepository, SqlxSubjectRepository, SubjectRepository,
    };
    use crate::db::{create_test_pool, migrations};
    use crate::services::csv::parse_csv;
    use sqlx::SqlitePool;

    fn row(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_mapping_complete() {
        let mut mapping = Mapping::new();
        mapping.insert("name".into(), "Course".into());
        assert!(!mapping_complete(COURSE_IMPORT_FIELDS, &mapping));

        mapping.insert("slug".into(), "Slug".into());
        mapping.insert("collegeName".into(), "College".into());
        assert!(mapping_complete(COURSE_IMPORT_FIELDS, &mapping));

        mapping.insert("slug".into(), "".into());
        assert!(!mapping_complete(COURSE_IMPORT_FIELDS, &mapping));
    }

    #[test]
    fn test_apply_mapping_rekeys_rows() {
        let batch = parse_csv("Course Title,Uni\nB.Tech CSE,GGSIPU\n");
        let mut mapping = Mapping::new();
        mapping.insert("name".into(), "Course Title".into());
        mapping.insert("collegeName".into(), "Uni".into());
        mapping.insert("slug".into(), "Missing Header".into());

        let rows = apply_mapping(COURSE_IMPORT_FIELDS, &batch, &mapping);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["name"], "B.Tech CSE");
        assert_eq!(rows[0]["collegeName"], "GGSIPU");
        assert_eq!(rows[0]["slug"], "");
    }

    #[test]
    fn test_split_tags() {
        assert_eq!(
            split_tags("trees, graphs |sorting||"),
            vec!["trees", "graphs", "sorting"]
        );
        assert!(split_tags("").is_empty());
    }

    #[test]
    fn test_parse_optional_int() {
        assert_eq!(parse_optional_int("2024"), Some(2024));
        assert_eq!(parse_optional_int(" 7 "), Some(7));
        assert_eq!(parse_optional_int("soon"), None);
        assert_eq!(parse_optional_int("3.5"), None);
        assert_eq!(parse_optional_int(""), None);
    }

    async fn setup_pool() -> SqlitePool {
        let pool = create_test_pool().await.unwrap();
        migrations::run_migrations(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn test_import_courses_skips_bad_rows() {
        let pool = setup_pool().await;
        let college = SqlxCollegeRepository::new(pool.clone())
            .create(&crate::models::College::new("GGSIPU".into(), "ggsipu".into()))
            .await
            .unwrap();
        let service = CourseService::new(SqlxCourseRepository::boxed(pool.clone()));

        let rows = vec![
            row(&[("name", "B.Tech CSE"), ("slug", ""), ("collegeName", "GGSIPU")]),
            // missing name: skipped
            row(&[("name", ""), ("slug", ""), ("collegeName", "GGSIPU")]),
            // unknown college: skipped
            row(&[("name", "MBA"), ("slug", ""), ("collegeName", "Nowhere U")]),
            // case-insensitive college name match
            row(&[("name", "BBA"), ("slug", ""), ("collegeName", "gGsIpU")]),
        ];

        let summary = import_courses(&rows, &[college], &service).await;
        assert_eq!(summary.rows_total, 4);
        assert_eq!(summary.rows_submitted, 2);

        let (items, total) = service.list(None, None, 1, 10).await.unwrap();
        assert_eq!(total, 2);
        assert!(items.iter().any(|c| c.slug == "b-tech-cse"));
    }

    #[tokio::test]
    async fn test_import_continues_past_create_failures() {
        let pool = setup_pool().await;
        let college = SqlxCollegeRepository::new(pool.clone())
            .create(&crate::models::College::new("GGSIPU".into(), "ggsipu".into()))
            .await
            .unwrap();
        let service = CourseService::new(SqlxCourseRepository::boxed(pool.clone()));

        // Both rows derive the same slug; the second create hits the
        // UNIQUE constraint but the batch still finishes.
        let rows = vec![
            row(&[("name", "B.Tech CSE"), ("slug", ""), ("collegeName", "GGSIPU")]),
            row(&[("name", "B Tech CSE"), ("slug", ""), ("collegeName", "GGSIPU")]),
            row(&[("name", "MBA"), ("slug", ""), ("collegeName", "GGSIPU")]),
        ];

        let summary = import_courses(&rows, &[college], &service).await;
        assert_eq!(summary.rows_submitted, 3);

        let (_, total) = service.list(None, None, 1, 10).await.unwrap();
        assert_eq!(total, 2);
    }

    #[tokio::test]
    async fn test_import_materials_transforms_fields() {
        let pool = setup_pool().await;
        let college = SqlxCollegeRepository::new(pool.clone())
            .create(&crate::models::College::new("C".into(), "c".into()))
            .await
            .unwrap();
        let course = SqlxCourseRepository::new(pool.clone())
            .create(&crate::models::Course::new(college.id, "B.Tech".into(), "btech".into()))
            .await
            .unwrap();
        let subject = SqlxSubjectRepository::new(pool.clone())
            .create(&crate::models::Subject::new(course.id, "DS".into(), "ds".into()))
            .await
            .unwrap();
        let service = MaterialService::new(SqlxMaterialRepository::boxed(pool));

        let rows = vec![row(&[
            ("title", "Unit 1 Notes"),
            ("type", "notes"),
            ("subjectSlug", "DS"),
            ("year", "2024"),
            ("author", ""),
            ("tags", "trees|graphs, sorting"),
            ("externalUrl", ""),
            ("fileUrl", ""),
            ("description", "Intro unit"),
        ])];

        let summary = import_materials(&rows, &[subject], &service).await;
        assert_eq!(summary.rows_submitted, 1);

        let (items, _) = service.list(None, None, None, 1, 10).await.unwrap();
        let material = &items[0];
        assert_eq!(material.material_type, MaterialType::Notes);
        assert_eq!(material.tags, vec!["trees", "graphs", "sorting"]);
        assert_eq!(material.year, Some(2024));
        assert!(material.author.is_none());
    }

    #[tokio::test]
    async fn test_import_subjects_degrades_bad_semester() {
        let pool = setup_pool().await;
        let college = SqlxCollegeRepository::new(pool.clone())
            .create(&crate::models::College::new("C".into(), "c".into()))
            .await
            .unwrap();
        let course = SqlxCourseRepository::new(pool.clone())
            .create(&crate::models::Course::new(college.id, "B.Tech".into(), "btech".into()))
            .await
            .unwrap();
        let service = SubjectService::new(SqlxSubjectRepository::boxed(pool));

        let rows = vec![row(&[
            ("name", "Operating Systems"),
            ("slug", ""),
            ("code", "CS-301"),
            ("semester", "fifth"),
            ("courseSlug", "btech"),
        ])];

        let summary = import_subjects(&rows, &[course], &service).await;
        assert_eq!(summary.rows_submitted, 1);

        let (items, _) = service.list(None, None, 1, 10).await.unwrap();
        assert_eq!(items[0].semester, None);
        assert_eq!(items[0].code.as_deref(), Some("CS-301"));
    }

    #[test]
    fn test_first_match_wins_on_duplicate_names() {
        let mut a = crate::models::College::new("Same Name".into(), "first".into());
        a.id = 1;
        let mut b = crate::models::College::new("same name".into(), "second".into());
        b.id = 2;

        let colleges = [a, b];
        let found = find_college(&colleges, "SAME NAME").unwrap();
        assert_eq!(found.id, 1);
    }
}
