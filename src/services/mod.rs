//! Services layer - Business logic
//!
//! Services implement the catalog's business rules on top of the
//! repositories: validation, slug derivation, the session codec and the
//! CSV bulk-import pipeline.

pub mod college;
pub mod course;
pub mod csv;
pub mod import;
pub mod material;
pub mod password;
pub mod session;
pub mod slug;
pub mod subject;

pub use college::{CollegeService, CollegeServiceError, CreateCollegeInput, UpdateCollegeInput};
pub use course::{CourseService, CourseServiceError, CreateCourseInput, UpdateCourseInput};
pub use csv::{parse_csv, render_csv, CsvBatch, CsvTemplate};
pub use import::{
    apply_mapping, mapping_complete, ImportSummary, COLLEGE_IMPORT_FIELDS, COURSE_IMPORT_FIELDS,
    MATERIAL_IMPORT_FIELDS, SUBJECT_IMPORT_FIELDS,
};
pub use material::{CreateMaterialInput, MaterialService, MaterialServiceError, UpdateMaterialInput};
pub use password::{hash_password, verify_admin_password, verify_password};
pub use session::{
    create_session, verify_session, AdminSession, REMEMBERED_SESSION_SECS, SESSION_COOKIE,
    SHORT_SESSION_SECS,
};
pub use slug::generate_slug;
pub use subject::{CreateSubjectInput, SubjectService, SubjectServiceError, UpdateSubjectInput};

/// Whether an error chain bottoms out in a storage-level uniqueness
/// violation (duplicate slug within a parent scope).
pub(crate) fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.chain()
        .any(|cause| cause.to_string().contains("UNIQUE constraint failed"))
}

/// Whether an error chain bottoms out in a foreign-key violation
/// (referenced parent entity does not exist).
pub(crate) fn is_fk_violation(err: &anyhow::Error) -> bool {
    err.chain()
        .any(|cause| cause.to_string().contains("FOREIGN KEY constraint failed"))
}
