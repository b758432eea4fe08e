//! Repository layer
//!
//! Each catalog entity gets a trait defining its data access interface and
//! a SQLx-backed implementation. Services depend on the traits, which keeps
//! them testable and the SQL in one place.

pub mod admin_user;
pub mod college;
pub mod course;
pub mod material;
pub mod subject;

pub use admin_user::{AdminUserRepository, SqlxAdminUserRepository};
pub use college::{CollegeFilter, CollegeRepository, SqlxCollegeRepository};
pub use course::{CourseFilter, CourseRepository, SqlxCourseRepository};
pub use material::{MaterialFilter, MaterialRepository, SqlxMaterialRepository};
pub use subject::{SqlxSubjectRepository, SubjectFilter, SubjectRepository};
