//! Data models for the StudySprint catalog
//!
//! The catalog is a simple "has many" chain:
//! College -> Course -> Subject -> Material.

pub mod admin_user;
pub mod college;
pub mod course;
pub mod material;
pub mod subject;

pub use admin_user::AdminUser;
pub use college::College;
pub use course::Course;
pub use material::{Material, MaterialType};
pub use subject::Subject;
