//! StudySprint - content catalog backend for student study material
//!
//! This library provides the core functionality for the StudySprint catalog:
//! colleges, courses, subjects and study materials, managed by a single
//! admin identity through a cookie-based session.

pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod services;
