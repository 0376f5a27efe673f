//! HTTP handlers for the three resources.
//!
//! Handlers are stateless: everything they need arrives through
//! [`AppState`](crate::server::AppState) and the request itself, and every
//! failure path is an [`ApiError`](crate::core::error::ApiError) translated
//! at the response boundary.

pub mod course;
pub mod enrollment;
pub mod student;
