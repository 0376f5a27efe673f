//! # campus-rs
//!
//! A REST/JSON backend managing three related entities — students, courses,
//! and enrollments — over a pluggable relational store.
//!
//! ## Resources
//!
//! - **Student**: unique `roll_number`, required `first_name`
//! - **Course**: unique `course_code`, required `course_name`
//! - **Enrollment**: links one student to one course; the pair is unique,
//!   and both sides must exist when the link is created
//!
//! Course deletion cascades to the course's enrollments in a single
//! transaction; student deletion removes only the student row.
//!
//! ## Storage backends
//!
//! The in-memory store is the default. `sqlite` and `postgres` features add
//! sqlx-backed stores; the backend is chosen at runtime from the configured
//! database url.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use campus::server::{AppState, api_router};
//! use campus::storage::InMemoryStore;
//!
//! let app = api_router(AppState::new(Arc::new(InMemoryStore::new())));
//! // hand `app` to axum::serve
//! ```

pub mod config;
pub mod core;
pub mod resources;
pub mod server;
pub mod storage;

pub use crate::config::AppConfig;
pub use crate::core::error::{ApiError, ErrorBody, StoreError};
pub use crate::core::model::{Course, Enrollment, NewCourse, NewStudent, Student};
pub use crate::core::store::CampusStore;
