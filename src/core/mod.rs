//! Core domain types: records, payload validation, errors, and the storage
//! trait.

pub mod error;
pub mod extract;
pub mod model;
pub mod payload;
pub mod store;

pub use error::{ApiError, ErrorBody, StoreError};
pub use extract::Payload;
pub use model::{Course, Enrollment, NewCourse, NewStudent, Student};
pub use store::CampusStore;
