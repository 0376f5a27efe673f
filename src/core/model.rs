//! Domain records for the three managed entities.
//!
//! Ids are store-assigned `i64`s. The `New*` structs carry validated input
//! on its way into the store; they never hold an id.

use serde::{Deserialize, Serialize};

/// A registered student.
///
/// `roll_number` is a unique human-facing identifier, distinct from the
/// generated `student_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub student_id: i64,
    pub roll_number: String,
    pub first_name: String,
    pub last_name: Option<String>,
}

/// Validated input for creating or fully replacing a student.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStudent {
    pub roll_number: String,
    pub first_name: String,
    pub last_name: Option<String>,
}

/// A course on offer.
///
/// `course_code` is a unique human-facing identifier, distinct from the
/// generated `course_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub course_id: i64,
    pub course_code: String,
    pub course_name: String,
    pub course_description: Option<String>,
}

/// Validated input for creating or fully replacing a course.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCourse {
    pub course_code: String,
    pub course_name: String,
    pub course_description: Option<String>,
}

/// A link record expressing that a student is registered for a course.
///
/// The (student_id, course_id) pair is unique; both sides must exist when
/// the enrollment is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrollment {
    pub enrollment_id: i64,
    pub student_id: i64,
    pub course_id: i64,
}
