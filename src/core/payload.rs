//! Typed request payloads and required-field validation.
//!
//! Every field is optional at the deserialization layer so that a missing
//! field reaches validation instead of failing inside serde; validation then
//! rejects with the stable, field-specific wire code the API documents.

use serde::Deserialize;

use crate::core::error::ApiError;
use crate::core::model::{NewCourse, NewStudent};

/// Stable validation codes, paired with their client-facing messages.
pub mod codes {
    pub const COURSE_NAME_REQUIRED: (&str, &str) = ("COURSE001", "Course Name is required");
    pub const COURSE_CODE_REQUIRED: (&str, &str) = ("COURSE002", "Course Code is required");
    pub const STUDENT_ROLL_REQUIRED: (&str, &str) = ("STUDENT001", "Roll Number required");
    pub const STUDENT_FIRST_NAME_REQUIRED: (&str, &str) = ("STUDENT002", "First Name is required");
    pub const ENROLLMENT_COURSE_MISSING: (&str, &str) = ("ENROLLMENT001", "Course does not exist");
    pub const ENROLLMENT_STUDENT_MISSING: (&str, &str) = ("ENROLLMENT002", "Student does not exist");
}

/// Require a field to be present and non-blank, else fail with its code.
fn require(
    value: Option<String>,
    code: (&'static str, &'static str),
) -> Result<String, ApiError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ApiError::validation(code)),
    }
}

/// Body of `POST /api/course` and `PUT /api/course/{cid}`.
#[derive(Debug, Default, Deserialize)]
pub struct CoursePayload {
    pub course_name: Option<String>,
    pub course_code: Option<String>,
    pub course_description: Option<String>,
}

impl CoursePayload {
    /// Field checks run in documented order: name first, then code.
    pub fn validate(self) -> Result<NewCourse, ApiError> {
        let course_name = require(self.course_name, codes::COURSE_NAME_REQUIRED)?;
        let course_code = require(self.course_code, codes::COURSE_CODE_REQUIRED)?;
        Ok(NewCourse {
            course_code,
            course_name,
            course_description: self.course_description,
        })
    }
}

/// Body of `POST /api/student` and `PUT /api/student/{sid}`.
#[derive(Debug, Default, Deserialize)]
pub struct StudentPayload {
    pub roll_number: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl StudentPayload {
    /// Field checks run in documented order: roll number first, then name.
    pub fn validate(self) -> Result<NewStudent, ApiError> {
        let roll_number = require(self.roll_number, codes::STUDENT_ROLL_REQUIRED)?;
        let first_name = require(self.first_name, codes::STUDENT_FIRST_NAME_REQUIRED)?;
        Ok(NewStudent {
            roll_number,
            first_name,
            last_name: self.last_name,
        })
    }
}

/// Body of `POST /api/student/{sid}/course`.
#[derive(Debug, Default, Deserialize)]
pub struct EnrollmentPayload {
    pub course_id: Option<i64>,
}

impl EnrollmentPayload {
    /// A missing `course_id` is indistinguishable from a non-existent course
    /// as far as the client contract goes: both reject with ENROLLMENT001.
    pub fn validate(self) -> Result<i64, ApiError> {
        self.course_id
            .ok_or_else(|| ApiError::validation(codes::ENROLLMENT_COURSE_MISSING))
    }
}
