//! Enrollment HTTP handlers.
//!
//! Referential checks run course-first, then student, in every operation,
//! so the error-code precedence is stable when both references are invalid.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde_json::{Value, json};

use crate::core::error::ApiError;
use crate::core::extract::Payload;
use crate::core::model::Enrollment;
use crate::core::payload::{EnrollmentPayload, codes};
use crate::server::AppState;

/// `GET /api/student/{sid}/course` — every enrollment held by a student.
///
/// A student with no enrollments is a valid empty result, not a 404.
pub async fn list_for_student(
    State(state): State<AppState>,
    Path(sid): Path<i64>,
) -> Result<Json<Vec<Enrollment>>, ApiError> {
    if state.store.student(sid).await?.is_none() {
        return Err(ApiError::validation(codes::ENROLLMENT_STUDENT_MISSING));
    }
    Ok(Json(state.store.enrollments_for_student(sid).await?))
}

/// `POST /api/student/{sid}/course` — enroll a student in a course.
pub async fn create(
    State(state): State<AppState>,
    Path(sid): Path<i64>,
    Payload(payload): Payload<EnrollmentPayload>,
) -> Result<(StatusCode, Json<Enrollment>), ApiError> {
    let cid = payload.validate()?;
    if state.store.course(cid).await?.is_none() {
        return Err(ApiError::validation(codes::ENROLLMENT_COURSE_MISSING));
    }
    if state.store.student(sid).await?.is_none() {
        return Err(ApiError::validation(codes::ENROLLMENT_STUDENT_MISSING));
    }
    if state.store.find_enrollment(sid, cid).await?.is_some() {
        return Err(ApiError::Conflict {
            message: "student is already enrolled in this course".to_string(),
        });
    }
    // The unique (student_id, course_id) constraint backstops the check
    // above under concurrent requests; the loser still gets a conflict.
    let enrollment = state.store.create_enrollment(sid, cid).await?;
    tracing::debug!(
        enrollment_id = enrollment.enrollment_id,
        student_id = sid,
        course_id = cid,
        "enrollment created"
    );
    Ok((StatusCode::CREATED, Json(enrollment)))
}

/// `DELETE /api/student/{sid}/course/{cid}` — drop one enrollment.
pub async fn remove(
    State(state): State<AppState>,
    Path((sid, cid)): Path<(i64, i64)>,
) -> Result<Json<Value>, ApiError> {
    if state.store.course(cid).await?.is_none() {
        return Err(ApiError::validation(codes::ENROLLMENT_COURSE_MISSING));
    }
    if state.store.student(sid).await?.is_none() {
        return Err(ApiError::validation(codes::ENROLLMENT_STUDENT_MISSING));
    }
    if state.store.find_enrollment(sid, cid).await?.is_none() {
        return Err(ApiError::NotFound {
            resource: "enrollment",
        });
    }
    state.store.delete_enrollment(sid, cid).await?;
    Ok(Json(json!({ "message": "Successfully Deleted" })))
}
