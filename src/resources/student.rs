//! Student HTTP handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde_json::{Value, json};

use crate::core::error::ApiError;
use crate::core::extract::Payload;
use crate::core::model::Student;
use crate::core::payload::StudentPayload;
use crate::server::AppState;

pub async fn list_students(State(state): State<AppState>) -> Result<Json<Vec<Student>>, ApiError> {
    Ok(Json(state.store.list_students().await?))
}

pub async fn get_student(
    State(state): State<AppState>,
    Path(sid): Path<i64>,
) -> Result<Json<Student>, ApiError> {
    state
        .store
        .student(sid)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound {
            resource: "student",
        })
}

pub async fn create_student(
    State(state): State<AppState>,
    Payload(payload): Payload<StudentPayload>,
) -> Result<(StatusCode, Json<Student>), ApiError> {
    let input = payload.validate()?;
    let student = state.store.create_student(input).await?;
    tracing::debug!(student_id = student.student_id, "student created");
    Ok((StatusCode::CREATED, Json(student)))
}

pub async fn update_student(
    State(state): State<AppState>,
    Path(sid): Path<i64>,
    Payload(payload): Payload<StudentPayload>,
) -> Result<Json<Student>, ApiError> {
    // Existence is checked before field validation, so an unknown id is a
    // 404 even when the body is also incomplete.
    if state.store.student(sid).await?.is_none() {
        return Err(ApiError::NotFound {
            resource: "student",
        });
    }
    let input = payload.validate()?;
    let student = state.store.update_student(sid, input).await?;
    Ok(Json(student))
}

pub async fn delete_student(
    State(state): State<AppState>,
    Path(sid): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    if state.store.student(sid).await?.is_none() {
        return Err(ApiError::NotFound {
            resource: "student",
        });
    }
    // Deliberately no cascade: the student's enrollments stay in place.
    state.store.delete_student(sid).await?;
    Ok(Json(json!({ "message": "Successfully Deleted" })))
}
