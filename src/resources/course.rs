//! Course HTTP handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde_json::{Value, json};

use crate::core::error::ApiError;
use crate::core::extract::Payload;
use crate::core::model::Course;
use crate::core::payload::CoursePayload;
use crate::server::AppState;

pub async fn list_courses(State(state): State<AppState>) -> Result<Json<Vec<Course>>, ApiError> {
    Ok(Json(state.store.list_courses().await?))
}

pub async fn get_course(
    State(state): State<AppState>,
    Path(cid): Path<i64>,
) -> Result<Json<Course>, ApiError> {
    state
        .store
        .course(cid)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound { resource: "course" })
}

pub async fn create_course(
    State(state): State<AppState>,
    Payload(payload): Payload<CoursePayload>,
) -> Result<(StatusCode, Json<Course>), ApiError> {
    let input = payload.validate()?;
    let course = state.store.create_course(input).await?;
    tracing::debug!(course_id = course.course_id, "course created");
    Ok((StatusCode::CREATED, Json(course)))
}

pub async fn update_course(
    State(state): State<AppState>,
    Path(cid): Path<i64>,
    Payload(payload): Payload<CoursePayload>,
) -> Result<Json<Course>, ApiError> {
    // Existence is checked before field validation, so an unknown id is a
    // 404 even when the body is also incomplete.
    if state.store.course(cid).await?.is_none() {
        return Err(ApiError::NotFound { resource: "course" });
    }
    let input = payload.validate()?;
    let course = state.store.update_course(cid, input).await?;
    Ok(Json(course))
}

pub async fn delete_course(
    State(state): State<AppState>,
    Path(cid): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    if state.store.course(cid).await?.is_none() {
        return Err(ApiError::NotFound { resource: "course" });
    }
    // Cascades to the course's enrollments inside the store.
    state.store.delete_course(cid).await?;
    Ok(Json(json!({ "message": "Successfully Deleted" })))
}
