//! Typed error handling for the campus API.
//!
//! Every failure a handler can produce is expressed as an [`ApiError`] and
//! translated exactly once, at the response boundary, into an HTTP status and
//! a `{"error_code", "error_message"}` JSON body. Storage backends report
//! failures through the narrower [`StoreError`], which handlers convert via
//! `From`. Nothing propagates as an unhandled fault.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// Wire shape of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error_code: String,
    pub error_message: String,
}

/// Errors surfaced to HTTP clients.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A referenced record does not exist.
    #[error("{resource} not found")]
    NotFound { resource: &'static str },

    /// A required field is missing, a referenced entity is absent on
    /// create, or the request body itself is unreadable. Carries the stable,
    /// field-specific wire code.
    #[error("{message}")]
    Validation {
        code: &'static str,
        message: String,
    },

    /// A unique constraint was violated or a relationship already exists.
    #[error("{message}")]
    Conflict { message: String },

    /// Unexpected store failure. The detail stays in the log; clients only
    /// see a generic message.
    #[error("internal server error")]
    Internal,
}

impl ApiError {
    /// Build a validation error from a `(code, message)` pair.
    pub fn validation(code: (&'static str, &'static str)) -> Self {
        ApiError::Validation {
            code: code.0,
            message: code.1.to_string(),
        }
    }

    /// An unreadable or mistyped request body.
    pub fn invalid_body(detail: impl Into<String>) -> Self {
        ApiError::Validation {
            code: "INVALID_BODY",
            message: detail.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::NotFound { .. } => "NOT_FOUND",
            ApiError::Validation { code, .. } => code,
            ApiError::Conflict { .. } => "DUPLICATE_RESOURCE",
            ApiError::Internal => "INTERNAL_ERROR",
        }
    }

    pub fn to_body(&self) -> ErrorBody {
        ErrorBody {
            error_code: self.error_code().to_string(),
            error_message: self.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.to_body())).into_response()
    }
}

/// Errors reported by storage backends.
///
/// The store layer knows nothing about HTTP; handlers map these into
/// [`ApiError`] at the boundary.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// A unique constraint rejected the write. Also the outcome for the
    /// loser of two concurrent writes racing on the same key.
    #[error("{constraint} already exists")]
    Duplicate { constraint: &'static str },

    #[error("storage backend failure: {0}")]
    Backend(String),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, .. } => ApiError::NotFound { resource: entity },
            StoreError::Duplicate { constraint } => ApiError::Conflict {
                message: format!("{constraint} already exists"),
            },
            StoreError::Backend(detail) => {
                tracing::error!(%detail, "store failure");
                ApiError::Internal
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::payload::codes;

    #[test]
    fn test_not_found_maps_to_404() {
        let err = ApiError::NotFound { resource: "course" };
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.error_code(), "NOT_FOUND");
        assert!(err.to_string().contains("course"));
    }

    #[test]
    fn test_validation_carries_field_code() {
        let err = ApiError::validation(codes::COURSE_NAME_REQUIRED);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), "COURSE001");
        assert_eq!(err.to_string(), "Course Name is required");
    }

    #[test]
    fn test_conflict_maps_to_409() {
        let err = ApiError::Conflict {
            message: "course_code already exists".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.error_code(), "DUPLICATE_RESOURCE");
    }

    #[test]
    fn test_internal_leaks_no_detail() {
        let err: ApiError = StoreError::Backend("connection refused".to_string()).into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = err.to_body();
        assert!(!body.error_message.contains("connection refused"));
    }

    #[test]
    fn test_store_duplicate_becomes_conflict() {
        let err: ApiError = StoreError::Duplicate {
            constraint: "roll_number",
        }
        .into();
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert!(err.to_string().contains("roll_number"));
    }

    #[test]
    fn test_store_not_found_becomes_404() {
        let err: ApiError = StoreError::NotFound {
            entity: "student",
            id: 7,
        }
        .into();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_error_body_serialization() {
        let body = ApiError::validation(codes::STUDENT_ROLL_REQUIRED).to_body();
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["error_code"], "STUDENT001");
        assert_eq!(json["error_message"], "Roll Number required");
    }
}
