//! Request body extraction.
//!
//! The API accepts entity attributes either as JSON or as an urlencoded
//! form. [`Payload`] dispatches on the Content-Type header; a request with
//! no body at all deserializes as an empty object so that required-field
//! validation, not serde, produces the client-facing error code.

use axum::extract::{Form, FromRequest, Request};
use axum::http::header::CONTENT_TYPE;
use axum::Json;
use serde::de::DeserializeOwned;

use crate::core::error::ApiError;

/// Body extractor accepting `application/json` or
/// `application/x-www-form-urlencoded`.
#[derive(Debug, Clone, Copy)]
pub struct Payload<T>(pub T);

impl<S, T> FromRequest<S> for Payload<T>
where
    S: Send + Sync,
    T: DeserializeOwned + 'static,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_ascii_lowercase();

        if content_type.starts_with("application/json") {
            let Json(value) = Json::<T>::from_request(req, state)
                .await
                .map_err(|e| ApiError::invalid_body(e.body_text()))?;
            Ok(Payload(value))
        } else if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(|e| ApiError::invalid_body(e.body_text()))?;
            Ok(Payload(value))
        } else {
            // No (or unrecognized) body: validation decides what is missing.
            let value = serde_json::from_value(serde_json::Value::Object(Default::default()))
                .map_err(|e| ApiError::invalid_body(e.to_string()))?;
            Ok(Payload(value))
        }
    }
}
