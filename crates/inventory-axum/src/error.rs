//! Axum-specific error types and mappings.
//!
//! This module provides the error type for the Axum adapter and the
//! mappings from `CoreError` and extractor rejections to HTTP status codes
//! and response bodies.

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::{FormRejection, JsonRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use inventory_core::{CoreError, StorageError};
use serde::Serialize;
use thiserror::Error;

/// Axum-specific error type.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request (invalid input).
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Upload exceeded the configured body limit.
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
    status: u16,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::PayloadTooLarge(msg) => (StatusCode::PAYLOAD_TOO_LARGE, msg),
            Self::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = ErrorBody {
            error: message,
            status: status.as_u16(),
        };

        (status, axum::Json(body)).into_response()
    }
}

impl From<CoreError> for HttpError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(msg) => Self::BadRequest(msg),
            CoreError::NotFound(_) => Self::NotFound("Not found".to_string()),
            CoreError::Storage(storage) => {
                tracing::error!(target: "inventory.http", error = %storage, "storage failure");
                Self::Internal("Storage failure".to_string())
            }
            CoreError::Interrupted(reason) => {
                tracing::error!(target: "inventory.http", %reason, "inventory task interrupted");
                Self::Internal("Storage failure".to_string())
            }
        }
    }
}

impl From<StorageError> for HttpError {
    fn from(err: StorageError) -> Self {
        CoreError::from(err).into()
    }
}

impl From<MultipartError> for HttpError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Self::PayloadTooLarge(err.body_text())
        } else {
            Self::BadRequest(err.body_text())
        }
    }
}

impl From<MultipartRejection> for HttpError {
    fn from(err: MultipartRejection) -> Self {
        Self::BadRequest(err.body_text())
    }
}

impl From<JsonRejection> for HttpError {
    fn from(err: JsonRejection) -> Self {
        Self::BadRequest(err.body_text())
    }
}

impl From<FormRejection> for HttpError {
    fn from(err: FormRejection) -> Self {
        Self::BadRequest(err.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(err: HttpError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn validation_maps_to_bad_request() {
        let (status, body) =
            body_json(CoreError::Validation("name is required".into()).into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "name is required");
        assert_eq!(body["status"], 400);
    }

    #[tokio::test]
    async fn not_found_causes_are_indistinguishable() {
        let a = body_json(CoreError::NotFound("item \"abc\"".into()).into()).await;
        let b = body_json(CoreError::NotFound("item 7 has no photo".into()).into()).await;
        assert_eq!(a.0, StatusCode::NOT_FOUND);
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn storage_failure_hides_details() {
        let err = StorageError::Io {
            path: "/secret/inventory.json".into(),
            reason: "disk full".into(),
        };
        let (status, body) = body_json(err.into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body["error"].as_str().unwrap().contains("/secret"));
    }

    #[tokio::test]
    async fn interrupted_mutation_is_internal() {
        let (status, body) =
            body_json(CoreError::Interrupted("task cancelled".into()).into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Storage failure");
    }
}
