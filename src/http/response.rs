//! Error responses.
//!
//! # Responsibilities
//! - Write every error surface as `{"error": "<message>"}` with its status
//! - Classify failures (route miss, not found, bad input, conflict, internal)
//! - Translate store failures into HTTP status codes exactly once
//!
//! # Design Decisions
//! - `error_response` is the only function that builds an error body
//! - Internal details are logged, not echoed to clients

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::store::StoreError;

/// Message returned when no route matches.
pub const INVALID_REQUEST: &str = "Invalid Request.";

/// Body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Build an error response with the given status and message.
pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
        .into_response()
}

/// Failures surfaced to HTTP clients.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No (path, method) pattern matched.
    #[error("Invalid Request.")]
    RouteNotFound,

    #[error("{0}")]
    ResourceNotFound(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Request body exceeds {0} bytes")]
    PayloadTooLarge(usize),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::RouteNotFound | ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::ResourceNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Timeout(_) => StatusCode::REQUEST_TIMEOUT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => ApiError::ResourceNotFound(err.to_string()),
            StoreError::InvalidInput(msg) => ApiError::InvalidInput(msg),
            StoreError::Conflict(msg) => ApiError::Conflict(msg),
            StoreError::Internal(msg) => ApiError::Internal(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self {
            ApiError::Internal(detail) => {
                tracing::error!(error = %detail, "Request failed");
                error_response(status, "Internal Server Error")
            }
            other => error_response(status, other.to_string()),
        }
    }
}
