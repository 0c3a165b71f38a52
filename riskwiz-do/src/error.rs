//! Error types for riskwiz-do

use crate::orchestrator::OrchestrateError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use riskwiz_common::types::ErrorResponse;
use thiserror::Error;

/// API error type
///
/// The wire shape is the flat `{error, message}` body shared with the
/// remote dispatch contract.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<OrchestrateError> for ApiError {
    fn from(err: OrchestrateError) -> Self {
        match err {
            OrchestrateError::Input(detail) => {
                ApiError::BadRequest(format!("Missing required inputs: {detail}"))
            }
            // Dispatch and contract failures are both internal from the
            // caller's point of view; the detail travels in the message
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg),
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
