//! API error types and responses.
//!
//! Every failure is returned as `{"error": {"code": ..., "message": ...}}`,
//! where `message` is the human-readable text produced by the desk.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use helpdesk_desk::DeskError;

/// API error type that implements `IntoResponse`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request body or parameters.
    #[error("{0}")]
    BadRequest(String),

    /// The requested resource was not found.
    #[error("{0}")]
    NotFound(String),

    /// The request lost a race with a concurrent change.
    #[error("{0}")]
    Conflict(String),

    /// Internal server error.
    #[error("{0}")]
    Internal(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

/// Error details.
#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

impl ApiError {
    /// Shorthand for [`ApiError::BadRequest`].
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// Get the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code string for this error.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "bad_request",
            Self::NotFound(_) => "not_found",
            Self::Conflict(_) => "conflict",
            Self::Internal(_) => "internal_error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();
        let message = self.to_string();

        let body = ErrorResponse {
            error: ErrorBody { code, message },
        };

        (status, Json(body)).into_response()
    }
}

impl From<DeskError> for ApiError {
    fn from(err: DeskError) -> Self {
        match err {
            DeskError::InvalidRequest(msg) => Self::BadRequest(msg),
            DeskError::TicketNotFound(_)
            | DeskError::UserNotFound(_)
            | DeskError::StaffNotFound(_) => Self::NotFound(err.to_string()),
            DeskError::Conflict { .. } => Self::Conflict(err.to_string()),
            DeskError::Store(store_err) => {
                tracing::error!(error = %store_err, "Store error");
                Self::Internal("storage error".to_string())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}
