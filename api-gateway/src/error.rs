//! Error responses for the gateway

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use greenquote_common::{FieldViolation, QuoteError};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error};

/// API-level errors
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing, invalid or expired bearer token
    #[error("Unauthorized")]
    Unauthorized,

    /// Body could not be read as a quote request
    #[error("{0}")]
    BadRequest(String),

    /// Quote not found (also used for ids that are not UUIDs)
    #[error("Quote not found")]
    NotFound,

    #[error(transparent)]
    Quote(#[from] QuoteError),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: u16,
    pub success: bool,
    pub message: String,
    pub errors: Option<Vec<FieldViolation>>,
}

impl ApiError {
    fn parts(&self) -> (StatusCode, String, Option<Vec<FieldViolation>>) {
        match self {
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".into(), None),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            ApiError::NotFound => (StatusCode::NOT_FOUND, "Quote not found".into(), None),
            ApiError::Quote(QuoteError::Forbidden(_)) => (
                StatusCode::FORBIDDEN,
                "Not authorized to access this quote".into(),
                None,
            ),
            // Hides the admin listing from regular users
            ApiError::Quote(QuoteError::AdminOnly) => {
                (StatusCode::NOT_FOUND, "Admin only".into(), None)
            }
            ApiError::Quote(QuoteError::Validation(err)) => (
                StatusCode::BAD_REQUEST,
                "Validation failed".into(),
                Some(err.violations.clone()),
            ),
            ApiError::Quote(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".into(),
                None,
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, errors) = self.parts();

        if status.is_server_error() {
            error!(error = %self, "Request failed");
        } else {
            debug!(status = status.as_u16(), error = %self, "Request rejected");
        }

        let body = ErrorResponse {
            status: status.as_u16(),
            success: false,
            message,
            errors,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type ApiResult<T> = Result<T, ApiError>;
