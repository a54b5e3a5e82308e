//! Error handling middleware - RFC 7807 compliant responses.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use pixpost_shared::ErrorResponse;
use std::fmt;

/// Application-level error type that converts to RFC 7807 responses.
///
/// Downstream failures (database, filesystem) always surface as a generic
/// 500; the details only go to the server-side log.
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::BadRequest(detail) => ErrorResponse::bad_request(detail),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                ErrorResponse::internal_error()
            }
        };

        HttpResponse::build(self.status_code()).json(error)
    }
}

// Conversion from domain errors
impl From<pixpost_core::error::DomainError> for AppError {
    fn from(err: pixpost_core::error::DomainError) -> Self {
        match err {
            pixpost_core::error::DomainError::Validation(msg) => AppError::BadRequest(msg),
            pixpost_core::error::DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<pixpost_core::error::RepoError> for AppError {
    fn from(err: pixpost_core::error::RepoError) -> Self {
        tracing::error!("Database error: {}", err);
        AppError::Internal("Database error".to_string())
    }
}

impl From<pixpost_core::ports::ImageStoreError> for AppError {
    fn from(err: pixpost_core::ports::ImageStoreError) -> Self {
        tracing::error!("Image store error: {}", err);
        AppError::Internal("File storage error".to_string())
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
