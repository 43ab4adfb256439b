//! Resource Error Types
//!
//! Resource-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

use crate::domain::value_objects::ResourceKind;

/// Resource-specific result type alias
pub type ResourceResult<T> = Result<T, ResourceError>;

#[derive(Debug, Error)]
pub enum ResourceError {
    /// No record with the requested id
    #[error("Not found")]
    NotFound,

    /// Rejected input
    #[error("{0}")]
    Validation(String),

    /// A referenced record does not exist
    #[error("Referenced record does not exist")]
    MissingReference(ResourceKind),

    /// Stored document does not match its type
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ResourceError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ResourceError::NotFound => ErrorKind::NotFound,
            ResourceError::Validation(_) | ResourceError::MissingReference(_) => {
                ErrorKind::BadRequest
            }
            ResourceError::Serialization(_)
            | ResourceError::Database(_)
            | ResourceError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        if self.kind().is_server_error() {
            return AppError::internal("Internal server error");
        }
        let err = AppError::new(self.kind(), self.to_string());
        match self {
            ResourceError::MissingReference(kind) => {
                err.with_action(format!("Check the referenced {kind} id"))
            }
            _ => err,
        }
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        match self {
            ResourceError::Serialization(e) => {
                tracing::error!(error = %e, "Stored document does not decode");
            }
            ResourceError::Database(e) => {
                tracing::error!(error = %e, "Resource database error");
            }
            ResourceError::Internal(msg) => {
                tracing::error!(message = %msg, "Resource internal error");
            }
            _ => {
                tracing::debug!(error = %self, "Resource error");
            }
        }
    }
}

impl IntoResponse for ResourceError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<ResourceError> for AppError {
    fn from(err: ResourceError) -> Self {
        err.to_app_error()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = ResourceError::NotFound.to_app_error();
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.message(), "Not found");
    }

    #[test]
    fn test_missing_reference_is_bad_request() {
        let err = ResourceError::MissingReference(ResourceKind::Post).to_app_error();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.action(), Some("Check the referenced posts id"));
    }

    #[test]
    fn test_server_errors_are_hidden() {
        let err = ResourceError::Internal("disk on fire".to_string()).to_app_error();
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.message(), "Internal server error");
        assert_eq!(
            ResourceError::Database(sqlx::Error::PoolTimedOut).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
