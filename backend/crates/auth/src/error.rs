//! Auth Error Types
//!
//! Auth-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// No `Authorization: Bearer` header
    #[error("Not authorized, token missing")]
    MissingToken,

    /// Bad signature, malformed payload or unsupported algorithm
    #[error("Not authorized, token invalid")]
    InvalidToken,

    /// Genuine token past its expiry
    #[error("Not authorized, token expired")]
    ExpiredToken,

    /// Token subject no longer exists
    #[error("User not found")]
    UnknownPrincipal,

    /// Role outside the allowed set
    #[error("Forbidden: insufficient permissions")]
    Forbidden,

    /// Wrong email or password
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Email already registered
    #[error("Email already used")]
    EmailTaken,

    /// Admin lookup of a missing user
    #[error("Not found")]
    UserNotFound,

    /// Rejected input
    #[error("{message}")]
    Validation {
        message: String,
        action: Option<&'static str>,
    },

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    pub fn validation(message: impl Into<String>) -> Self {
        AuthError::Validation {
            message: message.into(),
            action: None,
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::MissingToken
            | AuthError::InvalidToken
            | AuthError::ExpiredToken
            | AuthError::UnknownPrincipal => ErrorKind::Unauthorized,
            AuthError::Forbidden => ErrorKind::Forbidden,
            AuthError::InvalidCredentials
            | AuthError::EmailTaken
            | AuthError::Validation { .. } => ErrorKind::BadRequest,
            AuthError::UserNotFound => ErrorKind::NotFound,
            AuthError::Database(_) | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Short machine-readable reason, used in log fields
    pub fn reason(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "missing_token",
            AuthError::InvalidToken => "invalid_token",
            AuthError::ExpiredToken => "expired_token",
            AuthError::UnknownPrincipal => "unknown_principal",
            AuthError::Forbidden => "forbidden",
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::EmailTaken => "email_taken",
            AuthError::UserNotFound => "user_not_found",
            AuthError::Validation { .. } => "validation",
            AuthError::Database(_) => "database",
            AuthError::Internal(_) => "internal",
        }
    }

    /// Convert to AppError
    ///
    /// Server-side failures never expose their details.
    pub fn to_app_error(&self) -> AppError {
        match self {
            AuthError::Database(_) | AuthError::Internal(_) => {
                AppError::internal("Internal server error")
            }
            AuthError::Validation {
                message,
                action: Some(action),
            } => AppError::bad_request(message.clone()).with_action(*action),
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        err.to_app_error()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_failures_are_unauthorized() {
        for err in [
            AuthError::MissingToken,
            AuthError::InvalidToken,
            AuthError::ExpiredToken,
            AuthError::UnknownPrincipal,
        ] {
            assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        }
        assert_eq!(AuthError::Forbidden.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_handler_errors_follow_messages() {
        let err = AuthError::EmailTaken.to_app_error();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.message(), "Email already used");

        let err = AuthError::InvalidCredentials.to_app_error();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.message(), "Invalid credentials");
    }

    #[test]
    fn test_internal_details_are_hidden() {
        let err = AuthError::Internal("pool exploded".to_string()).to_app_error();
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.message(), "Internal server error");
    }

    #[test]
    fn test_validation_keeps_action() {
        let err = AuthError::Validation {
            message: "Invalid email format".to_string(),
            action: Some("Check the address"),
        }
        .to_app_error();
        assert_eq!(err.action(), Some("Check the address"));
    }
}
