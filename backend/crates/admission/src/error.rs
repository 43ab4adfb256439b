//! Admission Error Types
//!
//! The first failing stage of the admission pipeline produces a
//! [`Rejection`], which integrates with the unified `kernel::error::AppError`
//! system.

use auth::AuthError;
use http::{Method, StatusCode};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::rate_limit::RateLimitStoreError;
use thiserror::Error;

use crate::domain::repository::DebounceStoreError;
use crate::domain::value_objects::RateLimitStatus;

/// Admission result type alias
pub type AdmissionResult<T> = Result<T, Rejection>;

/// Reason a request was stopped before reaching its handler
#[derive(Debug, Error)]
pub enum Rejection {
    /// Global or group limiter exhausted
    #[error("Too many requests. Please try again later.")]
    RateLimitExceeded { status: RateLimitStatus },

    /// Token or role check failed
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Identical write inside the debounce window
    #[error("Duplicate request detected. Please wait {retry_after_secs}s before retrying.")]
    DuplicateRequest { retry_after_secs: u64 },

    /// Body of a debounced write is not JSON
    #[error("Invalid JSON: {0}")]
    InvalidBody(#[from] serde_json::Error),

    /// Body could not be buffered
    #[error("Request body is too large")]
    PayloadTooLarge,

    /// Counter or debounce backend failed
    #[error("Admission store unavailable: {0}")]
    Store(String),
}

impl Rejection {
    /// Get the HTTP status code for this rejection
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get the ErrorKind for this rejection
    pub fn kind(&self) -> ErrorKind {
        match self {
            Rejection::RateLimitExceeded { .. } | Rejection::DuplicateRequest { .. } => {
                ErrorKind::TooManyRequests
            }
            Rejection::Auth(e) => e.kind(),
            Rejection::InvalidBody(_) => ErrorKind::BadRequest,
            Rejection::PayloadTooLarge => ErrorKind::PayloadTooLarge,
            Rejection::Store(_) => ErrorKind::InternalServerError,
        }
    }

    /// Short machine-readable reason, used in log fields
    pub fn reason(&self) -> &'static str {
        match self {
            Rejection::RateLimitExceeded { .. } => "rate_limited",
            Rejection::Auth(e) => e.reason(),
            Rejection::DuplicateRequest { .. } => "duplicate_request",
            Rejection::InvalidBody(_) => "invalid_body",
            Rejection::PayloadTooLarge => "payload_too_large",
            Rejection::Store(_) => "store_unavailable",
        }
    }

    /// Seconds the client should wait before retrying
    pub fn retry_after_secs(&self) -> Option<u64> {
        match self {
            Rejection::RateLimitExceeded { status } => Some(status.reset_secs.max(1)),
            Rejection::DuplicateRequest { retry_after_secs } => Some(*retry_after_secs),
            _ => None,
        }
    }

    /// Rate limit headers to attach to the rejection
    pub fn rate_limit_status(&self) -> Option<RateLimitStatus> {
        match self {
            Rejection::RateLimitExceeded { status } => Some(*status),
            _ => None,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        match self {
            Rejection::Auth(e) => e.to_app_error(),
            Rejection::Store(_) => AppError::internal("Internal server error"),
            _ => {
                let err = AppError::new(self.kind(), self.to_string());
                match self.retry_after_secs() {
                    Some(secs) => err.with_retry_after(secs),
                    None => err,
                }
            }
        }
    }

    /// Emit the single log line for this rejection
    pub fn log(&self, client: &str, method: &Method, path: &str) {
        if self.kind().is_server_error() {
            tracing::error!(
                client,
                %method,
                path,
                reason = self.reason(),
                error = %self,
                "Admission failed"
            );
        } else {
            tracing::warn!(
                client,
                %method,
                path,
                reason = self.reason(),
                "Request rejected"
            );
        }
    }
}

impl From<RateLimitStoreError> for Rejection {
    fn from(err: RateLimitStoreError) -> Self {
        Rejection::Store(err.to_string())
    }
}

impl From<DebounceStoreError> for Rejection {
    fn from(err: DebounceStoreError) -> Self {
        Rejection::Store(err.to_string())
    }
}

impl From<Rejection> for AppError {
    fn from(rejection: Rejection) -> Self {
        rejection.to_app_error()
    }
}
