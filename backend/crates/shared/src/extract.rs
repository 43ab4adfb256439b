//! Request extractors
//!
//! [`JsonBody`] replaces `axum::Json` in handlers so that malformed bodies
//! surface as the same problem-JSON shape as every other error.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;

use crate::error::app_error::AppError;
use crate::error::kind::ErrorKind;

/// JSON request body that rejects with [`AppError`]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(rejection_to_app_error(rejection)),
        }
    }
}

fn rejection_to_app_error(rejection: JsonRejection) -> AppError {
    if rejection.status().as_u16() == ErrorKind::PayloadTooLarge.status_code() {
        return AppError::new(ErrorKind::PayloadTooLarge, "Request body is too large");
    }
    match rejection {
        JsonRejection::MissingJsonContentType(_) => {
            AppError::bad_request("Expected request with `Content-Type: application/json`")
        }
        other => AppError::bad_request(other.body_text()),
    }
}
