//! Problem-JSON rendering of [`AppError`]

use axum::Json;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use super::app_error::AppError;

/// RFC 7807 problem details body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemDetails<'a> {
    #[serde(rename = "type")]
    pub kind: String,
    pub title: &'static str,
    pub status: u16,
    pub detail: &'a str,
    pub action: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after_seconds: Option<u64>,
}

impl<'a> From<&'a AppError> for ProblemDetails<'a> {
    fn from(err: &'a AppError) -> Self {
        Self {
            kind: format!("https://httpstatuses.io/{}", err.status_code()),
            title: err.kind().as_str(),
            status: err.status_code(),
            detail: err.message(),
            action: err.action(),
            retry_after_seconds: err.retry_after_secs(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let mut response = (status, Json(ProblemDetails::from(&self))).into_response();
        if let Some(secs) = self.retry_after_secs() {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(secs));
        }
        response
    }
}
