//! Admission Middleware
//!
//! [`global_rate_limit`] wraps the whole application so every request is
//! counted, routed or not. [`admission_gate`] wraps a mounted router with
//! one [`RoutePolicy`]:
//!
//! ```ignore
//! Router::new()
//!     .nest("/api/posts", posts_router(state).route_layer(middleware::from_fn_with_state(
//!         AdmissionState::new(pipeline.clone(), POSTS_POLICY),
//!         admission_gate::<U, R, D>,
//!     )))
//!     .layer(middleware::from_fn_with_state(pipeline, global_rate_limit::<U, R, D>))
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use auth::UserRepository;
use axum::extract::{ConnectInfo, OriginalUri, Request, State};
use axum::http::header::HeaderName;
use axum::http::{HeaderMap, HeaderValue};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use platform::client::client_key;
use platform::rate_limit::{MemoryRateLimitStore, RateLimitStore};

use crate::application::pipeline::{AdmissionPipeline, GlobalRateLimit};
use crate::domain::repository::DebounceStore;
use crate::domain::value_objects::{RateLimitStatus, RoutePolicy};
use crate::error::Rejection;
use crate::infra::memory::MemoryDebounceStore;

/// Request quota of the current window
pub const RATELIMIT_LIMIT: HeaderName = HeaderName::from_static("ratelimit-limit");
/// Requests left in the current window
pub const RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("ratelimit-remaining");
/// Seconds until the current window resets
pub const RATELIMIT_RESET: HeaderName = HeaderName::from_static("ratelimit-reset");

/// Middleware state
pub struct AdmissionState<U, R = MemoryRateLimitStore, D = MemoryDebounceStore>
where
    U: UserRepository,
    R: RateLimitStore,
    D: DebounceStore,
{
    pub pipeline: Arc<AdmissionPipeline<U, R, D>>,
    pub policy: RoutePolicy,
}

impl<U, R, D> AdmissionState<U, R, D>
where
    U: UserRepository,
    R: RateLimitStore,
    D: DebounceStore,
{
    pub fn new(pipeline: Arc<AdmissionPipeline<U, R, D>>, policy: RoutePolicy) -> Self {
        Self { pipeline, policy }
    }
}

impl<U, R, D> Clone for AdmissionState<U, R, D>
where
    U: UserRepository,
    R: RateLimitStore,
    D: DebounceStore,
{
    fn clone(&self) -> Self {
        Self {
            pipeline: self.pipeline.clone(),
            policy: self.policy,
        }
    }
}

/// Middleware that runs the admission pipeline before the handler
pub async fn admission_gate<U, R, D>(
    State(state): State<AdmissionState<U, R, D>>,
    request: Request,
    next: Next,
) -> Response
where
    U: UserRepository + Send + Sync + 'static,
    R: RateLimitStore + Send + Sync + 'static,
    D: DebounceStore + Send + Sync + 'static,
{
    let client = request_client_key(&request, state.pipeline.config().trust_proxy);
    let method = request.method().clone();
    // nested routers see a stripped URI
    let path = request
        .extensions()
        .get::<OriginalUri>()
        .map(|OriginalUri(uri)| uri.path().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    match state
        .pipeline
        .admit(&state.policy, &client, &path, request)
        .await
    {
        Ok(admission) => {
            let mut response = next.run(admission.request).await;
            apply_rate_limit_headers(response.headers_mut(), &admission.rate_limit);
            response
        }
        Err(rejection) => {
            rejection.log(&client, &method, &path);
            rejection_response(&rejection)
        }
    }
}

/// Outer middleware counting every request against the global limiter
///
/// Responses that no route gate decorated get the global rate limit headers.
pub async fn global_rate_limit<U, R, D>(
    State(pipeline): State<Arc<AdmissionPipeline<U, R, D>>>,
    mut request: Request,
    next: Next,
) -> Response
where
    U: UserRepository + Send + Sync + 'static,
    R: RateLimitStore + Send + Sync + 'static,
    D: DebounceStore + Send + Sync + 'static,
{
    let client = request_client_key(&request, pipeline.config().trust_proxy);

    match pipeline.admit_global(&client).await {
        Ok(status) => {
            request.extensions_mut().insert(GlobalRateLimit(status));
            let mut response = next.run(request).await;
            if !response.headers().contains_key(RATELIMIT_LIMIT) {
                apply_rate_limit_headers(response.headers_mut(), &status);
            }
            response
        }
        Err(rejection) => {
            rejection.log(&client, request.method(), request.uri().path());
            rejection_response(&rejection)
        }
    }
}

/// Client key of a request: the socket peer, or the forwarded client
/// behind a trusted proxy
fn request_client_key(request: &Request, trust_proxy: bool) -> String {
    let peer_ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());
    client_key(request.headers(), peer_ip, trust_proxy)
}

/// Problem JSON for a rejection, with rate limit headers when relevant
pub fn rejection_response(rejection: &Rejection) -> Response {
    let mut response = rejection.to_app_error().into_response();
    if let Some(status) = rejection.rate_limit_status() {
        apply_rate_limit_headers(response.headers_mut(), &status);
    }
    response
}

fn apply_rate_limit_headers(headers: &mut HeaderMap, status: &RateLimitStatus) {
    headers.insert(RATELIMIT_LIMIT, HeaderValue::from(status.limit));
    headers.insert(RATELIMIT_REMAINING, HeaderValue::from(status.remaining));
    headers.insert(RATELIMIT_RESET, HeaderValue::from(status.reset_secs));
}
