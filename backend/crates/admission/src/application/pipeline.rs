//! Admission Pipeline
//!
//! Runs rate limiting, token verification, role checks and debouncing in
//! that order, stopping at the first rejection.

use std::sync::Arc;

use auth::{CurrentUser, RoleAuthorizer, TokenAuthenticator, UserRepository};
use axum::body::{Body, to_bytes};
use axum::extract::Request;
use platform::clock::SharedClock;
use platform::rate_limit::{MemoryRateLimitStore, RateLimitStore};

use crate::application::config::AdmissionConfig;
use crate::application::debounce::DebounceGuard;
use crate::application::rate_limiter::RateLimiter;
use crate::domain::repository::DebounceStore;
use crate::domain::value_objects::{Access, RateLimitStatus, RoutePolicy};
use crate::error::{AdmissionResult, Rejection};
use crate::infra::memory::MemoryDebounceStore;

/// A request cleared for its handler
#[derive(Debug)]
pub struct Admission {
    /// The request, with `CurrentUser` attached when a token was verified
    pub request: Request,
    pub rate_limit: RateLimitStatus,
}

/// Global limiter status already counted for a request
///
/// Set by the outer `global_rate_limit` layer so route gates only count the
/// route group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlobalRateLimit(pub RateLimitStatus);

/// Entries removed by one sweep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub rate_windows: usize,
    pub debounce_entries: usize,
}

pub struct AdmissionPipeline<U, R = MemoryRateLimitStore, D = MemoryDebounceStore>
where
    U: UserRepository,
    R: RateLimitStore,
    D: DebounceStore,
{
    config: Arc<AdmissionConfig>,
    rate_limiter: RateLimiter<R>,
    authenticator: TokenAuthenticator<U>,
    debounce: DebounceGuard<D>,
}

impl<U, R, D> AdmissionPipeline<U, R, D>
where
    U: UserRepository + Send + Sync + 'static,
    R: RateLimitStore + Send + Sync + 'static,
    D: DebounceStore + Send + Sync + 'static,
{
    pub fn new(
        config: AdmissionConfig,
        authenticator: TokenAuthenticator<U>,
        rate_store: Arc<R>,
        debounce_store: Arc<D>,
        clock: SharedClock,
    ) -> Self {
        let config = Arc::new(config);
        Self {
            rate_limiter: RateLimiter::new(rate_store, config.clone(), clock.clone()),
            debounce: DebounceGuard::new(debounce_store, clock),
            authenticator,
            config,
        }
    }

    pub fn config(&self) -> &AdmissionConfig {
        &self.config
    }

    /// Count a request against the global limiter
    pub async fn admit_global(&self, client_key: &str) -> AdmissionResult<RateLimitStatus> {
        self.rate_limiter.admit_global(client_key).await
    }

    /// Run every stage `policy` calls for
    ///
    /// `path` is the full request path, used in the debounce fingerprint.
    /// When the body is buffered for debouncing it is handed on unchanged.
    /// A request carrying [`GlobalRateLimit`] is not counted globally again.
    pub async fn admit(
        &self,
        policy: &RoutePolicy,
        client_key: &str,
        path: &str,
        request: Request,
    ) -> AdmissionResult<Admission> {
        let group = policy.rate_limit_group;
        let counted = request.extensions().get::<GlobalRateLimit>().copied();
        let rate_limit = match counted {
            Some(GlobalRateLimit(global)) => {
                self.rate_limiter.admit_group(client_key, group, global).await?
            }
            None => self.rate_limiter.admit(client_key, group).await?,
        };

        let (mut parts, body) = request.into_parts();

        if let Access::Authenticated(roles) = policy.access_for(&parts.method) {
            let user = self.authenticator.verify_headers(&parts.headers).await?;
            if !roles.is_empty() {
                RoleAuthorizer::authorize(&user, roles)?;
            }
            parts.extensions.insert(CurrentUser(user));
        }

        let body = match policy.debounce_for(&parts.method) {
            Some(window) => {
                let bytes = to_bytes(body, self.config.body_limit)
                    .await
                    .map_err(|_| Rejection::PayloadTooLarge)?;
                self.debounce.check(client_key, path, &bytes, window).await?;
                Body::from(bytes)
            }
            None => body,
        };

        Ok(Admission {
            request: Request::from_parts(parts, body),
            rate_limit,
        })
    }

    /// Drop stale rate windows and debounce entries
    pub async fn sweep(&self) -> AdmissionResult<SweepReport> {
        Ok(SweepReport {
            rate_windows: self.rate_limiter.purge_stale().await?,
            debounce_entries: self.debounce.purge_stale().await?,
        })
    }
}
