//! Domain Value Objects

use std::time::Duration;

use auth::RoleSet;
use http::Method;
use platform::crypto::sha256_parts;
use platform::rate_limit::RateLimitDecision;

/// SHA-256 over (client key, route path, canonical body)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    pub fn compute(client_key: &str, path: &str, canonical_body: &str) -> Self {
        Self(sha256_parts(&[
            client_key.as_bytes(),
            path.as_bytes(),
            canonical_body.as_bytes(),
        ]))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

/// Who may call a route for one class of methods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// No token required
    Public,
    /// Valid bearer token required; an empty role set admits any role
    Authenticated(RoleSet),
}

impl Access {
    /// Any signed-in user
    pub const fn authenticated() -> Self {
        Access::Authenticated(RoleSet::EMPTY)
    }

    pub const fn roles(roles: RoleSet) -> Self {
        Access::Authenticated(roles)
    }
}

/// Methods subject to debouncing
pub fn is_mutating(method: &Method) -> bool {
    [Method::POST, Method::PUT, Method::PATCH].contains(method)
}

/// Methods checked against the write access class
fn is_write(method: &Method) -> bool {
    is_mutating(method) || *method == Method::DELETE
}

/// Static admission rules of one mount point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoutePolicy {
    /// Mount name, used in logs
    pub name: &'static str,
    /// GET, HEAD, OPTIONS
    pub read_access: Access,
    /// POST, PUT, PATCH, DELETE
    pub write_access: Access,
    /// Identical writes inside this window are rejected
    pub debounce_window: Option<Duration>,
    /// Named limiter applied after the global one
    pub rate_limit_group: Option<&'static str>,
}

impl RoutePolicy {
    /// Everything public, no debounce, global limiter only
    pub const fn public(name: &'static str) -> Self {
        Self {
            name,
            read_access: Access::Public,
            write_access: Access::Public,
            debounce_window: None,
            rate_limit_group: None,
        }
    }

    pub const fn read(mut self, access: Access) -> Self {
        self.read_access = access;
        self
    }

    pub const fn write(mut self, access: Access) -> Self {
        self.write_access = access;
        self
    }

    /// Same access class for reads and writes
    pub const fn access(self, access: Access) -> Self {
        self.read(access).write(access)
    }

    pub const fn debounce(mut self, window: Duration) -> Self {
        self.debounce_window = Some(window);
        self
    }

    pub const fn rate_limit_group(mut self, group: &'static str) -> Self {
        self.rate_limit_group = Some(group);
        self
    }

    pub fn access_for(&self, method: &Method) -> Access {
        if is_write(method) {
            self.write_access
        } else {
            self.read_access
        }
    }

    /// Window to apply to `method`, if any
    pub fn debounce_for(&self, method: &Method) -> Option<Duration> {
        self.debounce_window.filter(|_| is_mutating(method))
    }
}

/// Rate limit state reported to the client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitStatus {
    pub limit: u32,
    pub remaining: u32,
    /// Seconds until the window resets
    pub reset_secs: u64,
}

impl RateLimitStatus {
    pub fn from_decision(decision: &RateLimitDecision, now_ms: i64) -> Self {
        Self {
            limit: decision.limit,
            remaining: decision.remaining,
            reset_secs: decision.reset_after_secs(now_ms),
        }
    }

    /// The status closer to exhaustion
    pub fn tighter(self, other: Self) -> Self {
        if other.remaining < self.remaining { other } else { self }
    }
}
