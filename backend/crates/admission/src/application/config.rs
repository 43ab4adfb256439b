//! Application Configuration
//!
//! Configuration for the admission layer.

use std::collections::BTreeMap;
use std::time::Duration;

pub use platform::rate_limit::RateLimitConfig;

/// Default cap on buffered request bodies (2 MB)
pub const DEFAULT_BODY_LIMIT: usize = 2 * 1024 * 1024;

/// Default tick of the background sweeper
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_millis(1_000);

/// Admission configuration
#[derive(Debug, Clone)]
pub struct AdmissionConfig {
    /// Limiter applied to every request
    pub global: RateLimitConfig,
    /// Named limiters applied after the global one
    pub groups: BTreeMap<String, RateLimitConfig>,
    /// Sweeper tick; must not exceed the smallest debounce window
    pub sweep_interval: Duration,
    /// Largest body the debounce stage will buffer
    pub body_limit: usize,
    /// Key clients by the first `X-Forwarded-For` entry instead of the peer
    pub trust_proxy: bool,
}

impl Default for AdmissionConfig {
    fn default() -> Self {
        Self::new(RateLimitConfig::default())
    }
}

impl AdmissionConfig {
    /// Global limiter plus `auth` and `api` groups, all with `limit`
    pub fn new(limit: RateLimitConfig) -> Self {
        Self {
            global: limit,
            groups: BTreeMap::from([
                ("auth".to_string(), limit),
                ("api".to_string(), limit),
            ]),
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
            body_limit: DEFAULT_BODY_LIMIT,
            trust_proxy: false,
        }
    }

    /// Create config for development (limits that local tooling won't hit)
    pub fn development() -> Self {
        Self::new(RateLimitConfig::new(10_000, Duration::from_secs(60)))
    }

    pub fn with_group(mut self, name: impl Into<String>, limit: RateLimitConfig) -> Self {
        self.groups.insert(name.into(), limit);
        self
    }

    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }

    pub fn with_trust_proxy(mut self, trust_proxy: bool) -> Self {
        self.trust_proxy = trust_proxy;
        self
    }

    /// Limiter for `group`; unknown groups share the global settings
    pub fn group(&self, group: &str) -> &RateLimitConfig {
        self.groups.get(group).unwrap_or(&self.global)
    }
}
