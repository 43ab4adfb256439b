//! Rate Limiting Infrastructure
//!
//! Fixed-window counters keyed by an arbitrary string (client key plus
//! limiter scope). Windows live in process memory and are lost on restart.

use std::time::Duration;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

/// Rate limit configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Maximum requests allowed in the window
    pub max_requests: u32,
    /// Time window duration
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 100,
            window: Duration::from_secs(60),
        }
    }
}

impl RateLimitConfig {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
        }
    }

    pub fn window_ms(&self) -> i64 {
        self.window.as_millis() as i64
    }
}

/// Outcome of one rate limit hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    pub reset_at_ms: i64,
}

impl RateLimitDecision {
    /// Whole seconds until the window resets, rounded up
    pub fn reset_after_secs(&self, now_ms: i64) -> u64 {
        let left = (self.reset_at_ms - now_ms).max(0) as u64;
        left.div_ceil(1000)
    }
}

/// Counter state of one fixed window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateWindow {
    pub window_start_ms: i64,
    pub count: u32,
    pub window_ms: i64,
}

impl RateWindow {
    fn open(now_ms: i64, window_ms: i64) -> Self {
        Self {
            window_start_ms: now_ms,
            count: 1,
            window_ms,
        }
    }

    pub fn is_expired(&self, now_ms: i64) -> bool {
        now_ms - self.window_start_ms >= self.window_ms
    }

    /// Apply one request to this window
    fn hit(&mut self, now_ms: i64, config: &RateLimitConfig) -> RateLimitDecision {
        if self.is_expired(now_ms) {
            *self = Self::open(now_ms, config.window_ms());
        } else if self.count >= config.max_requests {
            return self.decision(false, config);
        } else {
            self.count += 1;
        }
        self.decision(true, config)
    }

    fn decision(&self, allowed: bool, config: &RateLimitConfig) -> RateLimitDecision {
        RateLimitDecision {
            allowed,
            limit: config.max_requests,
            remaining: config.max_requests.saturating_sub(self.count),
            reset_at_ms: self.window_start_ms + self.window_ms,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RateLimitStoreError {
    #[error("Rate limit backend unavailable: {0}")]
    Unavailable(String),
}

/// Trait for rate limit storage backends
///
/// `hit` must apply the read-modify-write for one key atomically.
#[trait_variant::make(RateLimitStore: Send)]
pub trait LocalRateLimitStore {
    /// Count one request against `key` and report the decision
    async fn hit(
        &self,
        key: &str,
        config: &RateLimitConfig,
        now_ms: i64,
    ) -> Result<RateLimitDecision, RateLimitStoreError>;

    /// Drop windows that have expired, returning how many were removed
    async fn purge_stale(&self, now_ms: i64) -> Result<usize, RateLimitStoreError>;
}

/// In-process rate limit store
///
/// The DashMap entry guard holds the shard lock for the whole
/// read-modify-write, so concurrent hits on one key serialize.
#[derive(Debug, Default)]
pub struct MemoryRateLimitStore {
    windows: DashMap<String, RateWindow>,
}

impl MemoryRateLimitStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn window(&self, key: &str) -> Option<RateWindow> {
        self.windows.get(key).map(|w| *w)
    }

    fn hit_sync(&self, key: &str, config: &RateLimitConfig, now_ms: i64) -> RateLimitDecision {
        match self.windows.entry(key.to_string()) {
            Entry::Occupied(mut occupied) => occupied.get_mut().hit(now_ms, config),
            Entry::Vacant(vacant) => {
                let window = RateWindow::open(now_ms, config.window_ms());
                vacant.insert(window).decision(true, config)
            }
        }
    }
}

impl RateLimitStore for MemoryRateLimitStore {
    async fn hit(
        &self,
        key: &str,
        config: &RateLimitConfig,
        now_ms: i64,
    ) -> Result<RateLimitDecision, RateLimitStoreError> {
        Ok(self.hit_sync(key, config, now_ms))
    }

    async fn purge_stale(&self, now_ms: i64) -> Result<usize, RateLimitStoreError> {
        let before = self.windows.len();
        self.windows.retain(|_, window| !window.is_expired(now_ms));
        Ok(before.saturating_sub(self.windows.len()))
    }
}
