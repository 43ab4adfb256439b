//! Rate Limiter
//!
//! Fixed-window limits per client key. The global limiter counts every
//! request; a route group limiter counts only the requests of its group.

use std::sync::Arc;

use platform::clock::SharedClock;
use platform::rate_limit::{RateLimitConfig, RateLimitStore};

use crate::application::config::AdmissionConfig;
use crate::domain::value_objects::RateLimitStatus;
use crate::error::{AdmissionResult, Rejection};

pub struct RateLimiter<R>
where
    R: RateLimitStore,
{
    store: Arc<R>,
    config: Arc<AdmissionConfig>,
    clock: SharedClock,
}

impl<R> RateLimiter<R>
where
    R: RateLimitStore + Send + Sync,
{
    pub fn new(store: Arc<R>, config: Arc<AdmissionConfig>, clock: SharedClock) -> Self {
        Self {
            store,
            config,
            clock,
        }
    }

    /// Count one request from `client_key`
    ///
    /// The group limiter is only consulted once the global one admits.
    /// The returned status is the tighter of the two.
    pub async fn admit(
        &self,
        client_key: &str,
        group: Option<&str>,
    ) -> AdmissionResult<RateLimitStatus> {
        let global = self.admit_global(client_key).await?;
        self.admit_group(client_key, group, global).await
    }

    /// Count one request against the global limiter only
    pub async fn admit_global(&self, client_key: &str) -> AdmissionResult<RateLimitStatus> {
        self.hit(
            &format!("global:{client_key}"),
            &self.config.global,
            self.clock.now_ms(),
        )
        .await
    }

    /// Count one request against `group`, after the global limiter admitted
    /// it with `global`
    pub async fn admit_group(
        &self,
        client_key: &str,
        group: Option<&str>,
        global: RateLimitStatus,
    ) -> AdmissionResult<RateLimitStatus> {
        let Some(group) = group else {
            return Ok(global);
        };
        let scoped = self
            .hit(
                &format!("group:{group}:{client_key}"),
                self.config.group(group),
                self.clock.now_ms(),
            )
            .await?;

        Ok(global.tighter(scoped))
    }

    async fn hit(
        &self,
        key: &str,
        config: &RateLimitConfig,
        now_ms: i64,
    ) -> AdmissionResult<RateLimitStatus> {
        let decision = self.store.hit(key, config, now_ms).await?;
        let status = RateLimitStatus::from_decision(&decision, now_ms);
        if decision.allowed {
            Ok(status)
        } else {
            Err(Rejection::RateLimitExceeded { status })
        }
    }

    /// Drop expired windows
    pub async fn purge_stale(&self) -> AdmissionResult<usize> {
        Ok(self.store.purge_stale(self.clock.now_ms()).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::clock::ManualClock;
    use platform::rate_limit::MemoryRateLimitStore;
    use std::time::Duration;

    struct Fixture {
        store: Arc<MemoryRateLimitStore>,
        clock: Arc<ManualClock>,
        limiter: RateLimiter<MemoryRateLimitStore>,
    }

    fn fixture(config: AdmissionConfig) -> Fixture {
        let store = Arc::new(MemoryRateLimitStore::new());
        let clock = Arc::new(ManualClock::new(0));
        let limiter = RateLimiter::new(store.clone(), Arc::new(config), clock.clone());
        Fixture {
            store,
            clock,
            limiter,
        }
    }

    #[tokio::test]
    async fn test_limit_then_reset() {
        let f = fixture(AdmissionConfig::new(RateLimitConfig::new(
            2,
            Duration::from_secs(10),
        )));

        assert_eq!(f.limiter.admit("c", None).await.unwrap().remaining, 1);
        assert_eq!(f.limiter.admit("c", None).await.unwrap().remaining, 0);

        f.clock.advance(Duration::from_millis(2_500));
        match f.limiter.admit("c", None).await {
            Err(Rejection::RateLimitExceeded { status }) => {
                assert_eq!(status.limit, 2);
                assert_eq!(status.remaining, 0);
                assert_eq!(status.reset_secs, 8);
            }
            other => panic!("expected rate limit, got {other:?}"),
        }

        f.clock.advance(Duration::from_millis(7_500));
        assert!(f.limiter.admit("c", None).await.is_ok());
    }

    #[tokio::test]
    async fn test_group_is_counted_separately() {
        let config = AdmissionConfig::new(RateLimitConfig::new(10, Duration::from_secs(60)))
            .with_group("auth", RateLimitConfig::new(1, Duration::from_secs(60)));
        let f = fixture(config);

        let status = f.limiter.admit("c", Some("auth")).await.unwrap();
        assert_eq!(status.limit, 1);
        assert_eq!(status.remaining, 0);

        assert!(matches!(
            f.limiter.admit("c", Some("auth")).await,
            Err(Rejection::RateLimitExceeded { .. })
        ));

        // other groups only see the global limiter
        let status = f.limiter.admit("c", Some("api")).await.unwrap();
        assert_eq!(status.limit, 10);
        assert_eq!(status.remaining, 7);
    }

    #[tokio::test]
    async fn test_global_rejection_skips_group() {
        let config = AdmissionConfig::new(RateLimitConfig::new(1, Duration::from_secs(60)));
        let f = fixture(config);

        f.limiter.admit("c", Some("api")).await.unwrap();
        assert!(f.limiter.admit("c", Some("api")).await.is_err());

        assert_eq!(f.store.window("group:api:c").unwrap().count, 1);
    }

    #[tokio::test]
    async fn test_split_admission_counts_each_window_once() {
        let f = fixture(AdmissionConfig::new(RateLimitConfig::new(
            5,
            Duration::from_secs(60),
        )));

        let global = f.limiter.admit_global("c").await.unwrap();
        assert_eq!(global.remaining, 4);
        let status = f.limiter.admit_group("c", Some("api"), global).await.unwrap();
        assert_eq!(status.remaining, 4);

        assert_eq!(f.store.window("global:c").unwrap().count, 1);
        assert_eq!(f.store.window("group:api:c").unwrap().count, 1);

        let status = f.limiter.admit_group("c", None, global).await.unwrap();
        assert_eq!(status, global);
        assert_eq!(f.store.window("global:c").unwrap().count, 1);
    }

    #[tokio::test]
    async fn test_purge_stale_windows() {
        let f = fixture(AdmissionConfig::new(RateLimitConfig::new(
            5,
            Duration::from_secs(1),
        )));
        f.limiter.admit("a", Some("api")).await.unwrap();
        assert_eq!(f.store.len(), 2);

        f.clock.advance(Duration::from_secs(1));
        assert_eq!(f.limiter.purge_stale().await.unwrap(), 2);
        assert!(f.store.is_empty());
    }
}
