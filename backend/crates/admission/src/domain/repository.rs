//! Repository Traits
//!
//! Interfaces for admission state. Implementation is in infrastructure layer.
//! The rate limit counterpart lives in `platform::rate_limit`.

use crate::domain::entities::DebounceOutcome;
use crate::domain::value_objects::Fingerprint;

#[derive(Debug, thiserror::Error)]
pub enum DebounceStoreError {
    #[error("Debounce backend unavailable: {0}")]
    Unavailable(String),
}

/// Debounce entry storage
///
/// `check_and_record` must be atomic per fingerprint: of two concurrent
/// identical writes, exactly one is admitted.
#[trait_variant::make(DebounceStore: Send)]
pub trait LocalDebounceStore {
    /// Admit and record `now_ms`, unless a live entry exists
    ///
    /// A rejected duplicate does not refresh the entry. A stale entry is
    /// treated as absent and overwritten.
    async fn check_and_record(
        &self,
        fingerprint: Fingerprint,
        window_ms: i64,
        now_ms: i64,
    ) -> Result<DebounceOutcome, DebounceStoreError>;

    /// Drop entries whose window has passed, returning how many were removed
    async fn purge_stale(&self, now_ms: i64) -> Result<usize, DebounceStoreError>;
}
