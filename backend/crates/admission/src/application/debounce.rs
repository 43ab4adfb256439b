//! Debounce Guard
//!
//! Rejects a write whose (client, path, body) matches one admitted less than
//! a window ago. Bodies are compared in canonical form, so JSON key order
//! does not matter.

use std::sync::Arc;
use std::time::Duration;

use platform::clock::SharedClock;

use crate::domain::entities::DebounceOutcome;
use crate::domain::repository::DebounceStore;
use crate::domain::services::{canonical_json, ceil_secs};
use crate::domain::value_objects::Fingerprint;
use crate::error::{AdmissionResult, Rejection};

pub struct DebounceGuard<D>
where
    D: DebounceStore,
{
    store: Arc<D>,
    clock: SharedClock,
}

impl<D> DebounceGuard<D>
where
    D: DebounceStore + Send + Sync,
{
    pub fn new(store: Arc<D>, clock: SharedClock) -> Self {
        Self { store, clock }
    }

    pub async fn check(
        &self,
        client_key: &str,
        path: &str,
        body: &[u8],
        window: Duration,
    ) -> AdmissionResult<()> {
        let canonical = canonical_json(body)?;
        let fingerprint = Fingerprint::compute(client_key, path, &canonical);
        let window_ms = window.as_millis() as i64;

        match self
            .store
            .check_and_record(fingerprint, window_ms, self.clock.now_ms())
            .await?
        {
            DebounceOutcome::Admitted => Ok(()),
            DebounceOutcome::Duplicate { remaining_ms } => Err(Rejection::DuplicateRequest {
                retry_after_secs: ceil_secs(remaining_ms),
            }),
        }
    }

    /// Drop entries whose window has passed
    pub async fn purge_stale(&self) -> AdmissionResult<usize> {
        Ok(self.store.purge_stale(self.clock.now_ms()).await?)
    }
}
