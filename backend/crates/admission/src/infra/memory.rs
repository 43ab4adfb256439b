//! In-Memory Debounce Store

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::domain::entities::{DebounceEntry, DebounceOutcome};
use crate::domain::repository::{DebounceStore, DebounceStoreError};
use crate::domain::value_objects::Fingerprint;

/// Process-local debounce entries
///
/// The entry guard holds the shard lock across check and record, and the
/// sweep re-checks each timestamp under the same lock.
#[derive(Debug, Default)]
pub struct MemoryDebounceStore {
    entries: DashMap<Fingerprint, DebounceEntry>,
}

impl MemoryDebounceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn check_and_record_sync(
        &self,
        fingerprint: Fingerprint,
        window_ms: i64,
        now_ms: i64,
    ) -> DebounceOutcome {
        match self.entries.entry(fingerprint) {
            Entry::Occupied(mut occupied) => {
                let entry = occupied.get_mut();
                if entry.is_live(now_ms) {
                    DebounceOutcome::Duplicate {
                        remaining_ms: entry.remaining_ms(now_ms),
                    }
                } else {
                    *entry = DebounceEntry::new(now_ms, window_ms);
                    DebounceOutcome::Admitted
                }
            }
            Entry::Vacant(vacant) => {
                vacant.insert(DebounceEntry::new(now_ms, window_ms));
                DebounceOutcome::Admitted
            }
        }
    }
}

impl DebounceStore for MemoryDebounceStore {
    async fn check_and_record(
        &self,
        fingerprint: Fingerprint,
        window_ms: i64,
        now_ms: i64,
    ) -> Result<DebounceOutcome, DebounceStoreError> {
        Ok(self.check_and_record_sync(fingerprint, window_ms, now_ms))
    }

    async fn purge_stale(&self, now_ms: i64) -> Result<usize, DebounceStoreError> {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.is_live(now_ms));
        Ok(before.saturating_sub(self.entries.len()))
    }
}
