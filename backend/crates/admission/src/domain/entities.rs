//! Domain Entities

/// Last admitted occurrence of one write fingerprint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceEntry {
    /// When the write was last admitted (Unix ms)
    pub last_seen_ms: i64,
    /// Debounce window of the route that recorded it
    pub window_ms: i64,
}

impl DebounceEntry {
    pub fn new(last_seen_ms: i64, window_ms: i64) -> Self {
        Self {
            last_seen_ms,
            window_ms,
        }
    }

    /// Whether an identical write at `now_ms` is still a duplicate
    pub fn is_live(&self, now_ms: i64) -> bool {
        now_ms - self.last_seen_ms < self.window_ms
    }

    /// Milliseconds left until the window closes
    pub fn remaining_ms(&self, now_ms: i64) -> i64 {
        (self.window_ms - (now_ms - self.last_seen_ms)).max(0)
    }
}

/// Result of recording a fingerprint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceOutcome {
    /// First occurrence in the window; the entry now holds `now`
    Admitted,
    /// Identical write inside the window; the entry is unchanged
    Duplicate { remaining_ms: i64 },
}
