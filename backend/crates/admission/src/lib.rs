//! Admission Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Route policies, request fingerprints, debounce entries, store trait
//! - `application/` - Rate limiter, debounce guard, admission pipeline
//! - `infra/` - In-memory debounce store and the background sweeper
//! - `presentation/` - axum middleware
//!
//! ## Admission Model
//! Every request passes the same stages in a fixed order and stops at the
//! first rejection:
//! 1. Rate limit (global for every request, then the route group)
//! 2. Bearer token verification (authenticated access classes only)
//! 3. Role check (non-empty role sets only)
//! 4. Debounce of identical writes (routes with a window, mutating methods only)
//!
//! Counters and debounce entries are process-local and lost on restart.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::config::AdmissionConfig;
pub use application::pipeline::{Admission, AdmissionPipeline, GlobalRateLimit};
pub use domain::repository::DebounceStore;
pub use domain::value_objects::{Access, RoutePolicy};
pub use error::{AdmissionResult, Rejection};
pub use infra::memory::MemoryDebounceStore;
pub use infra::sweeper::spawn_sweeper;
pub use presentation::middleware::{AdmissionState, admission_gate, global_rate_limit};
