//! Application Layer - Admission stages
//!
//! This layer orchestrates domain logic and infrastructure.

pub mod config;
pub mod debounce;
pub mod pipeline;
pub mod rate_limiter;

// Re-exports
pub use config::AdmissionConfig;
pub use debounce::DebounceGuard;
pub use pipeline::{Admission, AdmissionPipeline, SweepReport};
pub use rate_limiter::RateLimiter;
