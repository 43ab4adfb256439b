//! Shared Kernel - Domain-crossing minimal core
//!
//! This crate contains the "smallest core" of domain vocabulary:
//! - The unified error type and its problem-JSON rendering
//! - Typed primary keys for every stored record
//! - The JSON body extractor shared by all handlers
//!
//! **Design Principle**: Only include things that are "hard to change"
//! and have consistent meaning across all domains.

pub mod error {
    pub mod app_error;
    pub mod kind;
    #[cfg(feature = "axum")]
    pub mod response;
}
#[cfg(feature = "axum")]
pub mod extract;
pub mod id;
