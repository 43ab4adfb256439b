//! Presentation Layer
//!
//! Generic HTTP handlers and the per-resource router.

pub mod handlers;
pub mod router;

pub use handlers::ResourceAppState;
pub use router::resource_router;
