//! Presentation Layer
//!
//! axum middleware for the admission pipeline.

pub mod middleware;
