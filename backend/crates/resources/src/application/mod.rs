//! Application Layer
//!
//! Generic use cases shared by every resource kind.

pub mod service;

pub use service::ResourceService;
