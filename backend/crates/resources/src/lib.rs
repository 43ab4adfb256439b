//! Resources Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Posts, comments, products, orders and the document store trait
//! - `application/` - Generic list / get / create
//! - `infra/` - PostgreSQL (JSONB) and in-memory document stores
//! - `presentation/` - Generic handlers and the per-resource router
//!
//! Access control is applied by the admission layer at each mount point.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::ResourceService;
pub use domain::entities::{Comment, Order, Post, Product};
pub use domain::repository::{DocumentRepository, StoredDocument};
pub use domain::resource::{Record, Resource};
pub use domain::value_objects::ResourceKind;
pub use error::{ResourceError, ResourceResult};
pub use infra::{MemoryDocumentRepository, PgDocumentRepository};
pub use presentation::{ResourceAppState, resource_router};
