//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.
//! Records are stored as JSON documents, one table per [`ResourceKind`].

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::domain::value_objects::ResourceKind;
use crate::error::ResourceResult;

/// One stored row
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: i64,
    pub body: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Document store
#[trait_variant::make(DocumentRepository: Send)]
pub trait LocalDocumentRepository {
    /// Store `body` under the next id of `kind`
    async fn insert(&self, kind: ResourceKind, body: &Value) -> ResourceResult<StoredDocument>;

    async fn find_by_id(&self, kind: ResourceKind, id: i64)
    -> ResourceResult<Option<StoredDocument>>;

    /// All documents of `kind`, by ascending id
    async fn find_all(&self, kind: ResourceKind) -> ResourceResult<Vec<StoredDocument>>;

    async fn count(&self, kind: ResourceKind) -> ResourceResult<u64>;

    /// Store every body or none of them
    async fn bulk_insert(
        &self,
        kind: ResourceKind,
        bodies: &[Value],
    ) -> ResourceResult<Vec<StoredDocument>>;
}
