//! In-Memory Repository
//!
//! Used when no database is configured, and by tests.

use std::collections::{BTreeMap, HashMap};

use chrono::Utc;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::domain::repository::{DocumentRepository, StoredDocument};
use crate::domain::value_objects::ResourceKind;
use crate::error::ResourceResult;

#[derive(Default)]
struct Table {
    last_id: i64,
    rows: BTreeMap<i64, StoredDocument>,
}

impl Table {
    fn insert(&mut self, body: &Value) -> StoredDocument {
        self.last_id += 1;
        let now = Utc::now();
        let document = StoredDocument {
            id: self.last_id,
            body: body.clone(),
            created_at: now,
            updated_at: now,
        };
        self.rows.insert(document.id, document.clone());
        document
    }
}

/// Process-local document store
#[derive(Default)]
pub struct MemoryDocumentRepository {
    tables: RwLock<HashMap<ResourceKind, Table>>,
}

impl MemoryDocumentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentRepository for MemoryDocumentRepository {
    async fn insert(&self, kind: ResourceKind, body: &Value) -> ResourceResult<StoredDocument> {
        let mut tables = self.tables.write().await;
        Ok(tables.entry(kind).or_default().insert(body))
    }

    async fn find_by_id(
        &self,
        kind: ResourceKind,
        id: i64,
    ) -> ResourceResult<Option<StoredDocument>> {
        let tables = self.tables.read().await;
        Ok(tables.get(&kind).and_then(|t| t.rows.get(&id)).cloned())
    }

    async fn find_all(&self, kind: ResourceKind) -> ResourceResult<Vec<StoredDocument>> {
        let tables = self.tables.read().await;
        Ok(tables
            .get(&kind)
            .map(|t| t.rows.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn count(&self, kind: ResourceKind) -> ResourceResult<u64> {
        let tables = self.tables.read().await;
        Ok(tables.get(&kind).map_or(0, |t| t.rows.len() as u64))
    }

    async fn bulk_insert(
        &self,
        kind: ResourceKind,
        bodies: &[Value],
    ) -> ResourceResult<Vec<StoredDocument>> {
        let mut tables = self.tables.write().await;
        let table = tables.entry(kind).or_default();
        Ok(bodies.iter().map(|body| table.insert(body)).collect())
    }
}
