//! PostgreSQL Repository Implementation
//!
//! One table per kind: `(id BIGSERIAL, body JSONB, created_at, updated_at)`.
//! Table names come from [`ResourceKind::table`], never from input.

use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::PgPool;
use sqlx::types::Json;

use crate::domain::repository::{DocumentRepository, StoredDocument};
use crate::domain::value_objects::ResourceKind;
use crate::error::ResourceResult;

const COLUMNS: &str = "id, body, created_at, updated_at";

/// PostgreSQL-backed document store
#[derive(Clone)]
pub struct PgDocumentRepository {
    pool: PgPool,
}

impl PgDocumentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn insert_sql(kind: ResourceKind) -> String {
    format!(
        "INSERT INTO {} (body) VALUES ($1) RETURNING {COLUMNS}",
        kind.table()
    )
}

impl DocumentRepository for PgDocumentRepository {
    async fn insert(&self, kind: ResourceKind, body: &Value) -> ResourceResult<StoredDocument> {
        let row = sqlx::query_as::<_, DocumentRow>(&insert_sql(kind))
            .bind(Json(body))
            .fetch_one(&self.pool)
            .await?;

        Ok(row.into())
    }

    async fn find_by_id(
        &self,
        kind: ResourceKind,
        id: i64,
    ) -> ResourceResult<Option<StoredDocument>> {
        let row = sqlx::query_as::<_, DocumentRow>(&format!(
            "SELECT {COLUMNS} FROM {} WHERE id = $1",
            kind.table()
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn find_all(&self, kind: ResourceKind) -> ResourceResult<Vec<StoredDocument>> {
        let rows = sqlx::query_as::<_, DocumentRow>(&format!(
            "SELECT {COLUMNS} FROM {} ORDER BY id",
            kind.table()
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count(&self, kind: ResourceKind) -> ResourceResult<u64> {
        let count =
            sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {}", kind.table()))
                .fetch_one(&self.pool)
                .await?;

        Ok(count as u64)
    }

    async fn bulk_insert(
        &self,
        kind: ResourceKind,
        bodies: &[Value],
    ) -> ResourceResult<Vec<StoredDocument>> {
        let sql = insert_sql(kind);
        let mut tx = self.pool.begin().await?;

        let mut documents = Vec::with_capacity(bodies.len());
        for body in bodies {
            let row = sqlx::query_as::<_, DocumentRow>(&sql)
                .bind(Json(body))
                .fetch_one(&mut *tx)
                .await?;
            documents.push(row.into());
        }

        tx.commit().await?;
        Ok(documents)
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct DocumentRow {
    id: i64,
    body: Json<Value>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<DocumentRow> for StoredDocument {
    fn from(row: DocumentRow) -> Self {
        Self {
            id: row.id,
            body: row.body.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
