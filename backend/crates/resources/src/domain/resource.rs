//! Resource Trait
//!
//! Binds a typed record to its table, its id type and its create input.

use std::fmt::Debug;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::domain::repository::StoredDocument;
use crate::domain::value_objects::{Reference, ResourceKind};
use crate::error::ResourceResult;

pub trait Resource: Serialize + DeserializeOwned + Debug + Clone + Send + Sync + 'static {
    const KIND: ResourceKind;

    /// Typed primary key
    type Key: Copy + Debug + FromStr + From<i64> + Into<i64> + Serialize + Send + Sync + 'static;

    /// Body accepted by `POST /`
    type Draft: DeserializeOwned + Send + 'static;

    /// Validate a draft
    ///
    /// `author` is the authenticated user, when there is one. It takes
    /// precedence over any user id in the draft.
    fn from_draft(draft: Self::Draft, author: Option<UserId>) -> ResourceResult<Self>;

    /// Records that must exist before this one is stored
    fn references(&self) -> Vec<Reference> {
        Vec::new()
    }
}

/// A stored resource as returned to clients
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Record<T: Resource> {
    pub id: T::Key,
    #[serde(flatten)]
    pub fields: T,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<T: Resource> Record<T> {
    pub fn from_document(document: StoredDocument) -> ResourceResult<Self> {
        Ok(Self {
            id: T::Key::from(document.id),
            fields: serde_json::from_value(document.body)?,
            created_at: document.created_at,
            updated_at: document.updated_at,
        })
    }
}
