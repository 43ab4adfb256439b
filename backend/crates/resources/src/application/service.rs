//! Resource Service
//!
//! List, get and create for any [`Resource`], on top of the document store.

use std::sync::Arc;

use kernel::id::UserId;

use crate::domain::repository::DocumentRepository;
use crate::domain::resource::{Record, Resource};
use crate::error::{ResourceError, ResourceResult};

pub struct ResourceService<S>
where
    S: DocumentRepository,
{
    store: Arc<S>,
}

impl<S> Clone for ResourceService<S>
where
    S: DocumentRepository,
{
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<S> ResourceService<S>
where
    S: DocumentRepository + Send + Sync,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn list<T: Resource>(&self) -> ResourceResult<Vec<Record<T>>> {
        self.store
            .find_all(T::KIND)
            .await?
            .into_iter()
            .map(Record::from_document)
            .collect()
    }

    pub async fn get<T: Resource>(&self, id: T::Key) -> ResourceResult<Record<T>> {
        let document = self
            .store
            .find_by_id(T::KIND, id.into())
            .await?
            .ok_or(ResourceError::NotFound)?;
        Record::from_document(document)
    }

    /// Validate and store a draft
    pub async fn create<T: Resource>(
        &self,
        draft: T::Draft,
        author: Option<UserId>,
    ) -> ResourceResult<Record<T>> {
        let fields = T::from_draft(draft, author)?;
        self.ensure_references(&fields).await?;

        let document = self
            .store
            .insert(T::KIND, &serde_json::to_value(&fields)?)
            .await?;
        tracing::info!(kind = %T::KIND, id = document.id, "Record created");

        Record::from_document(document)
    }

    /// Store already-validated records in one batch
    pub async fn create_many<T: Resource>(&self, items: &[T]) -> ResourceResult<Vec<Record<T>>> {
        for item in items {
            self.ensure_references(item).await?;
        }
        let bodies = items
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()?;

        self.store
            .bulk_insert(T::KIND, &bodies)
            .await?
            .into_iter()
            .map(Record::from_document)
            .collect()
    }

    pub async fn count<T: Resource>(&self) -> ResourceResult<u64> {
        self.store.count(T::KIND).await
    }

    async fn ensure_references<T: Resource>(&self, fields: &T) -> ResourceResult<()> {
        for reference in fields.references() {
            if self
                .store
                .find_by_id(reference.kind, reference.id)
                .await?
                .is_none()
            {
                return Err(ResourceError::MissingReference(reference.kind));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Comment, CommentDraft, Post, PostDraft, Product};
    use crate::infra::memory::MemoryDocumentRepository;
    use kernel::id::{PostId, ProductId};

    fn service() -> ResourceService<MemoryDocumentRepository> {
        ResourceService::new(Arc::new(MemoryDocumentRepository::new()))
    }

    fn post_draft() -> PostDraft {
        PostDraft {
            title: "A".to_string(),
            body: "B".to_string(),
            user_id: None,
        }
    }

    #[tokio::test]
    async fn test_create_then_get_and_list() {
        let service = service();

        let created = service
            .create::<Post>(post_draft(), Some(UserId::new(1)))
            .await
            .unwrap();
        assert_eq!(created.id, PostId::new(1));
        assert_eq!(created.fields.user_id, Some(UserId::new(1)));

        let fetched = service.get::<Post>(created.id).await.unwrap();
        assert_eq!(fetched.fields, created.fields);

        let all = service.list::<Post>().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(service.count::<Post>().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_missing_record_is_not_found() {
        let service = service();
        assert!(matches!(
            service.get::<Product>(ProductId::new(5)).await,
            Err(ResourceError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_comment_requires_existing_post() {
        let service = service();
        let draft = |post_id| CommentDraft {
            text: "Nice!".to_string(),
            post_id: PostId::new(post_id),
            user_id: None,
        };

        assert!(matches!(
            service.create::<Comment>(draft(1), None).await,
            Err(ResourceError::MissingReference(_))
        ));
        assert_eq!(service.count::<Comment>().await.unwrap(), 0);

        service.create::<Post>(post_draft(), None).await.unwrap();
        let comment = service.create::<Comment>(draft(1), None).await.unwrap();
        assert_eq!(comment.fields.post_id, PostId::new(1));
    }

    #[tokio::test]
    async fn test_ids_are_per_kind() {
        let service = service();
        service
            .create_many(&[Product::new("Widget", 9.99), Product::new("Gadget", 19.99)])
            .await
            .unwrap();
        let post = service.create::<Post>(post_draft(), None).await.unwrap();

        assert_eq!(post.id, PostId::new(1));
        let products = service.list::<Product>().await.unwrap();
        assert_eq!(
            products.iter().map(|p| p.id).collect::<Vec<_>>(),
            vec![ProductId::new(1), ProductId::new(2)]
        );
        assert_eq!(products[1].fields.name, "Gadget");
    }
}
