//! HTTP Handlers

use std::sync::Arc;

use auth::CurrentUser;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use kernel::extract::JsonBody;

use crate::application::ResourceService;
use crate::domain::repository::DocumentRepository;
use crate::domain::resource::{Record, Resource};
use crate::error::{ResourceError, ResourceResult};

/// Shared state for resource handlers
pub struct ResourceAppState<S>
where
    S: DocumentRepository,
{
    pub service: ResourceService<S>,
}

impl<S> ResourceAppState<S>
where
    S: DocumentRepository + Send + Sync,
{
    pub fn new(store: Arc<S>) -> Self {
        Self {
            service: ResourceService::new(store),
        }
    }
}

impl<S> Clone for ResourceAppState<S>
where
    S: DocumentRepository,
{
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
        }
    }
}

/// GET /
pub async fn list<T, S>(
    State(state): State<ResourceAppState<S>>,
) -> ResourceResult<Json<Vec<Record<T>>>>
where
    T: Resource,
    S: DocumentRepository + Send + Sync,
{
    Ok(Json(state.service.list::<T>().await?))
}

/// GET /{id}
///
/// Ids that do not parse are reported as missing records.
pub async fn get<T, S>(
    State(state): State<ResourceAppState<S>>,
    Path(id): Path<String>,
) -> ResourceResult<Json<Record<T>>>
where
    T: Resource,
    S: DocumentRepository + Send + Sync,
{
    let id = id.parse::<T::Key>().map_err(|_| ResourceError::NotFound)?;
    Ok(Json(state.service.get::<T>(id).await?))
}

/// POST /
pub async fn create<T, S>(
    State(state): State<ResourceAppState<S>>,
    user: Option<CurrentUser>,
    JsonBody(draft): JsonBody<T::Draft>,
) -> ResourceResult<(StatusCode, Json<Record<T>>)>
where
    T: Resource,
    S: DocumentRepository + Send + Sync,
{
    let author = user.map(|CurrentUser(user)| user.id);
    let record = state.service.create::<T>(draft, author).await?;
    Ok((StatusCode::CREATED, Json(record)))
}
