//! Resource Router

use axum::{Router, routing::get};

use crate::domain::repository::DocumentRepository;
use crate::domain::resource::Resource;
use crate::presentation::handlers::{self, ResourceAppState};

/// `GET /`, `GET /{id}` and `POST /` for one resource kind
pub fn resource_router<T, S>(state: ResourceAppState<S>) -> Router
where
    T: Resource,
    S: DocumentRepository + Send + Sync + 'static,
{
    Router::new()
        .route(
            "/",
            get(handlers::list::<T, S>).post(handlers::create::<T, S>),
        )
        .route("/{id}", get(handlers::get::<T, S>))
        .with_state(state)
}
