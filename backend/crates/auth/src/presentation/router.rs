//! Auth Routers
//!
//! Access control is not applied here. The caller wraps each router in the
//! admission layer with the policy of its mount point.

use axum::{
    Router,
    routing::{get, post},
};

use crate::domain::repository::UserRepository;
use crate::presentation::handlers::{self, AuthAppState};

/// `/api/auth`: register, login, me
pub fn auth_router<U>(state: AuthAppState<U>) -> Router
where
    U: UserRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/register", post(handlers::register::<U>))
        .route("/login", post(handlers::login::<U>))
        .route("/me", get(handlers::me))
        .with_state(state)
}

/// `/api/users`: admin user management
pub fn users_router<U>(state: AuthAppState<U>) -> Router
where
    U: UserRepository + Send + Sync + 'static,
{
    Router::new()
        .route(
            "/",
            get(handlers::list_users::<U>).post(handlers::create_user::<U>),
        )
        .route("/{id}", get(handlers::get_user::<U>))
        .with_state(state)
}
