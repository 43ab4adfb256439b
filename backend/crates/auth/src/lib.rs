//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Users, credentials, roles, repository trait
//! - `application/` - Sign up, sign in, bearer tokens, role checks
//! - `infra/` - PostgreSQL and in-memory user stores
//! - `presentation/` - HTTP handlers, DTOs, routers, principal extractor
//!
//! ## Security Model
//! - Passwords hashed with Argon2id (NIST SP 800-63B style policy)
//! - Stateless HS256 bearer tokens, valid for 7 days by default
//! - The role is re-read from the store on every request
//! - Roles: `admin` and `user`

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::config::AuthConfig;
pub use application::{RoleAuthorizer, TokenAuthenticator};
pub use domain::entity::user::User;
pub use domain::repository::UserRepository;
pub use domain::value_object::user_role::{RoleSet, UserRole};
pub use error::{AuthError, AuthResult};
pub use infra::{MemoryUserRepository, PgUserRepository};
pub use presentation::{AuthAppState, CurrentUser, auth_router, users_router};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
