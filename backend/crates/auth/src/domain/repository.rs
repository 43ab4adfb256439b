//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use crate::domain::entity::{
    auth::Auth,
    user::{NewUser, User},
};
use crate::domain::value_object::{
    UserId, email::Email, user_password::UserPassword, user_role::UserRole,
};
use crate::error::AuthResult;

/// User store
///
/// `create` must fail with [`AuthError::EmailTaken`] when the email is
/// already registered.
///
/// [`AuthError::EmailTaken`]: crate::error::AuthError::EmailTaken
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Store a user together with its credentials
    async fn create(&self, user: &NewUser, password: &UserPassword) -> AuthResult<User>;

    async fn find_by_id(&self, id: UserId) -> AuthResult<Option<User>>;

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    /// Load the credentials of a user
    async fn find_auth(&self, id: UserId) -> AuthResult<Option<Auth>>;

    /// All users ordered by id
    async fn find_all(&self) -> AuthResult<Vec<User>>;

    async fn count(&self) -> AuthResult<u64>;

    /// Change the role of a user, returning the updated record
    async fn update_role(&self, id: UserId, role: UserRole) -> AuthResult<Option<User>>;
}
