//! Auth Entity
//!
//! Credentials of a user, kept apart from [`User`] so the hash never
//! travels with the profile.
//!
//! [`User`]: crate::domain::entity::user::User

use crate::domain::value_object::{UserId, user_password::UserPassword};

#[derive(Debug, Clone)]
pub struct Auth {
    pub user_id: UserId,
    pub password_hash: UserPassword,
}

impl Auth {
    pub fn new(user_id: UserId, password_hash: UserPassword) -> Self {
        Self {
            user_id,
            password_hash,
        }
    }
}
