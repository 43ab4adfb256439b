//! User Entity
//!
//! The authenticated principal. The password hash lives in [`Auth`] so a
//! `User` can be handed to any layer without leaking it.
//!
//! [`Auth`]: crate::domain::entity::auth::Auth

use chrono::{DateTime, Utc};

use crate::domain::value_object::{
    UserId, email::Email, user_name::UserName, user_role::UserRole,
};

/// Stored user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: UserName,
    pub email: Email,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        matches!(self.role, UserRole::Admin)
    }
}

/// User about to be stored; the store assigns the id
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: UserName,
    pub email: Email,
    pub role: UserRole,
}

impl NewUser {
    pub fn new(name: UserName, email: Email) -> Self {
        Self {
            name,
            email,
            role: UserRole::default(),
        }
    }

    pub fn with_role(mut self, role: UserRole) -> Self {
        self.role = role;
        self
    }

    /// Materialize with the id and timestamp chosen by the store
    pub fn into_user(self, id: UserId, now: DateTime<Utc>) -> User {
        User {
            id,
            name: self.name,
            email: self.email,
            role: self.role,
            created_at: now,
            updated_at: now,
        }
    }
}
