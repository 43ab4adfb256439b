//! In-Memory Repository
//!
//! Used when no database is configured, and by tests.

use std::collections::BTreeMap;

use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::entity::{
    auth::Auth,
    user::{NewUser, User},
};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    UserId, email::Email, user_password::UserPassword, user_role::UserRole,
};
use crate::error::{AuthError, AuthResult};

#[derive(Default)]
struct Tables {
    last_id: i64,
    users: BTreeMap<UserId, (User, Auth)>,
}

/// Process-local user store
#[derive(Default)]
pub struct MemoryUserRepository {
    tables: RwLock<Tables>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserRepository for MemoryUserRepository {
    async fn create(&self, user: &NewUser, password: &UserPassword) -> AuthResult<User> {
        let mut tables = self.tables.write().await;

        if tables.users.values().any(|(u, _)| u.email == user.email) {
            return Err(AuthError::EmailTaken);
        }

        tables.last_id += 1;
        let id = UserId::new(tables.last_id);
        let stored = user.clone().into_user(id, Utc::now());
        let auth = Auth::new(id, password.clone());
        tables.users.insert(id, (stored.clone(), auth));

        Ok(stored)
    }

    async fn find_by_id(&self, id: UserId) -> AuthResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.get(&id).map(|(u, _)| u.clone()))
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|(u, _)| &u.email == email)
            .map(|(u, _)| u.clone()))
    }

    async fn find_auth(&self, id: UserId) -> AuthResult<Option<Auth>> {
        let tables = self.tables.read().await;
        Ok(tables.users.get(&id).map(|(_, a)| a.clone()))
    }

    async fn find_all(&self) -> AuthResult<Vec<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().map(|(u, _)| u.clone()).collect())
    }

    async fn count(&self) -> AuthResult<u64> {
        let tables = self.tables.read().await;
        Ok(tables.users.len() as u64)
    }

    async fn update_role(&self, id: UserId, role: UserRole) -> AuthResult<Option<User>> {
        let mut tables = self.tables.write().await;
        Ok(tables.users.get_mut(&id).map(|(u, _)| {
            u.role = role;
            u.updated_at = Utc::now();
            u.clone()
        }))
    }
}
