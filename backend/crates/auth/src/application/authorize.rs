//! Role Authorization

use crate::domain::entity::user::User;
use crate::domain::value_object::user_role::RoleSet;
use crate::error::{AuthError, AuthResult};

/// Gate on the role of an already authenticated user
#[derive(Debug, Clone, Copy, Default)]
pub struct RoleAuthorizer;

impl RoleAuthorizer {
    /// An empty `allowed` set admits every authenticated user.
    pub fn authorize(principal: &User, allowed: RoleSet) -> AuthResult<()> {
        if allowed.is_empty() || allowed.contains(principal.role) {
            Ok(())
        } else {
            Err(AuthError::Forbidden)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::user::NewUser;
    use crate::domain::value_object::{
        UserId, email::Email, user_name::UserName, user_role::UserRole,
    };

    fn user_with(role: UserRole) -> User {
        NewUser::new(
            UserName::new("Alice").unwrap(),
            Email::new("alice@example.com").unwrap(),
        )
        .with_role(role)
        .into_user(UserId::new(1), chrono::Utc::now())
    }

    #[test]
    fn test_role_in_set_passes() {
        assert!(RoleAuthorizer::authorize(&user_with(UserRole::Admin), RoleSet::ADMIN).is_ok());
        assert!(RoleAuthorizer::authorize(&user_with(UserRole::User), RoleSet::MEMBERS).is_ok());
    }

    #[test]
    fn test_role_outside_set_is_forbidden() {
        assert!(matches!(
            RoleAuthorizer::authorize(&user_with(UserRole::User), RoleSet::ADMIN),
            Err(AuthError::Forbidden)
        ));
    }

    #[test]
    fn test_empty_set_admits_anyone_authenticated() {
        for role in UserRole::ALL {
            assert!(RoleAuthorizer::authorize(&user_with(role), RoleSet::EMPTY).is_ok());
        }
    }
}
