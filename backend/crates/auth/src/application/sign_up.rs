//! Sign Up Use Case
//!
//! Creates a new user account. Public registration always yields the
//! `user` role; only admins may pick another one.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::entity::user::{NewUser, User};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    email::Email,
    user_name::UserName,
    user_password::{RawPassword, UserPassword},
    user_role::UserRole,
};
use crate::error::{AuthError, AuthResult};

/// Sign up input
pub struct SignUpInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
}

/// Sign up use case
pub struct SignUpUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AuthConfig>,
}

impl<U> SignUpUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self { user_repo, config }
    }

    pub async fn execute(&self, input: SignUpInput) -> AuthResult<User> {
        let name = UserName::new(&input.name).map_err(|e| AuthError::validation(e.to_string()))?;
        let email = Email::new(&input.email).map_err(|e| AuthError::validation(e.to_string()))?;

        if self.user_repo.find_by_email(&email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let raw_password = RawPassword::new(input.password)?;
        let password_hash = UserPassword::from_raw(&raw_password, self.config.pepper())?;

        // the store re-checks uniqueness, so a concurrent sign up still fails
        let user = self
            .user_repo
            .create(&NewUser::new(name, email).with_role(input.role), &password_hash)
            .await?;

        tracing::info!(
            user_id = %user.id,
            role = %user.role,
            "User registered"
        );

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::memory::MemoryUserRepository;

    fn use_case() -> (Arc<MemoryUserRepository>, SignUpUseCase<MemoryUserRepository>) {
        let repo = Arc::new(MemoryUserRepository::new());
        let use_case = SignUpUseCase::new(repo.clone(), Arc::new(AuthConfig::new("s")));
        (repo, use_case)
    }

    fn input(email: &str, password: &str) -> SignUpInput {
        SignUpInput {
            name: "Alice".to_string(),
            email: email.to_string(),
            password: password.to_string(),
            role: UserRole::User,
        }
    }

    #[tokio::test]
    async fn test_sign_up_stores_user_and_hash() {
        let (repo, use_case) = use_case();
        let user = use_case
            .execute(input("Alice@Example.com", "pw123456"))
            .await
            .unwrap();

        assert_eq!(user.email.as_str(), "alice@example.com");
        assert_eq!(user.role, UserRole::User);

        let auth = repo.find_auth(user.id).await.unwrap().unwrap();
        assert!(auth.password_hash.as_phc_string().starts_with("$argon2id$"));
        assert!(
            auth.password_hash
                .verify(&RawPassword::attempt("pw123456".to_string()), None)
        );
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let (_, use_case) = use_case();
        use_case
            .execute(input("alice@example.com", "pw123456"))
            .await
            .unwrap();

        let result = use_case.execute(input("ALICE@example.com", "pw654321x")).await;
        assert!(matches!(result, Err(AuthError::EmailTaken)));
    }

    #[tokio::test]
    async fn test_invalid_input_is_validation_error() {
        let (repo, use_case) = use_case();

        let result = use_case.execute(input("not-an-email", "pw123456")).await;
        assert!(matches!(result, Err(AuthError::Validation { .. })));

        let result = use_case.execute(input("bob@example.com", "12345678")).await;
        assert!(matches!(result, Err(AuthError::Validation { .. })));

        assert_eq!(repo.count().await.unwrap(), 0);
    }
}
