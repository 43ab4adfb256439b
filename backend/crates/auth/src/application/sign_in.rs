//! Sign In Use Case
//!
//! Checks email and password and issues a bearer token.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::token::TokenAuthenticator;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{email::Email, user_password::RawPassword};
use crate::error::{AuthError, AuthResult};

/// Sign in input
pub struct SignInInput {
    pub email: String,
    pub password: String,
}

/// Sign in output
pub struct SignInOutput {
    pub token: String,
    pub user: User,
}

/// Sign in use case
pub struct SignInUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    authenticator: TokenAuthenticator<U>,
    config: Arc<AuthConfig>,
}

impl<U> SignInUseCase<U>
where
    U: UserRepository,
{
    pub fn new(
        user_repo: Arc<U>,
        authenticator: TokenAuthenticator<U>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            user_repo,
            authenticator,
            config,
        }
    }

    /// Every failure before the token is issued reads as
    /// [`AuthError::InvalidCredentials`], so callers cannot probe which
    /// emails exist.
    pub async fn execute(&self, input: SignInInput) -> AuthResult<SignInOutput> {
        let email = Email::new(&input.email).map_err(|_| AuthError::InvalidCredentials)?;
        let raw_password = RawPassword::attempt(input.password);

        let user = self
            .user_repo
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let auth = self
            .user_repo
            .find_auth(user.id)
            .await?
            .ok_or_else(|| AuthError::Internal("Auth not found".to_string()))?;

        if !auth.password_hash.verify(&raw_password, self.config.pepper()) {
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.authenticator.issue(&user)?;

        tracing::info!(user_id = %user.id, "User signed in");

        Ok(SignInOutput { token, user })
    }
}
