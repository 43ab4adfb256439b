//! Bearer Tokens
//!
//! Stateless HS256 JWTs. A token is accepted when its signature verifies,
//! it has not expired, and its subject still exists in the user store, in
//! that order. Expiry is checked against the injected clock, not by
//! `jsonwebtoken`.

use std::sync::Arc;

use http::{HeaderMap, header};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use platform::clock::SharedClock;
use serde::{Deserialize, Serialize};

use crate::application::config::AuthConfig;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::UserId;
use crate::error::{AuthError, AuthResult};

const ALGORITHM: Algorithm = Algorithm::HS256;

/// Token payload (times in Unix seconds)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub id: i64,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and verifies bearer tokens
pub struct TokenAuthenticator<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AuthConfig>,
    clock: SharedClock,
}

impl<U> Clone for TokenAuthenticator<U>
where
    U: UserRepository,
{
    fn clone(&self) -> Self {
        Self {
            user_repo: self.user_repo.clone(),
            config: self.config.clone(),
            clock: self.clock.clone(),
        }
    }
}

impl<U> TokenAuthenticator<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>, clock: SharedClock) -> Self {
        Self {
            user_repo,
            config,
            clock,
        }
    }

    /// Sign a token for `user`, valid for the configured TTL
    pub fn issue(&self, user: &User) -> AuthResult<String> {
        let iat = self.clock.now_secs();
        let claims = Claims {
            id: user.id.value(),
            email: user.email.as_str().to_string(),
            iat,
            exp: iat + self.config.token_ttl_secs(),
        };
        self.encode(&claims)
    }

    fn encode(&self, claims: &Claims) -> AuthResult<String> {
        jsonwebtoken::encode(
            &Header::new(ALGORITHM),
            claims,
            &EncodingKey::from_secret(&self.config.token_secret),
        )
        .map_err(|e| AuthError::Internal(e.to_string()))
    }

    /// Check signature and expiry, without touching the store
    pub fn decode(&self, token: &str) -> AuthResult<Claims> {
        let mut validation = Validation::new(ALGORITHM);
        validation.validate_exp = false;

        let claims = jsonwebtoken::decode::<Claims>(
            token,
            &DecodingKey::from_secret(&self.config.token_secret),
            &validation,
        )
        .map_err(|_| AuthError::InvalidToken)?
        .claims;

        if self.clock.now_secs() >= claims.exp {
            return Err(AuthError::ExpiredToken);
        }

        Ok(claims)
    }

    /// Resolve a token to the current user record
    ///
    /// The role comes from the store, never from the token.
    pub async fn verify(&self, token: &str) -> AuthResult<User> {
        let claims = self.decode(token)?;
        self.user_repo
            .find_by_id(UserId::new(claims.id))
            .await?
            .ok_or(AuthError::UnknownPrincipal)
    }

    /// Resolve the bearer token carried by `headers`
    pub async fn verify_headers(&self, headers: &HeaderMap) -> AuthResult<User> {
        let token = bearer_token(headers)?;
        self.verify(token).await
    }
}

/// Extract the token from `Authorization: Bearer <token>`
pub fn bearer_token(headers: &HeaderMap) -> AuthResult<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AuthError::MissingToken)
}
