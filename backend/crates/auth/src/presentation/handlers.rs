//! HTTP Handlers

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use kernel::extract::JsonBody;
use kernel::id::UserId;
use platform::clock::SharedClock;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::{
    SignInInput, SignInUseCase, SignUpInput, SignUpUseCase, TokenAuthenticator,
};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::user_role::UserRole;
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    CreateUserRequest, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse,
    UserResponse,
};
use crate::presentation::extract::CurrentUser;

/// Shared state for auth handlers
pub struct AuthAppState<U>
where
    U: UserRepository,
{
    pub repo: Arc<U>,
    pub config: Arc<AuthConfig>,
    pub authenticator: TokenAuthenticator<U>,
}

impl<U> AuthAppState<U>
where
    U: UserRepository,
{
    pub fn new(repo: Arc<U>, config: Arc<AuthConfig>, clock: SharedClock) -> Self {
        let authenticator = TokenAuthenticator::new(repo.clone(), config.clone(), clock);
        Self {
            repo,
            config,
            authenticator,
        }
    }
}

impl<U> Clone for AuthAppState<U>
where
    U: UserRepository,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            config: self.config.clone(),
            authenticator: self.authenticator.clone(),
        }
    }
}

// ============================================================================
// Register / Login
// ============================================================================

/// POST /api/auth/register
pub async fn register<U>(
    State(state): State<AuthAppState<U>>,
    JsonBody(req): JsonBody<RegisterRequest>,
) -> AuthResult<(StatusCode, Json<RegisterResponse>)>
where
    U: UserRepository + Send + Sync + 'static,
{
    let use_case = SignUpUseCase::new(state.repo.clone(), state.config.clone());

    let user = use_case
        .execute(SignUpInput {
            name: req.name,
            email: req.email,
            password: req.password,
            role: UserRole::User,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(RegisterResponse::from(&user))))
}

/// POST /api/auth/login
pub async fn login<U>(
    State(state): State<AuthAppState<U>>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> AuthResult<Json<LoginResponse>>
where
    U: UserRepository + Send + Sync + 'static,
{
    let use_case = SignInUseCase::new(
        state.repo.clone(),
        state.authenticator.clone(),
        state.config.clone(),
    );

    let output = use_case
        .execute(SignInInput {
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok(Json(LoginResponse {
        token: output.token,
    }))
}

/// GET /api/auth/me
pub async fn me(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(UserResponse::from(user))
}

// ============================================================================
// User Management (admin)
// ============================================================================

/// GET /api/users
pub async fn list_users<U>(State(state): State<AuthAppState<U>>) -> AuthResult<Json<Vec<UserResponse>>>
where
    U: UserRepository + Send + Sync + 'static,
{
    let users = state.repo.find_all().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// GET /api/users/{id}
pub async fn get_user<U>(
    State(state): State<AuthAppState<U>>,
    Path(id): Path<String>,
) -> AuthResult<Json<UserResponse>>
where
    U: UserRepository + Send + Sync + 'static,
{
    // a malformed id cannot match any row
    let id: UserId = id.parse().map_err(|_| AuthError::UserNotFound)?;

    let user = state
        .repo
        .find_by_id(id)
        .await?
        .ok_or(AuthError::UserNotFound)?;

    Ok(Json(UserResponse::from(user)))
}

/// POST /api/users
pub async fn create_user<U>(
    State(state): State<AuthAppState<U>>,
    JsonBody(req): JsonBody<CreateUserRequest>,
) -> AuthResult<(StatusCode, Json<UserResponse>)>
where
    U: UserRepository + Send + Sync + 'static,
{
    let use_case = SignUpUseCase::new(state.repo.clone(), state.config.clone());

    let user = use_case
        .execute(SignUpInput {
            name: req.name,
            email: req.email,
            password: req.password,
            role: req.role.unwrap_or_default(),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}
