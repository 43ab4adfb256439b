//! Router Assembly
//!
//! Every request passes the global rate limiter. Each mount is then wrapped
//! in the admission layer with its own policy.

use std::sync::Arc;
use std::time::Duration;

use admission::application::config::DEFAULT_BODY_LIMIT;
use admission::presentation::middleware::{RATELIMIT_LIMIT, RATELIMIT_REMAINING, RATELIMIT_RESET};
use admission::{
    Access, AdmissionConfig, AdmissionPipeline, AdmissionState, MemoryDebounceStore, RoutePolicy,
    admission_gate, global_rate_limit,
};
use auth::{AuthAppState, AuthConfig, RoleSet, UserRepository, auth_router, users_router};
use axum::http::{HeaderValue, Method, header};
use axum::{Router, middleware};
use platform::clock::SharedClock;
use platform::rate_limit::MemoryRateLimitStore;
use resources::{
    Comment, DocumentRepository, Order, Post, Product, ResourceAppState, resource_router,
};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer, ExposeHeaders};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::health::health_router;

// ============================================================================
// Route Policies
// ============================================================================

/// register and login are public, `/me` needs a token
pub const AUTH_POLICY: RoutePolicy = RoutePolicy::public("auth")
    .read(Access::authenticated())
    .rate_limit_group("auth");

pub const USERS_POLICY: RoutePolicy = RoutePolicy::public("users")
    .access(Access::roles(RoleSet::ADMIN))
    .rate_limit_group("api");

pub const POSTS_POLICY: RoutePolicy = RoutePolicy::public("posts")
    .write(Access::authenticated())
    .debounce(Duration::from_millis(3000))
    .rate_limit_group("api");

pub const COMMENTS_POLICY: RoutePolicy = RoutePolicy::public("comments")
    .write(Access::authenticated())
    .debounce(Duration::from_millis(3000))
    .rate_limit_group("api");

pub const PRODUCTS_POLICY: RoutePolicy = RoutePolicy::public("products")
    .debounce(Duration::from_millis(2000))
    .rate_limit_group("api");

pub const ORDERS_POLICY: RoutePolicy = RoutePolicy::public("orders")
    .access(Access::roles(RoleSet::MEMBERS))
    .debounce(Duration::from_millis(5000))
    .rate_limit_group("api");

pub const HEALTH_POLICY: RoutePolicy = RoutePolicy::public("health");

pub const ROUTE_POLICIES: [RoutePolicy; 7] = [
    AUTH_POLICY,
    USERS_POLICY,
    POSTS_POLICY,
    COMMENTS_POLICY,
    PRODUCTS_POLICY,
    ORDERS_POLICY,
    HEALTH_POLICY,
];

/// Shortest debounce window of any mount; the sweeper must tick at least
/// this often
pub fn shortest_debounce_window() -> Option<Duration> {
    ROUTE_POLICIES
        .iter()
        .filter_map(|policy| policy.debounce_window)
        .min()
}

// ============================================================================
// Application Context
// ============================================================================

/// Everything the routers share
pub struct AppContext<U, S>
where
    U: UserRepository,
    S: DocumentRepository,
{
    pub auth: AuthAppState<U>,
    pub resources: ResourceAppState<S>,
    pub pipeline: Arc<AdmissionPipeline<U>>,
}

impl<U, S> AppContext<U, S>
where
    U: UserRepository + Send + Sync + 'static,
    S: DocumentRepository + Send + Sync + 'static,
{
    pub fn new(
        users: Arc<U>,
        documents: Arc<S>,
        auth_config: AuthConfig,
        admission_config: AdmissionConfig,
        clock: SharedClock,
    ) -> Self {
        let auth = AuthAppState::new(users, Arc::new(auth_config), clock.clone());
        let pipeline = AdmissionPipeline::new(
            admission_config,
            auth.authenticator.clone(),
            Arc::new(MemoryRateLimitStore::new()),
            Arc::new(MemoryDebounceStore::new()),
            clock,
        );

        Self {
            auth,
            resources: ResourceAppState::new(documents),
            pipeline: Arc::new(pipeline),
        }
    }
}

// ============================================================================
// Router
// ============================================================================

/// Build the full application router
///
/// `frontend_origins` restricts CORS. An empty list allows any origin
/// without credentials.
pub fn build_router<U, S>(ctx: &AppContext<U, S>, frontend_origins: &[String]) -> Router
where
    U: UserRepository + Send + Sync + 'static,
    S: DocumentRepository + Send + Sync + 'static,
{
    let gate = |router: Router, policy: RoutePolicy| {
        router.route_layer(middleware::from_fn_with_state(
            AdmissionState::new(ctx.pipeline.clone(), policy),
            admission_gate::<U, MemoryRateLimitStore, MemoryDebounceStore>,
        ))
    };
    let resources = &ctx.resources;

    Router::new()
        .nest("/api/auth", gate(auth_router(ctx.auth.clone()), AUTH_POLICY))
        .nest("/api/users", gate(users_router(ctx.auth.clone()), USERS_POLICY))
        .nest(
            "/api/posts",
            gate(resource_router::<Post, S>(resources.clone()), POSTS_POLICY),
        )
        .nest(
            "/api/comments",
            gate(resource_router::<Comment, S>(resources.clone()), COMMENTS_POLICY),
        )
        .nest(
            "/api/products",
            gate(resource_router::<Product, S>(resources.clone()), PRODUCTS_POLICY),
        )
        .nest(
            "/api/orders",
            gate(resource_router::<Order, S>(resources.clone()), ORDERS_POLICY),
        )
        .merge(gate(health_router(), HEALTH_POLICY))
        .layer(middleware::from_fn_with_state(
            ctx.pipeline.clone(),
            global_rate_limit::<U, MemoryRateLimitStore, MemoryDebounceStore>,
        ))
        .layer(RequestBodyLimitLayer::new(DEFAULT_BODY_LIMIT))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(frontend_origins))
}

fn cors_layer(frontend_origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .expose_headers(ExposeHeaders::list([
            header::RETRY_AFTER,
            RATELIMIT_LIMIT,
            RATELIMIT_REMAINING,
            RATELIMIT_RESET,
        ]));

    let allowed_origins: Vec<HeaderValue> = frontend_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    if allowed_origins.is_empty() {
        cors.allow_origin(AllowOrigin::any())
    } else {
        cors.allow_origin(allowed_origins).allow_credentials(true)
    }
}
