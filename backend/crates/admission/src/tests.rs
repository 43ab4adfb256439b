//! Router tests for the admission middleware

#[cfg(test)]
mod middleware_tests {
    use std::net::SocketAddr;
    use std::sync::Arc;
    use std::time::Duration;

    use auth::application::{SignUpInput, SignUpUseCase};
    use auth::{AuthConfig, CurrentUser, MemoryUserRepository, RoleSet, TokenAuthenticator, UserRole};
    use axum::Router;
    use axum::body::Body;
    use axum::extract::ConnectInfo;
    use axum::http::{Request, StatusCode, header};
    use axum::middleware;
    use axum::response::Response;
    use axum::routing::get;
    use http_body_util::BodyExt;
    use platform::clock::ManualClock;
    use platform::rate_limit::{MemoryRateLimitStore, RateLimitConfig};
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::application::config::AdmissionConfig;
    use crate::application::pipeline::AdmissionPipeline;
    use crate::domain::value_objects::{Access, RoutePolicy};
    use crate::infra::memory::MemoryDebounceStore;
    use crate::presentation::middleware::{AdmissionState, admission_gate, global_rate_limit};

    const CLIENT: [u8; 4] = [203, 0, 113, 7];

    const ITEMS: RoutePolicy = RoutePolicy::public("items")
        .write(Access::authenticated())
        .debounce(Duration::from_millis(3_000))
        .rate_limit_group("api");

    const ADMIN_ONLY: RoutePolicy = RoutePolicy::public("admin")
        .access(Access::roles(RoleSet::ADMIN))
        .rate_limit_group("api");

    struct Fixture {
        repo: Arc<MemoryUserRepository>,
        clock: Arc<ManualClock>,
        authenticator: TokenAuthenticator<MemoryUserRepository>,
        pipeline: Arc<AdmissionPipeline<MemoryUserRepository>>,
    }

    fn fixture(limit: RateLimitConfig) -> Fixture {
        fixture_with(AdmissionConfig::new(limit))
    }

    fn fixture_with(config: AdmissionConfig) -> Fixture {
        let repo = Arc::new(MemoryUserRepository::new());
        let clock = Arc::new(ManualClock::new(1_700_000_000_000));
        let authenticator = TokenAuthenticator::new(
            repo.clone(),
            Arc::new(AuthConfig::new("middleware-secret")),
            clock.clone(),
        );
        let pipeline = Arc::new(AdmissionPipeline::new(
            config,
            authenticator.clone(),
            Arc::new(MemoryRateLimitStore::new()),
            Arc::new(MemoryDebounceStore::new()),
            clock.clone(),
        ));
        Fixture {
            repo,
            clock,
            authenticator,
            pipeline,
        }
    }

    async fn list(user: Option<CurrentUser>) -> String {
        user.map(|CurrentUser(u)| u.email.as_str().to_string())
            .unwrap_or_default()
    }

    async fn create(CurrentUser(user): CurrentUser, body: String) -> (StatusCode, String) {
        (StatusCode::CREATED, format!("{}|{}", user.email.as_str(), body))
    }

    fn mount(f: &Fixture, policy: RoutePolicy) -> Router {
        Router::new()
            .route("/", get(list).post(create))
            .route_layer(middleware::from_fn_with_state(
                AdmissionState::new(f.pipeline.clone(), policy),
                admission_gate::<MemoryUserRepository, MemoryRateLimitStore, MemoryDebounceStore>,
            ))
    }

    fn app(f: &Fixture) -> Router {
        Router::new()
            .nest("/items", mount(f, ITEMS))
            .nest("/other", mount(f, ITEMS))
            .nest("/admin", mount(f, ADMIN_ONLY))
    }

    /// `app` behind the outer global limiter, plus an unrouted fallback
    fn layered_app(f: &Fixture) -> Router {
        app(f).layer(middleware::from_fn_with_state(
            f.pipeline.clone(),
            global_rate_limit::<MemoryUserRepository, MemoryRateLimitStore, MemoryDebounceStore>,
        ))
    }

    fn from_peer(peer: [u8; 4], mut req: Request<Body>) -> Request<Body> {
        req.extensions_mut()
            .insert(ConnectInfo(SocketAddr::from((peer, 40_000))));
        req
    }

    async fn token_for(f: &Fixture, email: &str, role: UserRole) -> String {
        let user = SignUpUseCase::new(f.repo.clone(), Arc::new(AuthConfig::new("x")))
            .execute(SignUpInput {
                name: "Someone".to_string(),
                email: email.to_string(),
                password: "pw123456".to_string(),
                role,
            })
            .await
            .unwrap();
        f.authenticator.issue(&user).unwrap()
    }

    fn request(method: &str, uri: &str, token: Option<&str>, body: &str) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        from_peer(CLIENT, builder.body(Body::from(body.to_string())).unwrap())
    }

    async fn send(app: &Router, req: Request<Body>) -> Response {
        app.clone().oneshot(req).await.unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn body_json(response: Response) -> Value {
        serde_json::from_str(&body_text(response).await).unwrap()
    }

    #[tokio::test]
    async fn test_rate_limit_headers_on_success() {
        let f = fixture(RateLimitConfig::default());
        let app = app(&f);

        let response = send(&app, request("GET", "/items", None, "")).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["ratelimit-limit"], "100");
        assert_eq!(response.headers()["ratelimit-remaining"], "99");
        assert_eq!(response.headers()["ratelimit-reset"], "60");
        assert_eq!(body_text(response).await, "");
    }

    #[tokio::test]
    async fn test_rate_limit_exceeded() {
        let f = fixture(RateLimitConfig::new(2, Duration::from_secs(60)));
        let app = app(&f);

        for _ in 0..2 {
            let response = send(&app, request("GET", "/items", None, "")).await;
            assert_eq!(response.status(), StatusCode::OK);
        }

        f.clock.advance(Duration::from_secs(15));
        let response = send(&app, request("GET", "/items", None, "")).await;
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()[header::RETRY_AFTER], "45");
        assert_eq!(response.headers()["ratelimit-remaining"], "0");

        let body = body_json(response).await;
        assert_eq!(body["detail"], "Too many requests. Please try again later.");
        assert_eq!(body["retryAfterSeconds"], 45);

        // another client is unaffected
        let other = from_peer(
            [198, 51, 100, 1],
            Request::builder().uri("/items").body(Body::empty()).unwrap(),
        );
        assert_eq!(send(&app, other).await.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_rotating_forwarded_for_does_not_reset_quota() {
        let f = fixture(RateLimitConfig::new(3, Duration::from_secs(60)));
        let app = app(&f);
        let token = token_for(&f, "alice@example.com", UserRole::User).await;

        let mut statuses = Vec::new();
        for i in 0..6 {
            let mut req = request("POST", "/items", Some(&token), "{}");
            req.headers_mut().insert(
                "x-forwarded-for",
                format!("10.0.0.{i}").parse().unwrap(),
            );
            statuses.push(send(&app, req).await.status());
        }

        // the first write goes through, the copies are debounced, then the
        // quota runs out
        assert_eq!(statuses[0], StatusCode::CREATED);
        assert!(statuses[1..].iter().all(|s| *s == StatusCode::TOO_MANY_REQUESTS));
        let response = send(&app, request("GET", "/items", None, "")).await;
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            body_json(response).await["detail"],
            "Too many requests. Please try again later."
        );
    }

    #[tokio::test]
    async fn test_forwarded_for_is_honoured_behind_trusted_proxy() {
        let config = AdmissionConfig::new(RateLimitConfig::new(1, Duration::from_secs(60)))
            .with_trust_proxy(true);
        let f = fixture_with(config);
        let app = app(&f);

        for client in ["198.51.100.1", "198.51.100.2"] {
            let mut req = request("GET", "/items", None, "");
            req.headers_mut()
                .insert("x-forwarded-for", client.parse().unwrap());
            assert_eq!(send(&app, req).await.status(), StatusCode::OK, "{client}");
        }

        let mut req = request("GET", "/items", None, "");
        req.headers_mut()
            .insert("x-forwarded-for", "198.51.100.1".parse().unwrap());
        assert_eq!(send(&app, req).await.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[tokio::test]
    async fn test_global_layer_counts_unrouted_requests() {
        let f = fixture(RateLimitConfig::new(3, Duration::from_secs(60)));
        let app = layered_app(&f);

        let response = send(&app, request("GET", "/missing", None, "")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()["ratelimit-remaining"], "2");

        // routed requests are counted once globally, plus their group
        let response = send(&app, request("GET", "/items", None, "")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["ratelimit-remaining"], "1");

        let response = send(&app, request("GET", "/items/nested/missing", None, "")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()["ratelimit-remaining"], "0");

        let response = send(&app, request("GET", "/missing", None, "")).await;
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()[header::RETRY_AFTER], "60");
    }

    #[tokio::test]
    async fn test_write_requires_token() {
        let f = fixture(RateLimitConfig::default());
        let app = app(&f);

        let response = send(&app, request("POST", "/items", None, "{}")).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["detail"], "Not authorized, token missing");

        let response = send(&app, request("POST", "/items", Some("a.b.c"), "{}")).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["detail"], "Not authorized, token invalid");
    }

    #[tokio::test]
    async fn test_expired_token_is_reported_as_expired() {
        let f = fixture(RateLimitConfig::default());
        let app = app(&f);
        let token = token_for(&f, "alice@example.com", UserRole::User).await;

        f.clock.advance(Duration::from_secs(8 * 24 * 3600));
        let response = send(&app, request("POST", "/items", Some(&token), "{}")).await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["detail"], "Not authorized, token expired");
    }

    #[tokio::test]
    async fn test_role_gate() {
        let f = fixture(RateLimitConfig::default());
        let app = app(&f);
        let user = token_for(&f, "alice@example.com", UserRole::User).await;
        let admin = token_for(&f, "root@example.com", UserRole::Admin).await;

        let response = send(&app, request("GET", "/admin", Some(&user), "")).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            body_json(response).await["detail"],
            "Forbidden: insufficient permissions"
        );

        let response = send(&app, request("GET", "/admin", Some(&admin), "")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "root@example.com");
    }

    #[tokio::test]
    async fn test_duplicate_write_is_debounced() {
        let f = fixture(RateLimitConfig::default());
        let app = app(&f);
        let token = token_for(&f, "alice@example.com", UserRole::User).await;
        let body = r#"{"title":"A","body":"B"}"#;

        let response = send(&app, request("POST", "/items", Some(&token), body)).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(body_text(response).await, format!("alice@example.com|{body}"));

        f.clock.advance(Duration::from_millis(800));
        let reordered = r#"{"body":"B","title":"A"}"#;
        let response = send(&app, request("POST", "/items", Some(&token), reordered)).await;
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()[header::RETRY_AFTER], "3");
        let json = body_json(response).await;
        assert_eq!(
            json["detail"],
            "Duplicate request detected. Please wait 3s before retrying."
        );
        assert_eq!(json["retryAfterSeconds"], 3);

        f.clock.advance(Duration::from_millis(2_200));
        let response = send(&app, request("POST", "/items", Some(&token), body)).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_debounce_key_includes_mount_path() {
        let f = fixture(RateLimitConfig::default());
        let app = app(&f);
        let token = token_for(&f, "alice@example.com", UserRole::User).await;

        for uri in ["/items", "/other"] {
            let response = send(&app, request("POST", uri, Some(&token), "{}")).await;
            assert_eq!(response.status(), StatusCode::CREATED, "{uri}");
        }
    }

    #[tokio::test]
    async fn test_invalid_json_on_debounced_write() {
        let f = fixture(RateLimitConfig::default());
        let app = app(&f);
        let token = token_for(&f, "alice@example.com", UserRole::User).await;

        let response = send(&app, request("POST", "/items", Some(&token), "{oops")).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert!(body["detail"].as_str().unwrap().starts_with("Invalid JSON"));
    }
}
