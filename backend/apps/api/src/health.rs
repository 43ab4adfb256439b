//! Health Check

use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    /// Seconds since the router was built
    pub uptime: f64,
    pub timestamp: String,
}

/// `/health`
pub fn health_router() -> Router {
    Router::new()
        .route("/health", get(health))
        .with_state(Arc::new(Instant::now()))
}

async fn health(State(started): State<Arc<Instant>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        uptime: started.elapsed().as_secs_f64(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}
