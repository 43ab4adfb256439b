//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

use std::net::SocketAddr;
use std::sync::Arc;

use admission::spawn_sweeper;
use api::{ApiConfig, AppContext, Seeder, build_router};
use auth::{MemoryUserRepository, PgUserRepository, UserRepository};
use platform::clock::SystemClock;
use resources::{DocumentRepository, MemoryDocumentRepository, PgDocumentRepository};
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    init_tracing();

    let config = ApiConfig::from_env()?;

    match config.database_url.clone() {
        Some(database_url) => {
            let pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(&database_url)
                .await?;
            tracing::info!("Connected to database");

            sqlx::migrate!("../../../database/migrations")
                .run(&pool)
                .await?;
            tracing::info!("Migrations completed");

            serve(
                config,
                Arc::new(PgUserRepository::new(pool.clone())),
                Arc::new(PgDocumentRepository::new(pool)),
            )
            .await
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory stores");
            serve(
                config,
                Arc::new(MemoryUserRepository::new()),
                Arc::new(MemoryDocumentRepository::new()),
            )
            .await
        }
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "api=info,auth=info,admission=info,resources=info,tower_http=info".into()
    });
    let json = std::env::var("LOG_FORMAT").is_ok_and(|format| format == "json");

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn serve<U, S>(config: ApiConfig, users: Arc<U>, documents: Arc<S>) -> anyhow::Result<()>
where
    U: UserRepository + Send + Sync + 'static,
    S: DocumentRepository + Send + Sync + 'static,
{
    let ctx = AppContext::new(
        users,
        documents,
        config.auth,
        config.admission,
        SystemClock::shared(),
    );

    // a failed seed stops startup
    if let Some(seed) = &config.seed {
        Seeder::new(
            ctx.auth.repo.clone(),
            ctx.auth.config.clone(),
            ctx.resources.service.clone(),
        )
        .run(&seed.password)
        .await?;
    }

    let sweeper = spawn_sweeper(ctx.pipeline.clone());
    let app = build_router(&ctx, &config.frontend_origins);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    sweeper.abort();
    Ok(())
}
