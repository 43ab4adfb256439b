//! API Server
//!
//! Wires the auth, admission and resources crates into one axum router.
//! The binary in `main.rs` only reads the config, picks the stores and
//! serves.

pub mod app;
pub mod config;
pub mod health;
pub mod seed;

pub use app::{AppContext, build_router};
pub use config::ApiConfig;
pub use seed::{SeedReport, Seeder};

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
