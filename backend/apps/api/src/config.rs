//! Server Configuration
//!
//! Everything is read from the environment (after `.env` is loaded).

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use admission::AdmissionConfig;
use anyhow::{Context, bail};
use auth::AuthConfig;
use platform::rate_limit::RateLimitConfig;

use crate::app::shortest_debounce_window;

pub const DEFAULT_PORT: u16 = 3000;

const DEFAULT_RATE_LIMIT_WINDOW_MS: u64 = 60_000;
const DEFAULT_RATE_LIMIT_MAX: u32 = 100;
const DEFAULT_SWEEP_INTERVAL_MS: u64 = 1_000;
const DEFAULT_TOKEN_TTL_SECS: u64 = 7 * 24 * 3600;

/// Startup seeding
pub struct SeedConfig {
    pub password: String,
}

impl fmt::Debug for SeedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeedConfig")
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug)]
pub struct ApiConfig {
    pub port: u16,
    /// Postgres URL. In-memory stores are used when unset.
    pub database_url: Option<String>,
    pub auth: AuthConfig,
    pub admission: AdmissionConfig,
    /// Allowed CORS origins. Empty allows any origin.
    pub frontend_origins: Vec<String>,
    pub seed: Option<SeedConfig>,
}

impl ApiConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the config from any variable source
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let port = parse_or(&var, "PORT", DEFAULT_PORT)?;

        // Token signing secret
        let auth = match var("JWT_SECRET") {
            Some(secret) => AuthConfig::new(secret),
            None if cfg!(debug_assertions) => {
                tracing::warn!("JWT_SECRET not set, using a random secret");
                AuthConfig::development()
            }
            None => bail!("JWT_SECRET must be set in production"),
        };
        let auth = auth.with_token_ttl(Duration::from_secs(parse_or(
            &var,
            "JWT_TTL_SECS",
            DEFAULT_TOKEN_TTL_SECS,
        )?));
        let auth = match var("PASSWORD_PEPPER") {
            Some(pepper) => auth.with_pepper(pepper),
            None => auth,
        };

        let limit = RateLimitConfig::new(
            parse_or(&var, "RATE_LIMIT_MAX", DEFAULT_RATE_LIMIT_MAX)?,
            Duration::from_millis(parse_or(
                &var,
                "RATE_LIMIT_WINDOW_MS",
                DEFAULT_RATE_LIMIT_WINDOW_MS,
            )?),
        );
        if limit.max_requests == 0 {
            bail!("RATE_LIMIT_MAX must be at least 1");
        }
        let sweep_interval = Duration::from_millis(parse_or(
            &var,
            "ADMISSION_SWEEP_INTERVAL_MS",
            DEFAULT_SWEEP_INTERVAL_MS,
        )?);
        if sweep_interval.is_zero() {
            bail!("ADMISSION_SWEEP_INTERVAL_MS must be at least 1");
        }
        if let Some(window) = shortest_debounce_window()
            && sweep_interval > window
        {
            bail!(
                "ADMISSION_SWEEP_INTERVAL_MS must not exceed the shortest debounce window ({}ms)",
                window.as_millis()
            );
        }
        let admission = AdmissionConfig::new(limit)
            .with_sweep_interval(sweep_interval)
            .with_trust_proxy(parse_or(&var, "TRUST_PROXY", false)?);

        let frontend_origins = var("FRONTEND_ORIGINS")
            .map(|origins| {
                origins
                    .split(',')
                    .map(str::trim)
                    .filter(|o| !o.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let seed = if parse_or(&var, "SEED_DATABASE", false)? {
            let password = var("SEED_PASSWORD")
                .context("SEED_PASSWORD must be set when SEED_DATABASE is enabled")?;
            Some(SeedConfig { password })
        } else {
            None
        };

        Ok(Self {
            port,
            database_url: var("DATABASE_URL"),
            auth,
            admission,
            frontend_origins,
            seed,
        })
    }
}

fn parse_or<F, T>(var: &F, name: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match var(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid value for {name}: {raw:?}")),
        None => Ok(default),
    }
}
