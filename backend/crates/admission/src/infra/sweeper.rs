//! Background Sweeper
//!
//! Periodically drops stale rate windows and debounce entries. Runs apart
//! from request handling; a failed sweep is logged and retried next tick.

use std::sync::Arc;
use std::time::Duration;

use auth::UserRepository;
use platform::rate_limit::RateLimitStore;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::application::pipeline::{AdmissionPipeline, SweepReport};
use crate::domain::repository::DebounceStore;

/// Spawn the sweep loop on the current runtime
///
/// The tick comes from `AdmissionConfig::sweep_interval`. Abort the returned
/// handle to stop it.
pub fn spawn_sweeper<U, R, D>(pipeline: Arc<AdmissionPipeline<U, R, D>>) -> JoinHandle<()>
where
    U: UserRepository + Send + Sync + 'static,
    R: RateLimitStore + Send + Sync + 'static,
    D: DebounceStore + Send + Sync + 'static,
{
    let period = pipeline
        .config()
        .sweep_interval
        .max(Duration::from_millis(1));

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            match pipeline.sweep().await {
                Ok(report) if report == SweepReport::default() => {}
                Ok(report) => {
                    tracing::debug!(
                        rate_windows = report.rate_windows,
                        debounce_entries = report.debounce_entries,
                        "Admission sweep"
                    );
                }
                Err(e) => {
                    tracing::error!(error = %e, "Admission sweep failed");
                }
            }
        }
    })
}
