// SPDX-License-Identifier: BUSL-1.1
//! Supervised recurring reconciliation driver.
//!
//! One owned tokio task with an explicit start/stop contract — no ambient
//! self-rescheduling timer chain and no global state. After a warm-up
//! delay the driver runs one pass, then sleeps until the next local
//! midnight, runs, and re-arms. The next pass is always armed: an empty
//! directory, a failed pass, and a failed directory read all log and leave
//! the loop running. Shutdown is cooperative and honored inside every
//! sleep.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Days, Local, NaiveTime};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::reconcile::BatchReconciler;

/// Driver tuning.
#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// Delay before the first pass after process start.
    pub warmup: Duration,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            warmup: Duration::from_secs(30),
        }
    }
}

/// Handle owning the driver task. Dropping it without calling
/// [`DriverHandle::shutdown`] aborts nothing — the task keeps running for
/// the life of the process, matching a supervisor that is only torn down
/// at shutdown.
pub struct DriverHandle {
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl DriverHandle {
    /// Signal the driver to stop and wait for the task to finish.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);
        if let Err(err) = self.task.await {
            tracing::error!(error = %err, "recurring driver task panicked");
        }
    }
}

/// Spawns and supervises the recurring reconciliation task.
pub struct RecurringJobDriver;

impl RecurringJobDriver {
    /// Start the driver. Returns the owning handle.
    pub fn start(reconciler: Arc<BatchReconciler>, config: DriverConfig) -> DriverHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(run_loop(reconciler, config, shutdown_rx));
        DriverHandle { shutdown_tx, task }
    }
}

async fn run_loop(
    reconciler: Arc<BatchReconciler>,
    config: DriverConfig,
    mut shutdown: watch::Receiver<bool>,
) {
    tracing::info!(warmup_secs = config.warmup.as_secs(), "recurring driver started");

    // Warm-up pass.
    tokio::select! {
        _ = tokio::time::sleep(config.warmup) => {}
        _ = shutdown.changed() => {
            tracing::info!("recurring driver stopped during warm-up");
            return;
        }
    }
    run_pass(&reconciler).await;

    // Steady state: one pass at every local midnight, unconditionally
    // re-armed.
    loop {
        let now = Local::now();
        let wake = next_midnight(now);
        let wait = (wake - now).to_std().unwrap_or(Duration::ZERO);
        tracing::debug!(next_run = %wake, "recurring driver sleeping until next pass");

        tokio::select! {
            _ = tokio::time::sleep(wait) => {}
            _ = shutdown.changed() => {
                tracing::info!("recurring driver stopped");
                return;
            }
        }
        run_pass(&reconciler).await;
    }
}

/// Run one pass. Failures are logged; the caller re-arms regardless.
async fn run_pass(reconciler: &BatchReconciler) {
    let today = Local::now().date_naive();
    match reconciler.reconcile_all(today).await {
        Ok(outcome) => {
            tracing::info!(
                scheduled = outcome.scheduled,
                errors = outcome.errors,
                "recurring reconciliation pass finished"
            );
        }
        Err(err) => {
            tracing::error!(
                error = %err,
                "recurring reconciliation pass failed — next pass remains armed"
            );
        }
    }
}

/// The next local midnight strictly after `now`.
///
/// On DST transitions where local midnight is ambiguous the earlier
/// instant is used; where it does not exist the pass slips 24 hours.
fn next_midnight(now: DateTime<Local>) -> DateTime<Local> {
    let next_day = now
        .date_naive()
        .checked_add_days(Days::new(1))
        .unwrap_or(now.date_naive());
    match next_day.and_time(NaiveTime::MIN).and_local_timezone(Local) {
        chrono::LocalResult::Single(t) => t,
        chrono::LocalResult::Ambiguous(earliest, _) => earliest,
        chrono::LocalResult::None => now + chrono::Duration::hours(24),
    }
}
