use std::{sync::Arc, time::Duration};
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::{
    error::AppError,
    service::{
        notifier::Notifier,
        poll::{CycleReport, PollService},
    },
    state::AppState,
};

/// What happened to one scheduler tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    Completed(CycleReport),
    /// The previous cycle was still running.
    Skipped,
    Failed,
}

/// Starts the poll scheduler
///
/// Runs one poll cycle every `poll_interval_secs`. The scheduler handle is stored in the
/// state so shutdown can stop it.
///
/// # Arguments
/// - `state`: Shared application state
/// - `notifier`: Discord sink for alerts and embed updates
pub async fn start_scheduler(state: AppState, notifier: Arc<dyn Notifier>) -> Result<(), AppError> {
    let scheduler = JobScheduler::new().await?;
    let interval = Duration::from_secs(state.config.poll_interval_secs);

    let job_state = state.clone();
    let job_notifier = notifier.clone();

    let job = Job::new_repeated_async(interval, move |_uuid, _lock| {
        let state = job_state.clone();
        let notifier = job_notifier.clone();

        Box::pin(async move {
            run_guarded(&state, notifier.as_ref()).await;
        })
    })?;

    scheduler.add(job).await?;
    scheduler.start().await?;

    *state.scheduler.lock().await = Some(scheduler);

    tracing::info!(
        "Poll scheduler started, polling every {}s",
        state.config.poll_interval_secs
    );

    Ok(())
}

/// Runs a poll cycle unless one is already in flight.
///
/// Cycle errors are logged here; the scheduler keeps ticking.
pub async fn run_guarded(state: &AppState, notifier: &dyn Notifier) -> PollOutcome {
    let Ok(_guard) = state.poll_guard.try_lock() else {
        tracing::warn!("Previous poll cycle still running, skipping this tick");
        return PollOutcome::Skipped;
    };

    match PollService::new(state, notifier).run_cycle().await {
        Ok(report) => {
            tracing::info!(
                "Poll cycle done: {} tables, {} alerts sent, {} suppressed, {} history rows",
                report.tables_fetched,
                report.alerts_sent,
                report.alerts_suppressed,
                report.history_rows
            );
            PollOutcome::Completed(report)
        }
        Err(e) => {
            tracing::error!("Poll cycle failed, snapshot left unchanged: {}", e);
            PollOutcome::Failed
        }
    }
}
