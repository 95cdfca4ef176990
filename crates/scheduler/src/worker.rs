//! Job worker - per-destination delivery loop

use std::sync::Arc;

use contracts::{Destination, JobState, Notice, Notifier, PauseReason};
use observability::{
    record_auto_pause, record_job_finished, record_line_delivered, record_tick_lateness_ms,
    set_jobs_active, JobOutcome,
};
use tokio::sync::watch;
use tokio::time::{self, Instant};
use tracing::{debug, error, info, instrument, warn};

use crate::job::Job;
use crate::registry::JobRegistry;

/// Spawn the worker for a job that is already registered
///
/// The worker runs under a supervisor task so that a panic inside one job
/// retires that job alone and leaves the registry usable.
pub(crate) fn spawn_job<D, N>(
    job: Arc<Job<D>>,
    registry: Arc<JobRegistry<D>>,
    notifier: Arc<N>,
    blank_line: Arc<str>,
) where
    D: Destination + Sync + 'static,
    N: Notifier,
{
    let supervised = Arc::clone(&job);

    let handle = tokio::spawn(async move {
        let worker = tokio::spawn(job_worker(
            Arc::clone(&supervised),
            Arc::clone(&registry),
            Arc::clone(&notifier),
            blank_line,
        ));

        if let Err(e) = worker.await {
            error!(destination = %supervised.id(), error = ?e, "Job worker panicked");
            if registry.retire(&supervised) {
                record_job_finished(JobOutcome::Failed);
                set_jobs_active(registry.len());
                notifier.notify(
                    &supervised.origin(),
                    &Notice::DeliveryFailed {
                        destination: supervised.id().clone(),
                        message: "internal error".to_string(),
                    },
                );
            }
        }
    });

    job.attach_worker(handle);
}

/// Delivery loop for one job.
///
/// The first line goes out as soon as the job runs; every later line waits at
/// least the job's delay after the previous one, so a quick stop/resume never
/// tightens the pacing. Completion is declared right after the last write.
#[instrument(
    name = "job_worker_loop",
    skip(job, registry, notifier, blank_line),
    fields(destination = %job.id(), lines = job.lines().len())
)]
async fn job_worker<D, N>(
    job: Arc<Job<D>>,
    registry: Arc<JobRegistry<D>>,
    notifier: Arc<N>,
    blank_line: Arc<str>,
) where
    D: Destination + Sync,
    N: Notifier,
{
    let mut state_rx = job.subscribe();
    let mut next_at = Instant::now();
    // Lateness is meaningless for the first tick after a pause.
    let mut held = false;

    debug!("Job worker started");

    loop {
        held |= state_rx.borrow().is_paused();
        if !wait_until_running(&mut state_rx).await {
            break;
        }

        tokio::select! {
            _ = time::sleep_until(next_at) => {}
            changed = state_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                continue;
            }
        }

        // A flip may have raced the timer.
        if !state_rx.borrow_and_update().is_running() {
            continue;
        }

        if !job.destination().is_reachable() {
            if job.pause(PauseReason::Unreachable) {
                record_auto_pause();
                warn!(remaining = job.remaining(), "Destination unreachable, pausing");
                notifier.notify(
                    &job.origin(),
                    &Notice::Unreachable {
                        destination: job.id().clone(),
                        remaining: job.remaining(),
                    },
                );
            }
            continue;
        }

        let Some(raw) = job.lines().get(job.cursor()) else {
            complete(&job, &registry, notifier.as_ref());
            break;
        };

        if !held {
            let late = Instant::now().saturating_duration_since(next_at);
            record_tick_lateness_ms(late.as_secs_f64() * 1000.0);
        }
        held = false;

        let line = normalize_line(raw, &blank_line);
        match job.destination().write(line).await {
            Ok(()) => {
                let cursor = job.advance();
                record_line_delivered();
                debug!(cursor, "Line delivered");
                next_at = Instant::now() + job.delay();

                if job.is_exhausted() {
                    complete(&job, &registry, notifier.as_ref());
                    break;
                }
            }
            Err(e) => {
                job.metrics().inc_failure_count();
                error!(cursor = job.cursor(), error = %e, "Write failed, giving up");
                if registry.retire(&job) {
                    record_job_finished(JobOutcome::Failed);
                    set_jobs_active(registry.len());
                    notifier.notify(
                        &job.origin(),
                        &Notice::DeliveryFailed {
                            destination: job.id().clone(),
                            message: e.to_string(),
                        },
                    );
                }
                break;
            }
        }
    }

    debug!(cursor = job.cursor(), "Job worker stopped");
}

/// Block while paused; true once running, false once terminated
async fn wait_until_running(state_rx: &mut watch::Receiver<JobState>) -> bool {
    loop {
        let state = *state_rx.borrow_and_update();
        match state {
            JobState::Running => return true,
            JobState::Terminated => return false,
            JobState::Paused(_) => {
                if state_rx.changed().await.is_err() {
                    return false;
                }
            }
        }
    }
}

fn complete<D: Destination, N: Notifier>(job: &Arc<Job<D>>, registry: &JobRegistry<D>, notifier: &N) {
    if registry.retire(job) {
        record_job_finished(JobOutcome::Completed);
        set_jobs_active(registry.len());
        let stats = job.metrics().snapshot();
        info!(
            delivered = stats.lines_delivered,
            pauses = stats.pause_count,
            auto_pauses = stats.auto_pause_count,
            resumes = stats.resume_count,
            "Paste finished"
        );
        notifier.notify(
            &job.origin(),
            &Notice::Completed {
                destination: job.id().clone(),
            },
        );
    }
}

/// Trailing whitespace (line terminator included) is dropped; hosts refuse
/// empty messages, so a blank line becomes `blank_line`.
pub fn normalize_line<'a>(line: &'a str, blank_line: &'a str) -> &'a str {
    match line.trim_end() {
        "" => blank_line,
        trimmed => trimmed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_line() {
        assert_eq!(normalize_line("hello  \r\n", " "), "hello");
        assert_eq!(normalize_line("  indented", " "), "  indented");
        assert_eq!(normalize_line("", " "), " ");
        assert_eq!(normalize_line("\t \n", "."), ".");
    }
}
