//! Paster - registry operations behind the command surface

use std::sync::Arc;
use std::time::Duration;

use contracts::{
    ConflictPolicy, ContextId, Destination, DestinationId, JobState, JobSummary, LineBuffer,
    Notice, Notifier, PasteError, PasteSettings, PauseReason,
};
use observability::{record_job_finished, record_job_started, set_jobs_active, JobOutcome};
use tracing::{debug, error, info, instrument};

use crate::job::Job;
use crate::registry::JobRegistry;
use crate::worker::spawn_job;

/// Owns the job registry and launches one worker per job.
///
/// Successful operations return the notice the caller should show; rejected
/// ones return the error. Notices for transitions the caller did not ask for
/// (a replaced job, auto-pause, completion, failures) go straight to the
/// notifier, addressed to the job's origin context.
pub struct Paster<D, N> {
    registry: Arc<JobRegistry<D>>,
    notifier: Arc<N>,
    settings: PasteSettings,
    blank_line: Arc<str>,
}

impl<D, N> Paster<D, N>
where
    D: Destination + Sync + 'static,
    N: Notifier,
{
    pub fn new(settings: PasteSettings, notifier: Arc<N>) -> Self {
        let blank_line = Arc::from(settings.blank_line.as_str());
        Self {
            registry: Arc::new(JobRegistry::new()),
            notifier,
            settings,
            blank_line,
        }
    }

    pub fn settings(&self) -> &PasteSettings {
        &self.settings
    }

    pub fn registry(&self) -> &Arc<JobRegistry<D>> {
        &self.registry
    }

    pub fn notifier(&self) -> &Arc<N> {
        &self.notifier
    }

    /// Register and launch a job pasting `lines` to `destination`
    ///
    /// # Errors
    /// `AlreadyPasting` when the destination has a job and the conflict
    /// policy is `reject`; nothing changes in that case.
    #[instrument(
        name = "paster_start",
        skip(self, destination, lines),
        fields(destination = %destination.id(), lines = lines.len(), context = %context)
    )]
    pub fn start(
        &self,
        context: &ContextId,
        destination: D,
        lines: LineBuffer,
        delay: Duration,
    ) -> Result<Notice, PasteError> {
        let id = destination.id().clone();
        let line_count = lines.len();
        let job = Arc::new(Job::new(destination, lines, delay, context.clone()));

        match self.settings.on_conflict {
            ConflictPolicy::Reject => {
                if !self.registry.try_create(Arc::clone(&job)) {
                    debug!("Destination busy, rejecting start");
                    return Err(PasteError::already_pasting(&id));
                }
            }
            ConflictPolicy::Replace => {
                if let Some(previous) = self.registry.replace(Arc::clone(&job)) {
                    info!(
                        remaining = previous.remaining(),
                        "Replacing current paste"
                    );
                    record_job_finished(JobOutcome::Cancelled);
                    self.notifier.notify(
                        context,
                        &Notice::Replaced {
                            destination: id.clone(),
                        },
                    );
                }
            }
        }

        spawn_job(
            Arc::clone(&job),
            Arc::clone(&self.registry),
            Arc::clone(&self.notifier),
            Arc::clone(&self.blank_line),
        );
        record_job_started();
        set_jobs_active(self.registry.len());

        info!(delay_ms = delay.as_millis() as u64, "Paste started");
        Ok(Notice::Started {
            destination: id,
            lines: line_count,
        })
    }

    /// Pause the running job for `id`
    ///
    /// # Errors
    /// `NoActiveJob` if there is no job or it is not running.
    #[instrument(name = "paster_stop", skip(self), fields(destination = %id))]
    pub fn stop(&self, id: &DestinationId) -> Result<Notice, PasteError> {
        let job = self
            .registry
            .find(id)
            .ok_or_else(|| PasteError::no_active_job(id))?;

        if !job.pause(PauseReason::Operator) {
            return Err(PasteError::no_active_job(id));
        }

        info!(remaining = job.remaining(), "Paste stopped");
        Ok(Notice::Stopped {
            destination: id.clone(),
            remaining: job.remaining(),
        })
    }

    /// Resume the paused job for `id`
    ///
    /// Reachability is re-checked first; a still-unreachable destination is
    /// reported and the job stays paused.
    ///
    /// # Errors
    /// `NoSuchJob`, `NotPaused` or `DestinationUnreachable`.
    #[instrument(name = "paster_resume", skip(self), fields(destination = %id, context = %context))]
    pub fn resume(&self, context: &ContextId, id: &DestinationId) -> Result<Notice, PasteError> {
        let job = self
            .registry
            .find(id)
            .ok_or_else(|| PasteError::no_such_job(id))?;

        match job.state() {
            JobState::Paused(_) => {}
            JobState::Running => return Err(PasteError::not_paused(id)),
            JobState::Terminated => return Err(PasteError::no_such_job(id)),
        }

        if !job.destination().is_reachable() {
            return Err(PasteError::unreachable(id));
        }

        job.set_origin(context);
        if !job.resume() {
            // Lost a race with another resume or a terminal transition.
            return match job.state() {
                JobState::Terminated => Err(PasteError::no_such_job(id)),
                _ => Err(PasteError::not_paused(id)),
            };
        }

        info!(remaining = job.remaining(), "Paste resumed");
        Ok(Notice::Resumed {
            destination: id.clone(),
            remaining: job.remaining(),
        })
    }

    /// Discard the job for `id`, whatever its state
    ///
    /// # Errors
    /// `NoSuchJob` if the destination has no job.
    #[instrument(name = "paster_cancel", skip(self), fields(destination = %id))]
    pub fn cancel(&self, id: &DestinationId) -> Result<Notice, PasteError> {
        let job = self
            .registry
            .remove(id)
            .ok_or_else(|| PasteError::no_such_job(id))?;

        record_job_finished(JobOutcome::Cancelled);
        set_jobs_active(self.registry.len());
        info!(remaining = job.remaining(), "Paste cancelled");

        Ok(Notice::Cancelled {
            destination: id.clone(),
            remaining: job.remaining(),
        })
    }

    /// Summaries of every registered job, ordered by destination
    pub fn status(&self) -> Vec<JobSummary> {
        let mut jobs: Vec<JobSummary> = self
            .registry
            .list_all()
            .into_iter()
            .map(|(_, job)| job.summary())
            .collect();
        jobs.sort_by_key(|summary| summary.destination.to_string());
        jobs
    }

    pub fn find(&self, id: &DestinationId) -> Option<JobSummary> {
        self.registry.find(id).map(|job| job.summary())
    }

    /// Wait until no job is running
    ///
    /// Paused jobs count as settled. A job resumed or started while waiting
    /// is waited for too.
    pub async fn wait_until_settled(&self) {
        loop {
            let running: Vec<_> = self
                .registry
                .list_all()
                .into_iter()
                .map(|(_, job)| job.subscribe())
                .filter(|state| state.borrow().is_running())
                .collect();
            if running.is_empty() {
                return;
            }
            debug!(jobs = running.len(), "Waiting for running jobs");
            for mut state in running {
                // A closed channel means the job is gone.
                let _ = state.wait_for(|state| !state.is_running()).await;
            }
        }
    }

    /// Terminate every job and wait for all workers to exit
    ///
    /// Termination is itself a wake-up, so paused workers exit as well.
    #[instrument(name = "paster_shutdown", skip(self))]
    pub async fn shutdown(&self) {
        let jobs = self.registry.drain();
        info!(jobs = jobs.len(), "Shutting down paste jobs");

        for job in &jobs {
            record_job_finished(JobOutcome::Cancelled);
            self.notifier.notify(
                &job.origin(),
                &Notice::Cancelled {
                    destination: job.id().clone(),
                    remaining: job.remaining(),
                },
            );
        }

        for job in jobs {
            if let Some(worker) = job.take_worker() {
                if let Err(e) = worker.await {
                    error!(destination = %job.id(), error = ?e, "Job supervisor failed");
                }
            }
        }

        set_jobs_active(0);
        debug!("Paster shutdown complete");
    }
}
