//! Job - delivery state of one destination's paste

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use contracts::{ContextId, Destination, DestinationId, JobState, JobSummary, LineBuffer, PauseReason};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::metrics::JobMetrics;

/// One in-flight paste.
///
/// Written by two actors: its own worker (cursor, terminal transition) and
/// the command layer (status flips). Every status change is a conditional
/// transition on the `watch` channel, so a flip is atomic and wakes a paused
/// worker at once.
pub struct Job<D> {
    destination: D,
    lines: LineBuffer,
    delay: Duration,
    /// Index of the next undelivered line; never decreases
    cursor: AtomicUsize,
    state: watch::Sender<JobState>,
    /// Context that last started or resumed the job
    origin: Mutex<ContextId>,
    metrics: JobMetrics,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl<D: Destination> Job<D> {
    /// New job in `Running` state with its cursor on the first line
    pub fn new(destination: D, lines: LineBuffer, delay: Duration, origin: ContextId) -> Self {
        let (state, _) = watch::channel(JobState::Running);
        Self {
            destination,
            lines,
            delay,
            cursor: AtomicUsize::new(0),
            state,
            origin: Mutex::new(origin),
            metrics: JobMetrics::new(),
            worker: Mutex::new(None),
        }
    }

    pub fn id(&self) -> &DestinationId {
        self.destination.id()
    }

    pub fn destination(&self) -> &D {
        &self.destination
    }

    pub fn lines(&self) -> &LineBuffer {
        &self.lines
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn cursor(&self) -> usize {
        self.cursor.load(Ordering::Acquire)
    }

    pub fn remaining(&self) -> usize {
        self.lines.len() - self.cursor()
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor() >= self.lines.len()
    }

    pub fn state(&self) -> JobState {
        *self.state.borrow()
    }

    pub fn metrics(&self) -> &JobMetrics {
        &self.metrics
    }

    pub fn origin(&self) -> ContextId {
        self.origin
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_origin(&self, context: &ContextId) {
        *self.origin.lock().unwrap_or_else(PoisonError::into_inner) = context.clone();
    }

    /// Subscribe to state changes (used by the worker)
    pub fn subscribe(&self) -> watch::Receiver<JobState> {
        self.state.subscribe()
    }

    /// `Running -> Paused(reason)`; false if the job was not running
    pub fn pause(&self, reason: PauseReason) -> bool {
        let paused = self.transition(|state| state.is_running(), JobState::Paused(reason));
        if paused {
            match reason {
                PauseReason::Operator => self.metrics.inc_pause_count(),
                PauseReason::Unreachable => self.metrics.inc_auto_pause_count(),
            }
        }
        paused
    }

    /// `Paused -> Running`; false if the job was not paused
    pub fn resume(&self) -> bool {
        let resumed = self.transition(|state| state.is_paused(), JobState::Running);
        if resumed {
            self.metrics.inc_resume_count();
        }
        resumed
    }

    /// Move to the absorbing state; false if already terminated
    ///
    /// Callers hold the registry lock so removal and termination are observed
    /// together.
    pub(crate) fn terminate(&self) -> bool {
        self.transition(|state| !state.is_terminated(), JobState::Terminated)
    }

    /// Advance the cursor past a delivered line
    pub(crate) fn advance(&self) -> usize {
        self.metrics.inc_lines_delivered();
        self.cursor.fetch_add(1, Ordering::AcqRel) + 1
    }

    pub(crate) fn attach_worker(&self, handle: JoinHandle<()>) {
        *self.worker.lock().unwrap_or_else(PoisonError::into_inner) = Some(handle);
    }

    pub(crate) fn take_worker(&self) -> Option<JoinHandle<()>> {
        self.worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    pub fn summary(&self) -> JobSummary {
        JobSummary {
            destination: self.id().clone(),
            state: self.state(),
            delivered: self.cursor(),
            total: self.lines.len(),
            delay: self.delay,
        }
    }

    fn transition(&self, allowed: impl Fn(&JobState) -> bool, next: JobState) -> bool {
        self.state.send_if_modified(|state| {
            if allowed(state) {
                *state = next;
                true
            } else {
                false
            }
        })
    }
}
