//! JobRegistry - one job per destination

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use contracts::{Destination, DestinationId};

use crate::job::Job;

/// Process-wide table of active jobs keyed by destination identity.
///
/// Every operation runs under one lock, which makes them linearizable with
/// respect to each other. Terminal transitions happen while the lock is held,
/// so a terminated job is never observable in the table.
pub struct JobRegistry<D> {
    jobs: Mutex<HashMap<DestinationId, Arc<Job<D>>>>,
}

impl<D: Destination> JobRegistry<D> {
    pub fn new() -> Self {
        Self {
            jobs: Mutex::new(HashMap::new()),
        }
    }

    /// Insert `job` iff its destination has no job yet
    pub fn try_create(&self, job: Arc<Job<D>>) -> bool {
        let mut jobs = self.lock();
        if jobs.contains_key(job.id()) {
            return false;
        }
        jobs.insert(job.id().clone(), job);
        true
    }

    /// Swap in `job`, terminating and returning whatever it displaced
    pub fn replace(&self, job: Arc<Job<D>>) -> Option<Arc<Job<D>>> {
        let mut jobs = self.lock();
        let previous = jobs.insert(job.id().clone(), job);
        if let Some(previous) = &previous {
            previous.terminate();
        }
        previous
    }

    pub fn find(&self, id: &DestinationId) -> Option<Arc<Job<D>>> {
        self.lock().get(id).cloned()
    }

    /// Remove and terminate the job for `id`; idempotent
    pub fn remove(&self, id: &DestinationId) -> Option<Arc<Job<D>>> {
        let removed = self.lock().remove(id);
        if let Some(job) = &removed {
            job.terminate();
        }
        removed
    }

    /// Remove `job` only if it is still the registered entry, then terminate it.
    ///
    /// Returns true if this call performed the terminal transition; false
    /// means someone else (cancel, replace, shutdown) already did and owns
    /// the notice.
    pub fn retire(&self, job: &Arc<Job<D>>) -> bool {
        let mut jobs = self.lock();
        if jobs
            .get(job.id())
            .is_some_and(|current| Arc::ptr_eq(current, job))
        {
            jobs.remove(job.id());
        }
        job.terminate()
    }

    /// Snapshot for status reporting
    pub fn list_all(&self) -> Vec<(DestinationId, Arc<Job<D>>)> {
        self.lock()
            .iter()
            .map(|(id, job)| (id.clone(), Arc::clone(job)))
            .collect()
    }

    /// Empty the table, terminating every job (shutdown)
    pub fn drain(&self) -> Vec<Arc<Job<D>>> {
        let mut jobs = self.lock();
        jobs.drain()
            .map(|(_, job)| {
                job.terminate();
                job
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<DestinationId, Arc<Job<D>>>> {
        // A panic while holding the lock cannot leave the map half-updated.
        self.jobs.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<D: Destination> Default for JobRegistry<D> {
    fn default() -> Self {
        Self::new()
    }
}
