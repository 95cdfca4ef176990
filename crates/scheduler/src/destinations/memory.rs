//! MemoryDestination - records lines in memory
//!
//! Test double with switchable reachability and failure injection.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use contracts::{Destination, DestinationId, PasteError};

use super::Presence;

#[derive(Debug, Default)]
struct Recorded {
    lines: Mutex<Vec<String>>,
    fail_writes: AtomicBool,
    /// Drop presence once this many lines were written (0 = never)
    vanish_after: AtomicUsize,
    write_delay: Mutex<Duration>,
}

/// Destination that keeps every written line
#[derive(Debug, Clone)]
pub struct MemoryDestination {
    id: DestinationId,
    presence: Presence,
    recorded: Arc<Recorded>,
}

impl MemoryDestination {
    /// Destination `channel` on the `memory` network
    pub fn new(channel: &str) -> Self {
        Self::with_id(DestinationId::new("memory", "localhost", channel))
    }

    pub fn with_id(id: DestinationId) -> Self {
        Self {
            id,
            presence: Presence::default(),
            recorded: Arc::new(Recorded::default()),
        }
    }

    /// Lines written so far
    pub fn lines(&self) -> Vec<String> {
        self.recorded
            .lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn write_count(&self) -> usize {
        self.recorded
            .lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn presence(&self) -> &Presence {
        &self.presence
    }

    pub fn set_reachable(&self, reachable: bool) {
        self.presence.set(reachable);
    }

    /// Make every following write fail
    pub fn fail_writes(&self, fail: bool) {
        self.recorded.fail_writes.store(fail, Ordering::Release);
    }

    /// Become unreachable right after the `count`-th line is written
    pub fn vanish_after(&self, count: usize) {
        self.recorded.vanish_after.store(count, Ordering::Release);
    }

    /// Make each write take `delay`
    pub fn set_write_delay(&self, delay: Duration) {
        *self
            .recorded
            .write_delay
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = delay;
    }
}

impl Destination for MemoryDestination {
    fn id(&self) -> &DestinationId {
        &self.id
    }

    fn is_reachable(&self) -> bool {
        self.presence.is_present()
    }

    async fn write(&self, line: &str) -> Result<(), PasteError> {
        let delay = *self
            .recorded
            .write_delay
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        if self.recorded.fail_writes.load(Ordering::Acquire) {
            return Err(PasteError::delivery_write(&self.id, "mock failure"));
        }

        let written = {
            let mut lines = self
                .recorded
                .lines
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            lines.push(line.to_string());
            lines.len()
        };

        if written == self.recorded.vanish_after.load(Ordering::Acquire) {
            self.presence.set(false);
        }
        Ok(())
    }
}
