//! Notifier implementations

use std::sync::{Mutex, MutexGuard, PoisonError};

use contracts::{ContextId, Notice, Notifier};
use tracing::info;

/// Writes every notice to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, context: &ContextId, notice: &Notice) {
        info!(context = %context, "{notice}");
    }
}

/// Keeps every notice in memory, in delivery order
///
/// Used by tests and by hosts that poll for notices instead of pushing them.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<(ContextId, Notice)>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<(ContextId, Notice)> {
        self.lock().clone()
    }

    /// Rendered notices, in order
    pub fn messages(&self) -> Vec<String> {
        self.lock().iter().map(|(_, n)| n.to_string()).collect()
    }

    /// Rendered notices addressed to `context`
    pub fn messages_for(&self, context: &str) -> Vec<String> {
        self.lock()
            .iter()
            .filter(|(ctx, _)| ctx == context)
            .map(|(_, n)| n.to_string())
            .collect()
    }

    /// Number of notices whose rendered text contains `needle`
    pub fn count_containing(&self, needle: &str) -> usize {
        self.lock()
            .iter()
            .filter(|(_, n)| n.to_string().contains(needle))
            .count()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, Vec<(ContextId, Notice)>> {
        self.notices.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, context: &ContextId, notice: &Notice) {
        self.lock().push((context.clone(), notice.clone()));
    }
}
