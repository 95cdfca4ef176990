//! Per-job counters for status reporting

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for a single job
#[derive(Debug, Default)]
pub struct JobMetrics {
    /// Lines written to the destination
    lines_delivered: AtomicU64,
    /// Operator pauses
    pause_count: AtomicU64,
    /// Operator resumes
    resume_count: AtomicU64,
    /// Pauses caused by an unreachable destination
    auto_pause_count: AtomicU64,
    /// Failed writes (at most one, the job terminates on it)
    failure_count: AtomicU64,
}

impl JobMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines_delivered(&self) -> u64 {
        self.lines_delivered.load(Ordering::Relaxed)
    }

    pub fn inc_lines_delivered(&self) {
        self.lines_delivered.fetch_add(1, Ordering::Relaxed);
    }

    pub fn pause_count(&self) -> u64 {
        self.pause_count.load(Ordering::Relaxed)
    }

    pub fn inc_pause_count(&self) {
        self.pause_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn resume_count(&self) -> u64 {
        self.resume_count.load(Ordering::Relaxed)
    }

    pub fn inc_resume_count(&self) {
        self.resume_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn auto_pause_count(&self) -> u64 {
        self.auto_pause_count.load(Ordering::Relaxed)
    }

    pub fn inc_auto_pause_count(&self) {
        self.auto_pause_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn failure_count(&self) -> u64 {
        self.failure_count.load(Ordering::Relaxed)
    }

    pub fn inc_failure_count(&self) {
        self.failure_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            lines_delivered: self.lines_delivered(),
            pause_count: self.pause_count(),
            resume_count: self.resume_count(),
            auto_pause_count: self.auto_pause_count(),
            failure_count: self.failure_count(),
        }
    }
}

/// Snapshot of job metrics (for reporting)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub lines_delivered: u64,
    pub pause_count: u64,
    pub resume_count: u64,
    pub auto_pause_count: u64,
    pub failure_count: u64,
}
