//! Paste metrics
//!
//! Prometheus counters for the job lifecycle, plus an in-memory aggregator
//! that turns the notice stream into a session summary.

use contracts::Notice;
use metrics::{counter, gauge, histogram};

/// How a job left the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOutcome {
    /// Every line was delivered
    Completed,
    /// Cancelled, replaced or shut down
    Cancelled,
    /// Abandoned after a delivery error
    Failed,
}

impl JobOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobOutcome::Completed => "completed",
            JobOutcome::Cancelled => "cancelled",
            JobOutcome::Failed => "failed",
        }
    }
}

pub fn record_job_started() {
    counter!("linepacer_jobs_started_total").increment(1);
}

pub fn record_line_delivered() {
    counter!("linepacer_lines_delivered_total").increment(1);
}

pub fn record_auto_pause() {
    counter!("linepacer_jobs_auto_paused_total").increment(1);
}

/// Record a job leaving the registry
pub fn record_job_finished(outcome: JobOutcome) {
    match outcome {
        JobOutcome::Completed => counter!("linepacer_jobs_completed_total").increment(1),
        JobOutcome::Failed => counter!("linepacer_delivery_failures_total").increment(1),
        JobOutcome::Cancelled => {}
    }
    counter!(
        "linepacer_jobs_finished_total",
        "outcome" => outcome.as_str()
    )
    .increment(1);
}

/// Number of jobs currently registered
pub fn set_jobs_active(count: usize) {
    gauge!("linepacer_jobs_active").set(count as f64);
}

/// How far past its scheduled time a line went out
pub fn record_tick_lateness_ms(lateness_ms: f64) {
    histogram!("linepacer_tick_lateness_ms").record(lateness_ms);
}

/// Session aggregator
///
/// Fed with every notice the host shows; produces the summary printed on
/// exit.
#[derive(Debug, Clone, Default)]
pub struct SessionStats {
    pub jobs_started: u64,
    pub jobs_completed: u64,
    pub jobs_cancelled: u64,
    pub jobs_failed: u64,
    pub auto_pauses: u64,
    pub rejected: u64,

    /// Lines per started paste
    pub paste_size: RunningStats,
}

impl SessionStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, notice: &Notice) {
        match notice {
            Notice::Started { lines, .. } => {
                self.jobs_started += 1;
                self.paste_size.push(*lines as f64);
            }
            Notice::Completed { .. } => self.jobs_completed += 1,
            Notice::Cancelled { .. } | Notice::Replaced { .. } => self.jobs_cancelled += 1,
            Notice::DeliveryFailed { .. } => self.jobs_failed += 1,
            Notice::Unreachable { .. } => self.auto_pauses += 1,
            Notice::Rejected { .. } => self.rejected += 1,
            Notice::Stopped { .. }
            | Notice::Resumed { .. }
            | Notice::Status { .. }
            | Notice::Usage
            | Notice::Selected { .. }
            | Notice::Presence { .. } => {}
        }
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            jobs_started: self.jobs_started,
            jobs_completed: self.jobs_completed,
            jobs_cancelled: self.jobs_cancelled,
            jobs_failed: self.jobs_failed,
            auto_pauses: self.auto_pauses,
            rejected: self.rejected,
            paste_size: StatsSummary::from(&self.paste_size),
        }
    }
}

/// Summary report
#[derive(Debug, Clone, Default)]
pub struct SessionSummary {
    pub jobs_started: u64,
    pub jobs_completed: u64,
    pub jobs_cancelled: u64,
    pub jobs_failed: u64,
    pub auto_pauses: u64,
    pub rejected: u64,
    pub paste_size: StatsSummary,
}

impl std::fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Paste Session Summary ===")?;
        writeln!(f, "Pastes started: {}", self.jobs_started)?;
        writeln!(f, "Pastes completed: {}", self.jobs_completed)?;
        writeln!(f, "Pastes cancelled: {}", self.jobs_cancelled)?;
        writeln!(f, "Pastes failed: {}", self.jobs_failed)?;
        writeln!(f, "Auto-pauses: {}", self.auto_pauses)?;
        writeln!(f, "Rejected commands: {}", self.rejected)?;
        writeln!(f, "Paste size (lines): {}", self.paste_size)
    }
}

/// Statistics summary
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.0}, max={:.0}, mean={:.1}, std={:.1} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// Online statistics (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// Sample variance
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}
