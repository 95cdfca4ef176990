//! Job state types shared between the scheduler and status reporting

use serde::Serialize;
use std::fmt;
use std::time::Duration;

use crate::DestinationId;

/// Why a job is paused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PauseReason {
    /// Operator issued `stop`
    Operator,
    /// Destination was found unreachable at a delivery tick
    Unreachable,
}

/// Job lifecycle
///
/// `Terminated` is absorbing; a terminated job is never present in the
/// registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    Running,
    Paused(PauseReason),
    Terminated,
}

impl JobState {
    pub fn is_running(&self) -> bool {
        matches!(self, JobState::Running)
    }

    pub fn is_paused(&self) -> bool {
        matches!(self, JobState::Paused(_))
    }

    pub fn is_terminated(&self) -> bool {
        matches!(self, JobState::Terminated)
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobState::Running => write!(f, "pasting"),
            JobState::Paused(PauseReason::Operator) => write!(f, "stopped"),
            JobState::Paused(PauseReason::Unreachable) => write!(f, "stopped (unreachable)"),
            JobState::Terminated => write!(f, "finished"),
        }
    }
}

/// Point-in-time view of one job (for status reporting)
#[derive(Debug, Clone, Serialize)]
pub struct JobSummary {
    pub destination: DestinationId,
    pub state: JobState,
    pub delivered: usize,
    pub total: usize,
    #[serde(with = "duration_ms")]
    pub delay: Duration,
}

impl JobSummary {
    pub fn remaining(&self) -> usize {
        self.total - self.delivered
    }
}

mod duration_ms {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(delay: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(delay.as_millis() as u64)
    }
}
