//! Notice - operator-facing status messages

use std::fmt;

use crate::{DestinationId, JobSummary};

/// Product tag every notice starts with
pub const NOTICE_TAG: &str = "linepacer";

/// One human-readable notice for the output surface.
///
/// Every state transition and every rejected command produces exactly one.
#[derive(Debug, Clone)]
pub enum Notice {
    Started {
        destination: DestinationId,
        lines: usize,
    },
    /// Prior job cancelled by a `replace` start
    Replaced { destination: DestinationId },
    Stopped {
        destination: DestinationId,
        remaining: usize,
    },
    Resumed {
        destination: DestinationId,
        remaining: usize,
    },
    Completed { destination: DestinationId },
    /// Auto-pause after the destination became unreachable
    Unreachable {
        destination: DestinationId,
        remaining: usize,
    },
    Cancelled {
        destination: DestinationId,
        remaining: usize,
    },
    DeliveryFailed {
        destination: DestinationId,
        message: String,
    },
    /// Command rejected; carries the rendered error
    Rejected { message: String },
    Status { jobs: Vec<JobSummary> },
    Usage,
    /// Host switched the current destination
    Selected { destination: DestinationId },
    /// Host changed a destination's reachability
    Presence {
        destination: DestinationId,
        reachable: bool,
    },
}

pub const USAGE: &str = "\
usage:
  paste <file> [delay_ms]  paste <file> line by line to the current destination
  stop                     pause pasting to the current destination
  resume                   resume a paused paste
  cancel                   discard the paste to the current destination
  status                   list active pastes
  help                     show this text";

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{NOTICE_TAG}: ")?;
        match self {
            Notice::Started { destination, lines } => {
                write!(f, "pasting ({lines} lines) to: {destination}.")
            }
            Notice::Replaced { destination } => {
                write!(f, "replacing current message to: {destination}.")
            }
            Notice::Stopped {
                destination,
                remaining,
            } => write!(
                f,
                "stopped pasting ({remaining} pending lines) to: {destination}."
            ),
            Notice::Resumed {
                destination,
                remaining,
            } => write!(
                f,
                "resumed pasting ({remaining} pending lines) to: {destination}."
            ),
            Notice::Completed { destination } => {
                write!(f, "no more lines, finished pasting to: {destination}.")
            }
            Notice::Unreachable {
                destination,
                remaining,
            } => write!(
                f,
                "stopping, target unreachable ({remaining} pending lines): {destination}."
            ),
            Notice::Cancelled {
                destination,
                remaining,
            } => write!(
                f,
                "cancelled pasting ({remaining} pending lines) to: {destination}."
            ),
            Notice::DeliveryFailed {
                destination,
                message,
            } => write!(f, "giving up on {destination}: {message}."),
            Notice::Rejected { message } => write!(f, "{message}."),
            Notice::Status { jobs } if jobs.is_empty() => write!(f, "nothing being pasted."),
            Notice::Status { jobs } => {
                write!(f, "{} active paste(s):", jobs.len())?;
                for job in jobs {
                    write!(
                        f,
                        "\n  {} - {} - {}/{} lines, {} pending, every {}ms",
                        job.destination,
                        job.state,
                        job.delivered,
                        job.total,
                        job.remaining(),
                        job.delay.as_millis()
                    )?;
                }
                Ok(())
            }
            Notice::Usage => write!(f, "{USAGE}"),
            Notice::Selected { destination } => {
                write!(f, "current destination: {destination}.")
            }
            Notice::Presence {
                destination,
                reachable: true,
            } => write!(f, "{destination} is reachable."),
            Notice::Presence {
                destination,
                reachable: false,
            } => write!(f, "{destination} is unreachable."),
        }
    }
}
