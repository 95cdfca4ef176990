//! # Scheduler
//!
//! Paced line delivery.
//!
//! Responsibilities:
//! - One job per destination, held in a shared registry
//! - One worker task per job, emitting a line per tick
//! - Operator commands (paste / stop / resume / cancel / status)
//! - Auto-pause when a destination becomes unreachable

pub mod command;
pub mod destinations;
pub mod error;
pub mod job;
pub mod metrics;
pub mod notifier;
pub mod paster;
pub mod registry;
mod worker;

pub use command::{parse_delay, Command, CommandDispatcher};
pub use contracts::{Destination, Notifier};
pub use destinations::{
    create_destination, destination_id, FileDestination, HostDestination, LogDestination,
    MemoryDestination, Presence, TcpDestination,
};
pub use error::SchedulerError;
pub use job::Job;
pub use metrics::{JobMetrics, MetricsSnapshot};
pub use notifier::{LogNotifier, RecordingNotifier};
pub use paster::Paster;
pub use registry::JobRegistry;
pub use worker::normalize_line;
