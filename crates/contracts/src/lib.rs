//! # Contracts
//!
//! Frozen interface contracts shared by every linepacer crate: the data
//! structures that flow between the command layer and the per-destination
//! scheduler, and the traits the host environment implements.
//!
//! ## Timing Model
//! - Each job owns a fixed delay between two consecutive deliveries
//! - Wall-clock drift under load is acceptable; ordering within one job is not negotiable

mod config;
mod context_id;
mod destination;
mod error;
mod job;
mod line_buffer;
mod notice;
mod source;

pub use config::*;
pub use context_id::ContextId;
pub use destination::{Destination, DestinationId, Notifier};
pub use error::*;
pub use job::*;
pub use line_buffer::LineBuffer;
pub use notice::{Notice, NOTICE_TAG, USAGE};
pub use source::SourceLoader;
