//! Scheduler error types

use thiserror::Error;

/// Scheduler-specific errors
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Destination creation error
    #[error("failed to create destination '{name}': {message}")]
    DestinationCreation { name: String, message: String },

    /// Paste error (from contract)
    #[error(transparent)]
    Contract(#[from] contracts::PasteError),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl SchedulerError {
    /// Create a destination creation error
    pub fn destination_creation(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DestinationCreation {
            name: name.into(),
            message: message.into(),
        }
    }
}
