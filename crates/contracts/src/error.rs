//! Layered error definitions
//!
//! Categorized by source: command / source / delivery / config

use thiserror::Error;

use crate::DestinationId;

/// Why a source file could not be turned into text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceLoadKind {
    /// File could not be read
    Io,
    /// Bytes are not valid UTF-8
    Decode,
}

/// Unified error type
///
/// Every error is local to the single command invocation or the single job
/// that raised it.
#[derive(Debug, Error)]
pub enum PasteError {
    // ===== Command Errors =====
    /// Start requested for a destination that already has a job
    #[error("already pasting to: {destination}")]
    AlreadyPasting { destination: DestinationId },

    /// Stop requested but nothing is running for the destination
    #[error("not pasting to: {destination}")]
    NoActiveJob { destination: DestinationId },

    /// Resume/cancel requested but no job exists for the destination
    #[error("no pending lines to: {destination}")]
    NoSuchJob { destination: DestinationId },

    /// Resume requested for a job that is not paused
    #[error("not paused, still pasting to: {destination}")]
    NotPaused { destination: DestinationId },

    /// Command line did not name a known action
    #[error("unknown action: {action}")]
    UnknownCommand { action: String },

    /// Command arguments missing or malformed
    #[error("{message}")]
    Usage { message: String },

    /// Operator-supplied delay rejected
    #[error("{message}")]
    InvalidDelay { message: String },

    /// Host does not know the named destination
    #[error("unknown destination: {name}")]
    UnknownDestination { name: String },

    // ===== Source Errors =====
    /// Source file could not be loaded
    #[error("unable to read: {path} - {message}")]
    SourceLoad {
        path: String,
        kind: SourceLoadKind,
        message: String,
    },

    /// Source is empty and the configured policy requires lines
    #[error("nothing to paste in: {path}")]
    EmptySource { path: String },

    // ===== Delivery Errors =====
    /// Destination vanished
    #[error("target unreachable: {destination}")]
    DestinationUnreachable { destination: DestinationId },

    /// Write failed despite apparent reachability
    #[error("write to {destination} failed: {message}")]
    DeliveryWrite {
        destination: DestinationId,
        message: String,
    },

    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl PasteError {
    pub fn already_pasting(destination: &DestinationId) -> Self {
        Self::AlreadyPasting {
            destination: destination.clone(),
        }
    }

    pub fn no_active_job(destination: &DestinationId) -> Self {
        Self::NoActiveJob {
            destination: destination.clone(),
        }
    }

    pub fn no_such_job(destination: &DestinationId) -> Self {
        Self::NoSuchJob {
            destination: destination.clone(),
        }
    }

    pub fn not_paused(destination: &DestinationId) -> Self {
        Self::NotPaused {
            destination: destination.clone(),
        }
    }

    pub fn unreachable(destination: &DestinationId) -> Self {
        Self::DestinationUnreachable {
            destination: destination.clone(),
        }
    }

    /// Create delivery write error
    pub fn delivery_write(destination: &DestinationId, message: impl Into<String>) -> Self {
        Self::DeliveryWrite {
            destination: destination.clone(),
            message: message.into(),
        }
    }

    /// Create source load error
    pub fn source_load(
        path: impl Into<String>,
        kind: SourceLoadKind,
        message: impl Into<String>,
    ) -> Self {
        Self::SourceLoad {
            path: path.into(),
            kind,
            message: message.into(),
        }
    }

    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage {
            message: message.into(),
        }
    }

    pub fn invalid_delay(message: impl Into<String>) -> Self {
        Self::InvalidDelay {
            message: message.into(),
        }
    }

    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }
}
