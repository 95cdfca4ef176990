//! Destination implementations
//!
//! Contains LogDestination, FileDestination, TcpDestination and the
//! in-memory test double, plus the factory that builds them from config.

mod file;
mod log;
mod memory;
mod presence;
mod tcp;

pub use self::file::{FileDestination, FileDestinationConfig};
pub use self::log::LogDestination;
pub use self::memory::MemoryDestination;
pub use self::presence::Presence;
pub use self::tcp::{TcpDestination, TcpDestinationConfig};

use contracts::{Destination, DestinationConfig, DestinationId, DestinationKind, PasteError};
use tracing::instrument;

use crate::error::SchedulerError;

/// Any destination the host can build from configuration
#[derive(Debug, Clone)]
pub enum HostDestination {
    Log(LogDestination),
    File(FileDestination),
    Tcp(TcpDestination),
}

impl HostDestination {
    pub fn presence(&self) -> &Presence {
        match self {
            HostDestination::Log(d) => d.presence(),
            HostDestination::File(d) => d.presence(),
            HostDestination::Tcp(d) => d.presence(),
        }
    }

    pub fn kind(&self) -> DestinationKind {
        match self {
            HostDestination::Log(_) => DestinationKind::Log,
            HostDestination::File(_) => DestinationKind::File,
            HostDestination::Tcp(_) => DestinationKind::Tcp,
        }
    }

    /// Host regained the destination (rejoin)
    pub async fn attach(&self) -> Result<(), SchedulerError> {
        match self {
            HostDestination::Tcp(d) if !d.is_connected() => d.reconnect().await?,
            HostDestination::File(d) => {
                d.refresh().await;
            }
            _ => {}
        }
        self.presence().set(true);
        Ok(())
    }

    /// Host lost the destination (part / close)
    pub fn detach(&self) {
        self.presence().set(false);
    }
}

impl Destination for HostDestination {
    fn id(&self) -> &DestinationId {
        match self {
            HostDestination::Log(d) => d.id(),
            HostDestination::File(d) => d.id(),
            HostDestination::Tcp(d) => d.id(),
        }
    }

    fn is_reachable(&self) -> bool {
        match self {
            HostDestination::Log(d) => d.is_reachable(),
            HostDestination::File(d) => d.is_reachable(),
            HostDestination::Tcp(d) => d.is_reachable(),
        }
    }

    async fn write(&self, line: &str) -> Result<(), PasteError> {
        match self {
            HostDestination::Log(d) => d.write(line).await,
            HostDestination::File(d) => d.write(line).await,
            HostDestination::Tcp(d) => d.write(line).await,
        }
    }
}

/// Identity a configured destination is registered under
pub fn destination_id(config: &DestinationConfig) -> DestinationId {
    let server = match config.kind {
        DestinationKind::Log => "log",
        DestinationKind::File => config.params.get("path").map_or("file", String::as_str),
        DestinationKind::Tcp => config.params.get("addr").map_or("tcp", String::as_str),
    };
    DestinationId::new(&config.network, server, &config.name)
}

/// Create a HostDestination from configuration
#[instrument(
    name = "create_destination",
    skip(config),
    fields(destination = %config.name, kind = ?config.kind)
)]
pub async fn create_destination(
    config: &DestinationConfig,
) -> Result<HostDestination, SchedulerError> {
    let id = destination_id(config);
    match config.kind {
        DestinationKind::Log => Ok(HostDestination::Log(LogDestination::new(id))),
        DestinationKind::File => {
            let destination = FileDestination::from_params(id, &config.params)
                .map_err(|e| SchedulerError::destination_creation(&config.name, e))?;
            destination.refresh().await;
            Ok(HostDestination::File(destination))
        }
        DestinationKind::Tcp => TcpDestination::from_params(id, &config.params)
            .await
            .map(HostDestination::Tcp)
            .map_err(|e| SchedulerError::destination_creation(&config.name, e)),
    }
}
