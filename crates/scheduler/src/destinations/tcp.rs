//! TcpDestination - writes lines to a TCP peer

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use contracts::{Destination, DestinationId, PasteError};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};

use super::Presence;

/// Configuration for TcpDestination
#[derive(Debug, Clone)]
pub struct TcpDestinationConfig {
    /// Peer address
    pub addr: SocketAddr,
}

impl TcpDestinationConfig {
    /// Create config from params map
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self, String> {
        let addr_str = params
            .get("addr")
            .ok_or_else(|| "missing 'addr' parameter".to_string())?;

        let addr: SocketAddr = addr_str
            .parse()
            .map_err(|e| format!("invalid address '{}': {}", addr_str, e))?;

        Ok(Self { addr })
    }
}

#[derive(Debug)]
struct Connection {
    stream: Mutex<Option<TcpStream>>,
    connected: AtomicBool,
}

/// Destination that sends one `\n`-terminated line per write.
///
/// Reachable while present and connected. A failed write drops the
/// connection; [`TcpDestination::reconnect`] brings it back.
#[derive(Debug, Clone)]
pub struct TcpDestination {
    id: DestinationId,
    config: TcpDestinationConfig,
    presence: Presence,
    connection: Arc<Connection>,
}

impl TcpDestination {
    /// Connect to the configured peer
    #[instrument(name = "tcp_destination_new", skip(id, config), fields(addr = %config.addr))]
    pub async fn connect(id: DestinationId, config: TcpDestinationConfig) -> std::io::Result<Self> {
        let stream = TcpStream::connect(config.addr).await?;
        stream.set_nodelay(true)?;
        debug!(destination = %id, "TcpDestination connected");

        Ok(Self {
            id,
            config,
            presence: Presence::default(),
            connection: Arc::new(Connection {
                stream: Mutex::new(Some(stream)),
                connected: AtomicBool::new(true),
            }),
        })
    }

    /// Create from params map (for the factory)
    pub async fn from_params(
        id: DestinationId,
        params: &HashMap<String, String>,
    ) -> Result<Self, String> {
        let config = TcpDestinationConfig::from_params(params)?;
        Self::connect(id, config)
            .await
            .map_err(|e| format!("connect failed: {}", e))
    }

    pub fn presence(&self) -> &Presence {
        &self.presence
    }

    pub fn is_connected(&self) -> bool {
        self.connection.connected.load(Ordering::Acquire)
    }

    /// Re-establish a dropped connection
    pub async fn reconnect(&self) -> std::io::Result<()> {
        let stream = TcpStream::connect(self.config.addr).await?;
        stream.set_nodelay(true)?;
        *self.connection.stream.lock().await = Some(stream);
        self.connection.connected.store(true, Ordering::Release);
        debug!(destination = %self.id, "TcpDestination reconnected");
        Ok(())
    }
}

impl Destination for TcpDestination {
    fn id(&self) -> &DestinationId {
        &self.id
    }

    fn is_reachable(&self) -> bool {
        self.presence.is_present() && self.is_connected()
    }

    #[instrument(
        name = "tcp_destination_write",
        skip(self, line),
        fields(destination = %self.id, addr = %self.config.addr)
    )]
    async fn write(&self, line: &str) -> Result<(), PasteError> {
        let mut guard = self.connection.stream.lock().await;
        let stream = guard
            .as_mut()
            .ok_or_else(|| PasteError::delivery_write(&self.id, "not connected"))?;

        let mut buf = Vec::with_capacity(line.len() + 1);
        buf.extend_from_slice(line.as_bytes());
        buf.push(b'\n');

        if let Err(e) = stream.write_all(&buf).await {
            warn!(error = %e, "TCP write failed, dropping connection");
            *guard = None;
            self.connection.connected.store(false, Ordering::Release);
            return Err(PasteError::delivery_write(&self.id, e.to_string()));
        }
        Ok(())
    }
}
