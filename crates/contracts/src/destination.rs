//! Destination and Notifier traits - host-facing interfaces
//!
//! The scheduler only ever talks to the host through these two seams.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

use crate::{ContextId, Notice, PasteError};

/// Stable identity of a paste destination.
///
/// Two identities are equal when network, server and channel all match. The
/// identity outlives any particular host handle, so a destination that drops
/// off and comes back is still the same registry key.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct DestinationId {
    network: Arc<str>,
    server: Arc<str>,
    channel: Arc<str>,
}

impl DestinationId {
    /// Create a destination identity
    pub fn new(network: &str, server: &str, channel: &str) -> Self {
        Self {
            network: Arc::from(network),
            server: Arc::from(server),
            channel: Arc::from(channel),
        }
    }

    pub fn network(&self) -> &str {
        &self.network
    }

    pub fn server(&self) -> &str {
        &self.server
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }
}

impl fmt::Display for DestinationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.channel, self.network)
    }
}

impl fmt::Debug for DestinationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DestinationId({}/{}/{})",
            self.network, self.server, self.channel
        )
    }
}

// Serialized as a (network, server, channel) tuple.
impl Serialize for DestinationId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (self.network(), self.server(), self.channel()).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for DestinationId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let (network, server, channel) = <(String, String, String)>::deserialize(deserializer)?;
        Ok(Self::new(&network, &server, &channel))
    }
}

/// Live endpoint lines are pasted into
///
/// Implemented by an adapter over whatever host binding exists. The scheduler
/// depends on nothing beyond these operations plus the identity.
#[trait_variant::make(Destination: Send)]
pub trait LocalDestination {
    /// Stable identity (registry key)
    fn id(&self) -> &DestinationId;

    /// Whether the host currently considers the destination valid to write to
    fn is_reachable(&self) -> bool;

    /// Write one line
    ///
    /// # Errors
    /// Returns a delivery error; the job that issued the write terminates.
    async fn write(&self, line: &str) -> Result<(), PasteError>;
}

/// Operator-facing output surface
///
/// Every notice is addressed to the context that issued the command, never to
/// the paste destination.
pub trait Notifier: Send + Sync + 'static {
    fn notify(&self, context: &ContextId, notice: &Notice);
}

impl<N: Notifier + ?Sized> Notifier for Arc<N> {
    fn notify(&self, context: &ContextId, notice: &Notice) {
        (**self).notify(context, notice)
    }
}
