//! LogDestination - pastes lines into the log via tracing

use contracts::{Destination, DestinationId, PasteError};
use tracing::{info, instrument};

use super::Presence;

/// Destination that logs every line
#[derive(Debug, Clone)]
pub struct LogDestination {
    id: DestinationId,
    presence: Presence,
}

impl LogDestination {
    pub fn new(id: DestinationId) -> Self {
        Self {
            id,
            presence: Presence::default(),
        }
    }

    pub fn presence(&self) -> &Presence {
        &self.presence
    }
}

impl Destination for LogDestination {
    fn id(&self) -> &DestinationId {
        &self.id
    }

    fn is_reachable(&self) -> bool {
        self.presence.is_present()
    }

    #[instrument(name = "log_destination_write", skip(self, line), fields(destination = %self.id))]
    async fn write(&self, line: &str) -> Result<(), PasteError> {
        info!(destination = %self.id, line, "Line pasted");
        Ok(())
    }
}
