//! FileDestination - appends lines to a file

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use contracts::{Destination, DestinationId, PasteError};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::{debug, instrument};

use super::Presence;

/// Configuration for FileDestination
#[derive(Debug, Clone)]
pub struct FileDestinationConfig {
    /// File the lines are appended to
    pub path: PathBuf,
}

impl FileDestinationConfig {
    /// Create config from params map
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self, String> {
        let path = params
            .get("path")
            .map(PathBuf::from)
            .ok_or_else(|| "missing 'path' parameter".to_string())?;
        Ok(Self { path })
    }
}

/// Destination that appends each line to a file.
///
/// Reachable while present and while the parent directory exists; a removed
/// directory reads like a closed window. The directory state is cached and
/// only refreshed by [`FileDestination::refresh`] or a failed write, so
/// `is_reachable` never touches the filesystem.
#[derive(Debug, Clone)]
pub struct FileDestination {
    id: DestinationId,
    config: FileDestinationConfig,
    presence: Presence,
    directory: Presence,
}

impl FileDestination {
    pub fn new(id: DestinationId, config: FileDestinationConfig) -> Self {
        Self {
            id,
            config,
            presence: Presence::default(),
            directory: Presence::default(),
        }
    }

    /// Create from params map (for the factory)
    pub fn from_params(id: DestinationId, params: &HashMap<String, String>) -> Result<Self, String> {
        let config = FileDestinationConfig::from_params(params)?;
        Ok(Self::new(id, config))
    }

    pub fn path(&self) -> &Path {
        &self.config.path
    }

    pub fn presence(&self) -> &Presence {
        &self.presence
    }

    /// Re-check that the parent directory exists; returns the new state
    pub async fn refresh(&self) -> bool {
        let exists = match self.config.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => tokio::fs::metadata(parent)
                .await
                .is_ok_and(|meta| meta.is_dir()),
            _ => true,
        };
        self.directory.set(exists);
        exists
    }
}

impl Destination for FileDestination {
    fn id(&self) -> &DestinationId {
        &self.id
    }

    fn is_reachable(&self) -> bool {
        self.presence.is_present() && self.directory.is_present()
    }

    #[instrument(
        name = "file_destination_write",
        skip(self, line),
        fields(destination = %self.id, path = %self.config.path.display())
    )]
    async fn write(&self, line: &str) -> Result<(), PasteError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.config.path)
            .await
            .map_err(|e| {
                if e.kind() == ErrorKind::NotFound {
                    self.directory.set(false);
                }
                PasteError::delivery_write(&self.id, e.to_string())
            })?;

        let mut buf = String::with_capacity(line.len() + 1);
        buf.push_str(line);
        buf.push('\n');

        file.write_all(buf.as_bytes())
            .await
            .map_err(|e| PasteError::delivery_write(&self.id, e.to_string()))?;
        file.flush()
            .await
            .map_err(|e| PasteError::delivery_write(&self.id, e.to_string()))?;

        debug!(bytes = buf.len(), "Line appended");
        Ok(())
    }
}
