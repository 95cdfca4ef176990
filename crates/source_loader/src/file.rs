//! FileSourceLoader - reads sources from the local filesystem

use std::path::Path;

use contracts::{PasteError, SourceLoadKind, SourceLoader};
use metrics::counter;
use tracing::{debug, instrument, warn};

use crate::decode::decode_source;

/// Loads sources with `tokio::fs`
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSourceLoader;

impl FileSourceLoader {
    pub fn new() -> Self {
        Self
    }
}

impl SourceLoader for FileSourceLoader {
    #[instrument(name = "file_source_load", skip(self), fields(path = %path.display()))]
    async fn load(&self, path: &Path) -> Result<String, PasteError> {
        let source = path.display().to_string();

        let bytes = tokio::fs::read(path).await.map_err(|e| {
            warn!(path = %source, error = %e, "Source read failed");
            counter!("linepacer_source_failures_total", "kind" => "io").increment(1);
            PasteError::source_load(&source, SourceLoadKind::Io, e.to_string())
        })?;

        let byte_len = bytes.len();
        let text = decode_source(&source, bytes).inspect_err(|_| {
            counter!("linepacer_source_failures_total", "kind" => "decode").increment(1);
        })?;

        counter!("linepacer_sources_loaded_total").increment(1);
        debug!(path = %source, bytes = byte_len, "Source loaded");
        Ok(text)
    }
}
