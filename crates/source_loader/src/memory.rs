//! In-memory source loader
//!
//! Used by tests and demos that should not touch the filesystem.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use contracts::{PasteError, SourceLoadKind, SourceLoader};

use crate::decode::decode_source;

/// Serves sources from a path -> bytes table
#[derive(Debug, Default)]
pub struct MemorySourceLoader {
    sources: Mutex<HashMap<PathBuf, Vec<u8>>>,
}

impl MemorySourceLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `bytes` under `path`, replacing any previous content
    pub fn insert(&self, path: impl Into<PathBuf>, bytes: impl Into<Vec<u8>>) {
        self.sources
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.into(), bytes.into());
    }

    /// Builder-style [`MemorySourceLoader::insert`]
    pub fn with_source(self, path: impl Into<PathBuf>, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(path, bytes);
        self
    }
}

impl SourceLoader for MemorySourceLoader {
    async fn load(&self, path: &Path) -> Result<String, PasteError> {
        let display = path.display().to_string();
        let bytes = self
            .sources
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
            .cloned()
            .ok_or_else(|| {
                PasteError::source_load(&display, SourceLoadKind::Io, "No such file or directory")
            })?;
        decode_source(&display, bytes)
    }
}
