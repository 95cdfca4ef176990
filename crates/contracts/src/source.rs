//! SourceLoader trait - turns a path into decoded text

use std::path::Path;

use crate::PasteError;

/// Loads a whole source before any job is created.
///
/// Implementations strip a leading byte-order mark and decode UTF-8; there are
/// no partial-file jobs.
#[trait_variant::make(SourceLoader: Send)]
pub trait LocalSourceLoader {
    /// # Errors
    /// `PasteError::SourceLoad` with kind `Io` or `Decode`.
    async fn load(&self, path: &Path) -> Result<String, PasteError>;
}
