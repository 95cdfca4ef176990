//! Byte-order-mark handling and UTF-8 decoding

use contracts::{PasteError, SourceLoadKind};

/// UTF-8 encoded byte-order mark
pub const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Drop a leading UTF-8 BOM, if any
pub fn strip_bom(bytes: &[u8]) -> &[u8] {
    bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes)
}

/// Decode raw source bytes into text
///
/// # Errors
/// `PasteError::SourceLoad` with kind `Decode` when the bytes are not UTF-8.
pub fn decode_source(path: &str, mut bytes: Vec<u8>) -> Result<String, PasteError> {
    let bom_len = bytes.len() - strip_bom(&bytes).len();
    bytes.drain(..bom_len);

    String::from_utf8(bytes).map_err(|e| {
        PasteError::source_load(path, SourceLoadKind::Decode, e.utf8_error().to_string())
    })
}
