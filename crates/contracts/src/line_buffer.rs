//! LineBuffer - immutable ordered lines of one paste

use crate::PasteError;

/// Ordered, immutable sequence of lines consumed sequentially by one job.
///
/// Splitting happens on already-decoded text; byte-order marks and decoding
/// are the loader's business. An empty buffer is legal and yields a job that
/// completes immediately.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineBuffer {
    lines: Vec<String>,
}

impl LineBuffer {
    /// Split `raw` on line boundaries (`\n` and `\r\n`)
    pub fn from_text(raw: &str) -> Self {
        Self {
            lines: raw.lines().map(str::to_owned).collect(),
        }
    }

    /// Like [`LineBuffer::from_text`] but rejects a source without lines
    ///
    /// # Errors
    /// `PasteError::EmptySource` when `raw` contains no line at all.
    pub fn from_text_non_empty(raw: &str, path: &str) -> Result<Self, PasteError> {
        let buffer = Self::from_text(raw);
        if buffer.is_empty() {
            return Err(PasteError::EmptySource {
                path: path.to_string(),
            });
        }
        Ok(buffer)
    }

    /// Line at `index`, `None` past the end
    pub fn get(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl From<Vec<String>> for LineBuffer {
    fn from(lines: Vec<String>) -> Self {
        Self { lines }
    }
}

impl<'a> FromIterator<&'a str> for LineBuffer {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        Self {
            lines: iter.into_iter().map(str::to_owned).collect(),
        }
    }
}
