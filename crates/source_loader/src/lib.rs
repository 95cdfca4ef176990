//! # Source Loader
//!
//! Turns a source path into decoded text before any job exists.
//!
//! Responsibilities:
//! - Read the whole file (no partial-file jobs)
//! - Strip a leading UTF-8 byte-order mark
//! - Decode UTF-8, reporting IO and decode failures separately
//!
//! ## Usage Example
//!
//! ```ignore
//! use contracts::SourceLoader;
//! use source_loader::FileSourceLoader;
//!
//! let text = FileSourceLoader::new().load(Path::new("lyrics.txt")).await?;
//! let buffer = LineBuffer::from_text(&text);
//! ```

mod decode;
mod file;
mod memory;

pub use contracts::SourceLoader;
pub use decode::{decode_source, strip_bom, UTF8_BOM};
pub use file::FileSourceLoader;
pub use memory::MemorySourceLoader;
