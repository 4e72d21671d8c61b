//! Error types for unfiling library.

use std::io;
use thiserror::Error;

/// Result type alias for unfiling operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while loading, segmenting or querying a filing.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading documents from a source.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The buffer is not valid in the configured text encoding.
    #[error("Cannot decode document as {encoding}")]
    Decoding {
        /// Name of the encoding that was attempted
        encoding: String,
    },

    /// A search term is not a valid regular expression.
    #[error("Invalid search pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// The requested financial statement kind is not known.
    #[error("Unknown statement kind: {0}")]
    UnknownStatementKind(String),

    /// A document record's byte range does not fit the retrieved buffer.
    #[error("Byte range {start}..{end} is out of bounds (buffer has {len} bytes)")]
    InvalidRange {
        /// Start offset of the requested range
        start: usize,
        /// End offset of the requested range
        end: usize,
        /// Length of the retrieved buffer
        len: usize,
    },

    /// A page window string could not be parsed.
    #[error("Invalid page window: {0}")]
    InvalidPageWindow(String),

    /// A document reference could not be resolved by the source.
    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    /// Error during rendering (JSON, text, Markdown).
    #[error("Rendering error: {0}")]
    Render(String),
}
