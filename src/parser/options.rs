//! Parsing options and configuration.

use std::borrow::Cow;

use encoding_rs::{Encoding, UTF_8};

use crate::error::{Error, Result};

/// Options for parsing filing documents.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Text encoding of the raw buffer (decoded strictly)
    pub encoding: &'static Encoding,

    /// Which cell text the HTML table reconstructor places in grids
    pub html_cell_text: CellText,

    /// Whether batch parsing may use parallel workers
    pub parallel: bool,
}

impl ParseOptions {
    /// Create new parse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the text encoding.
    pub fn with_encoding(mut self, encoding: &'static Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Set the text encoding by WHATWG label (e.g. "windows-1252").
    pub fn with_encoding_label(self, label: &str) -> Result<Self> {
        let encoding = Encoding::for_label(label.trim().as_bytes()).ok_or_else(|| {
            Error::Decoding {
                encoding: label.to_string(),
            }
        })?;
        Ok(self.with_encoding(encoding))
    }

    /// Set the HTML cell text variant.
    pub fn with_cell_text(mut self, cell_text: CellText) -> Self {
        self.html_cell_text = cell_text;
        self
    }

    /// Clean HTML cell text before placing it in grids.
    pub fn clean_cells(mut self) -> Self {
        self.html_cell_text = CellText::Clean;
        self
    }

    /// Enable or disable parallel processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Decode a raw buffer with the configured encoding.
    ///
    /// Malformed input is an error; no replacement characters are inserted.
    pub fn decode<'a>(&self, bytes: &'a [u8]) -> Result<Cow<'a, str>> {
        self.encoding
            .decode_without_bom_handling_and_without_replacement(bytes)
            .ok_or_else(|| Error::Decoding {
                encoding: self.encoding.name().to_string(),
            })
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            encoding: UTF_8,
            html_cell_text: CellText::Raw,
            parallel: true,
        }
    }
}

/// Which text an HTML table cell contributes to the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellText {
    /// Cell text exactly as extracted from the markup
    #[default]
    Raw,
    /// Cell text passed through the cell cleaner
    Clean,
}
