//! Raw documents, their records, and where their bytes come from.
//!
//! A filing is stored as one blob holding several documents. Each
//! [`DocumentRecord`] names the blob and the byte range of one document
//! within it; a [`DocumentSource`] resolves blob references to bytes.

use std::io;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::content::DocumentContent;
use crate::detect::is_text_file_name;
use crate::error::{Error, Result};
use crate::parser::ParseOptions;

/// Content type marking a text document when no file name is recorded.
pub const TEXT_CONTENT_TYPE: &str = "text/plain";

/// Document types and descriptions of the annual report exhibit.
const ANNUAL_REPORT_EXHIBITS: &[&str] = &["EX-13", "EX-13.0"];

/// A raw document buffer and its flavor, borrowed for one parse.
#[derive(Debug, Clone, Copy)]
pub struct RawDocument<'a> {
    /// Undecoded document bytes
    pub bytes: &'a [u8],

    /// Whether the document is a text filing (otherwise HTML)
    pub is_text_file: bool,
}

impl<'a> RawDocument<'a> {
    /// Create a raw document.
    pub fn new(bytes: &'a [u8], is_text_file: bool) -> Self {
        Self {
            bytes,
            is_text_file,
        }
    }

    /// A text filing.
    pub fn text(bytes: &'a [u8]) -> Self {
        Self::new(bytes, true)
    }

    /// An HTML filing.
    pub fn html(bytes: &'a [u8]) -> Self {
        Self::new(bytes, false)
    }

    /// Parse into document content.
    pub fn parse(&self, options: &ParseOptions) -> Result<DocumentContent> {
        DocumentContent::parse_with_options(self.bytes, self.is_text_file, options)
    }
}

/// Retrieves stored blobs by reference.
pub trait DocumentSource {
    /// Fetch the full blob for a reference.
    fn document_bytes(&self, reference: &str) -> Result<Vec<u8>>;
}

/// A source reading blobs from files under a root directory.
#[derive(Debug, Clone)]
pub struct FileSource {
    root: PathBuf,
}

impl FileSource {
    /// Create a source rooted at a directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Get the root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl DocumentSource for FileSource {
    fn document_bytes(&self, reference: &str) -> Result<Vec<u8>> {
        let relative = Path::new(reference);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if reference.is_empty() || escapes {
            return Err(Error::DocumentNotFound(reference.to_string()));
        }

        let path = self.root.join(relative);
        log::debug!("FileSource: reading {}", path.display());
        std::fs::read(&path).map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => Error::DocumentNotFound(reference.to_string()),
            _ => Error::Io(err),
        })
    }
}

/// Where one document lives inside a stored filing, and what it is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Reference of the blob holding the filing
    pub reference: String,

    /// Position of the document within the filing (1 = primary)
    pub sequence: u32,

    /// Document type, e.g. "10-K" or "EX-13"
    pub doc_type: Option<String>,

    /// Free-text description
    pub description: Option<String>,

    /// Original file name
    pub file_name: Option<String>,

    /// MIME content type
    pub content_type: Option<String>,

    /// Start of the document within the blob (bytes, inclusive)
    pub start_offset: usize,

    /// End of the document within the blob (bytes, exclusive)
    pub end_offset: usize,
}

impl DocumentRecord {
    /// Create a record for a byte range of a blob.
    pub fn new(reference: impl Into<String>, start_offset: usize, end_offset: usize) -> Self {
        Self {
            reference: reference.into(),
            start_offset,
            end_offset,
            ..Self::default()
        }
    }

    /// Set the sequence number.
    pub fn with_sequence(mut self, sequence: u32) -> Self {
        self.sequence = sequence;
        self
    }

    /// Set the document type.
    pub fn with_type(mut self, doc_type: impl Into<String>) -> Self {
        self.doc_type = Some(doc_type.into());
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the file name.
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    /// Set the content type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Check if the document is a text filing.
    ///
    /// The file name decides when recorded; otherwise the content type does.
    pub fn is_text_file(&self) -> bool {
        match &self.file_name {
            Some(name) => is_text_file_name(name),
            None => self.content_type.as_deref() == Some(TEXT_CONTENT_TYPE),
        }
    }

    /// Check if the document is the annual report exhibit (EX-13).
    pub fn is_annual_report_exhibit(&self) -> bool {
        let is_exhibit = |value: &Option<String>| {
            value
                .as_deref()
                .is_some_and(|v| ANNUAL_REPORT_EXHIBITS.contains(&v.trim()))
        };
        is_exhibit(&self.doc_type) || is_exhibit(&self.description)
    }

    /// Cut this document's range out of the filing blob.
    pub fn slice<'b>(&self, blob: &'b [u8]) -> Result<&'b [u8]> {
        blob.get(self.start_offset..self.end_offset)
            .ok_or(Error::InvalidRange {
                start: self.start_offset,
                end: self.end_offset,
                len: blob.len(),
            })
    }

    /// Fetch this document's bytes from a source.
    pub fn load<S: DocumentSource + ?Sized>(&self, source: &S) -> Result<Vec<u8>> {
        let blob = source.document_bytes(&self.reference)?;
        Ok(self.slice(&blob)?.to_vec())
    }

    /// Fetch and parse this document.
    pub fn document_content<S: DocumentSource + ?Sized>(
        &self,
        source: &S,
        options: &ParseOptions,
    ) -> Result<DocumentContent> {
        let bytes = self.load(source)?;
        DocumentContent::parse_with_options(&bytes, self.is_text_file(), options)
    }
}

/// Pick the document holding a filing's content.
///
/// The annual report exhibit wins when present, since it carries the
/// financial statements; otherwise the primary document (sequence 1).
pub fn select_primary_document(records: &[DocumentRecord]) -> Option<&DocumentRecord> {
    records
        .iter()
        .find(|r| r.is_annual_report_exhibit())
        .or_else(|| records.iter().find(|r| r.sequence == 1))
}
