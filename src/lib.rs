//! # unfiling
//!
//! Structure extraction for SEC filing documents.
//!
//! Filings arrive either as HTML or as plain text laid out in fixed-width
//! columns. This library segments both into one normalized sequence of
//! [`Line`]s, tracking page numbers and "Item" sections, and rebuilds every
//! table it meets into a rectangular [`Grid`]. A [`DocumentContent`] then
//! answers term searches and locates financial statement tables.
//!
//! ## Quick Start
//!
//! ```no_run
//! use unfiling::{build_document_content, render, StatementKind};
//!
//! fn main() -> unfiling::Result<()> {
//!     let raw = std::fs::read("0000950123-99-000001.txt")?;
//!     let content = build_document_content(&raw, true)?;
//!
//!     for table in content.financial_statements(StatementKind::IncomeStatement)? {
//!         if let Some(grid) = table.grid() {
//!             println!("{}", render::grid_to_markdown(grid));
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Two input flavors**: HTML element trees and fixed-width text filings
//! - **Table reconstruction**: row/column spans for HTML, column markers for text
//! - **Section tracking**: sticky item numbers and page numbers on every line
//! - **Search**: regex terms over lines or tables, by item section and page position
//! - **Parallel processing**: uses Rayon for batches of documents

pub mod batch;
pub mod cleanup;
pub mod content;
pub mod detect;
pub mod error;
pub mod model;
pub mod parser;
pub mod render;
pub mod source;

// Re-export commonly used types
pub use batch::parse_batch;
pub use cleanup::{clean_cell, CellCleaner, CleanupOptions};
pub use content::{
    DocumentContent, MatchMode, PageMatch, PageWindow, ResponseShape, RowFilter, SearchQuery,
    SearchResults, StatementKind,
};
pub use detect::{is_text_document, looks_like_html};
pub use error::{Error, Result};
pub use model::{Grid, Line, LineKind, TableLine, Tag};
pub use parser::{CellText, ParseOptions, Segmenter};
pub use render::{JsonFormat, RenderOptions};
pub use source::{select_primary_document, DocumentRecord, DocumentSource, FileSource, RawDocument};

use std::path::Path;

/// Segment a raw filing into lines.
///
/// # Arguments
///
/// * `buffer` - Undecoded document bytes
/// * `is_text_file` - `true` for text filings, `false` for HTML
///
/// # Example
///
/// ```
/// let lines = unfiling::segment(b"ITEM 1. BUSINESS\nWidgets", true).unwrap();
/// assert_eq!(lines.len(), 2);
/// assert_eq!(lines[1].item_number.as_deref(), Some("1"));
/// ```
pub fn segment(buffer: &[u8], is_text_file: bool) -> Result<Vec<Line>> {
    segment_with_options(buffer, is_text_file, &ParseOptions::default())
}

/// Segment a raw filing with custom options.
pub fn segment_with_options(
    buffer: &[u8],
    is_text_file: bool,
    options: &ParseOptions,
) -> Result<Vec<Line>> {
    parser::segment_bytes(buffer, is_text_file, options)
}

/// Segment a raw filing and wrap the lines for querying.
pub fn build_document_content(buffer: &[u8], is_text_file: bool) -> Result<DocumentContent> {
    DocumentContent::parse(buffer, is_text_file)
}

/// Segment a raw filing with custom options and wrap the lines for querying.
pub fn build_document_content_with_options(
    buffer: &[u8],
    is_text_file: bool,
    options: &ParseOptions,
) -> Result<DocumentContent> {
    DocumentContent::parse_with_options(buffer, is_text_file, options)
}

/// Read and parse a filing from disk, detecting its flavor.
///
/// # Example
///
/// ```no_run
/// use unfiling::{parse_file, ParseOptions};
///
/// let content = parse_file("d10k.htm", &ParseOptions::default()).unwrap();
/// println!("{} tables", content.tables().len());
/// ```
pub fn parse_file<P: AsRef<Path>>(path: P, options: &ParseOptions) -> Result<DocumentContent> {
    let path = path.as_ref();
    let data = std::fs::read(path)?;
    let name = path.file_name().and_then(|n| n.to_str());
    DocumentContent::parse_with_options(&data, is_text_document(name, &data), options)
}
