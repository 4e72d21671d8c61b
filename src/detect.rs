//! Filing format detection.
//!
//! Filings come either as plain text with SGML-like markers (`<PAGE>`,
//! `<TABLE>`, `<S>`) or as HTML. The markers of text filings are not HTML,
//! so detection looks for tags that only HTML documents use.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::Result;

/// Number of leading bytes inspected when sniffing content.
const SNIFF_LEN: usize = 4096;

/// Lowercase tag openings found in HTML filings but never in text filings.
const HTML_MARKERS: &[&[u8]] = &[
    b"<html",
    b"<!doctype html",
    b"<head>",
    b"<body",
    b"<div",
    b"<p>",
    b"<p ",
    b"<font",
    b"<br",
    b"<td",
];

/// Extensions of text filings.
const TEXT_EXTENSIONS: &[&str] = &["txt"];

/// Extensions of HTML filings.
const HTML_EXTENSIONS: &[&str] = &["htm", "html", "xhtml"];

/// Check if the leading bytes of a document look like HTML.
pub fn looks_like_html(data: &[u8]) -> bool {
    let head = data[..data.len().min(SNIFF_LEN)].to_ascii_lowercase();
    HTML_MARKERS
        .iter()
        .any(|marker| head.windows(marker.len()).any(|window| window == *marker))
}

/// Check if a file name denotes a text filing (`.txt`, any case).
pub fn is_text_file_name(name: &str) -> bool {
    extension_in(name, TEXT_EXTENSIONS)
}

/// Decide whether a document is a text filing.
///
/// A known extension decides; otherwise the content is sniffed.
pub fn is_text_document(name: Option<&str>, data: &[u8]) -> bool {
    match name {
        Some(name) if extension_in(name, TEXT_EXTENSIONS) => true,
        Some(name) if extension_in(name, HTML_EXTENSIONS) => false,
        _ => !looks_like_html(data),
    }
}

/// Decide whether a file on disk is a text filing.
pub fn is_text_file_path<P: AsRef<Path>>(path: P) -> Result<bool> {
    let path = path.as_ref();
    let mut head = Vec::with_capacity(SNIFF_LEN);
    BufReader::new(File::open(path)?)
        .take(SNIFF_LEN as u64)
        .read_to_end(&mut head)?;
    let name = path.file_name().and_then(|n| n.to_str());
    Ok(is_text_document(name, &head))
}

fn extension_in(name: &str, extensions: &[&str]) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| ext.eq_ignore_ascii_case(e)))
}
