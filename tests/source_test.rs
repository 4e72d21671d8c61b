//! Integration tests for loading filings from disk.

use std::fs;

use tempfile::TempDir;
use unfiling::{
    detect, parse_batch, parse_file, select_primary_document, DocumentRecord, DocumentSource,
    Error, FileSource, ParseOptions, RawDocument,
};

const HEADER: &str = "<SEC-DOCUMENT>0000950123-99-000001.txt\n";
const TEN_K: &str = "ITEM 7. MANAGEMENT'S DISCUSSION\nSales rose.\n";
const EX_13: &str =
    "<p>CONSOLIDATED BALANCE SHEETS</p><table><tr><td>Cash</td><td>10</td></tr></table>";

/// Writes one filing blob holding a text 10-K and an HTML EX-13, and returns
/// the directory with the records describing both documents.
fn filing() -> (TempDir, Vec<DocumentRecord>) {
    let dir = TempDir::new().unwrap();
    let blob = format!("{HEADER}{TEN_K}{EX_13}");
    fs::create_dir(dir.path().join("1999")).unwrap();
    fs::write(dir.path().join("1999/filing.txt"), blob).unwrap();

    let ten_k_start = HEADER.len();
    let ex_13_start = ten_k_start + TEN_K.len();
    let records = vec![
        DocumentRecord::new("1999/filing.txt", ten_k_start, ex_13_start)
            .with_sequence(1)
            .with_type("10-K")
            .with_file_name("d10k.txt"),
        DocumentRecord::new("1999/filing.txt", ex_13_start, ex_13_start + EX_13.len())
            .with_sequence(2)
            .with_type("EX-13")
            .with_description("ANNUAL REPORT")
            .with_content_type("text/html"),
    ];
    (dir, records)
}

#[test]
fn test_file_source_reads_blob() {
    let (dir, _) = filing();
    let source = FileSource::new(dir.path());
    let bytes = source.document_bytes("1999/filing.txt").unwrap();
    assert!(bytes.starts_with(HEADER.as_bytes()));
}

#[test]
fn test_file_source_missing_document() {
    let (dir, _) = filing();
    let source = FileSource::new(dir.path());
    assert!(matches!(
        source.document_bytes("2000/filing.txt"),
        Err(Error::DocumentNotFound(_))
    ));
}

#[test]
fn test_file_source_rejects_escapes() {
    let (dir, _) = filing();
    let source = FileSource::new(dir.path().join("1999"));
    assert!(matches!(
        source.document_bytes("../1999/filing.txt"),
        Err(Error::DocumentNotFound(_))
    ));
    assert!(source.document_bytes("").is_err());
}

#[test]
fn test_records_load_their_ranges() {
    let (dir, records) = filing();
    let source = FileSource::new(dir.path());

    assert_eq!(records[0].load(&source).unwrap(), TEN_K.as_bytes());
    assert_eq!(records[1].load(&source).unwrap(), EX_13.as_bytes());
}

#[test]
fn test_primary_document_prefers_annual_report() {
    let (dir, records) = filing();
    let source = FileSource::new(dir.path());

    let primary = select_primary_document(&records).unwrap();
    assert_eq!(primary.sequence, 2);
    assert!(!primary.is_text_file());

    let content = primary.document_content(&source, &ParseOptions::default()).unwrap();
    assert_eq!(content.tables().len(), 1);
    assert_eq!(content.tables()[0].grid().and_then(|g| g.get(0, 0)), Some("Cash"));
}

#[test]
fn test_text_record_parses_as_text() {
    let (dir, records) = filing();
    let source = FileSource::new(dir.path());

    assert!(records[0].is_text_file());
    let content = records[0].document_content(&source, &ParseOptions::default()).unwrap();
    assert_eq!(content.len(), 2);
    assert_eq!(content.lines()[1].item_number.as_deref(), Some("7"));
}

#[test]
fn test_parse_file_detects_flavor() {
    let dir = TempDir::new().unwrap();
    let html = dir.path().join("d10k.htm");
    let text = dir.path().join("d10k.txt");
    fs::write(&html, EX_13).unwrap();
    fs::write(&text, TEN_K).unwrap();

    assert!(!detect::is_text_file_path(&html).unwrap());
    assert!(detect::is_text_file_path(&text).unwrap());

    let options = ParseOptions::default();
    assert_eq!(parse_file(&html, &options).unwrap().tables().len(), 1);
    assert_eq!(parse_file(&text, &options).unwrap().len(), 2);
}

#[test]
fn test_parse_file_missing() {
    let dir = TempDir::new().unwrap();
    let err = parse_file(dir.path().join("absent.htm"), &ParseOptions::default()).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn test_batch_marks_failed_documents() {
    let bad = [b'I', b'T', 0xFF];
    let documents = [
        RawDocument::text(TEN_K.as_bytes()),
        RawDocument::text(&bad),
        RawDocument::html(EX_13.as_bytes()),
    ];

    let results = parse_batch(&documents, &ParseOptions::default());
    let failed: Vec<bool> = results.iter().map(Result::is_err).collect();
    assert_eq!(failed, vec![false, true, false]);
}
