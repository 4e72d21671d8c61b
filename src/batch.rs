//! Parsing many documents at once.
//!
//! Each parse owns its state, so documents are parsed independently on the
//! rayon thread pool. A failure is reported in that document's slot and does
//! not affect the others.

use rayon::prelude::*;

use crate::content::DocumentContent;
use crate::error::Result;
use crate::parser::ParseOptions;
use crate::source::RawDocument;

/// Parse a batch of documents, one result per input in input order.
pub fn parse_batch(
    documents: &[RawDocument<'_>],
    options: &ParseOptions,
) -> Vec<Result<DocumentContent>> {
    log::debug!(
        "parse_batch: {} documents ({})",
        documents.len(),
        if options.parallel { "parallel" } else { "sequential" }
    );

    let results: Vec<Result<DocumentContent>> = if options.parallel {
        documents.par_iter().map(|doc| doc.parse(options)).collect()
    } else {
        documents.iter().map(|doc| doc.parse(options)).collect()
    };

    let failed = results.iter().filter(|r| r.is_err()).count();
    if failed > 0 {
        log::warn!("parse_batch: {} of {} documents failed", failed, documents.len());
    }
    results
}
