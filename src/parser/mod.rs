//! Filing segmentation and table reconstruction.
//!
//! A [`Segmenter`] turns one decoded document into an ordered sequence of
//! [`Line`]s. Tables met along the way are handed to a
//! [`TableReconstructor`] and embedded as a single table line.

mod html;
mod html_table;
mod options;
mod state;
mod text;
mod text_table;
mod walk;

pub use html::{is_inline, HtmlSegmenter, INLINE_TAGS};
pub use html_table::HtmlTableReconstructor;
pub use options::{CellText, ParseOptions};
pub use state::SegmentState;
pub use text::TextSegmenter;
pub use text_table::{LayoutError, TextTableReconstructor, COLUMN_MARKER, INDICATOR_TOKEN};

use crate::model::{Grid, Line};

/// Rebuilds a rectangular grid from one table's source.
pub trait TableReconstructor {
    /// Source of one table (an element subtree, or raw sub-lines).
    type Input<'a>;

    /// Reconstruct the grid. Malformed input degrades, it never fails.
    fn reconstruct(&self, input: Self::Input<'_>) -> Grid;
}

/// Splits a decoded document into lines.
pub trait Segmenter: Send + Sync {
    /// Short name of the document flavor handled.
    fn name(&self) -> &'static str;

    /// Segment a document. Each call starts from a fresh state.
    fn segment(&self, source: &str) -> Vec<Line>;
}

/// Pick the segmenter for a document.
pub fn segmenter_for(is_text_file: bool, options: &ParseOptions) -> Box<dyn Segmenter> {
    if is_text_file {
        Box::new(TextSegmenter::new())
    } else {
        Box::new(HtmlSegmenter::new(options.html_cell_text))
    }
}

/// Decode a raw buffer and segment it.
pub fn segment_bytes(
    buffer: &[u8],
    is_text_file: bool,
    options: &ParseOptions,
) -> crate::Result<Vec<Line>> {
    let source = options.decode(buffer)?;
    let segmenter = segmenter_for(is_text_file, options);
    log::debug!(
        "Segmenting {} bytes with the {} segmenter",
        buffer.len(),
        segmenter.name()
    );
    Ok(segmenter.segment(&source))
}
