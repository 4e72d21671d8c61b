//! Plain text filing segmentation.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::model::{Line, TableLine, Tag};

use super::{SegmentState, Segmenter, TableReconstructor, TextTableReconstructor};

static ITEM_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^item\s+([0-9]+[A-Za-z]*)").expect("item heading pattern is valid")
});

static PAGE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<page>").expect("page marker pattern is valid"));

static TABLE_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<table>").expect("table start pattern is valid"));

static TABLE_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</table>").expect("table end pattern is valid"));

/// Segments plain text filings into lines, one per physical line.
///
/// Lines between `<TABLE>` and `</TABLE>` collapse into a single table line
/// at the position of the block's first line. The `</TABLE>` line itself
/// stays an ordinary line. Line indices keep their physical positions, so
/// they have gaps after each table.
#[derive(Debug, Clone, Default)]
pub struct TextSegmenter {
    tables: TextTableReconstructor,
}

impl TextSegmenter {
    /// Create a new segmenter.
    pub fn new() -> Self {
        Self::default()
    }

    fn collapse(&self, queued: Vec<(Line, Option<usize>)>) -> Vec<Line> {
        let mut lines: Vec<Line> = Vec::with_capacity(queued.len());
        let mut blocks: Vec<(usize, usize, Vec<String>)> = Vec::new();
        let mut positions: HashMap<usize, usize> = HashMap::new();

        for (line, table) in queued {
            let Some(table_index) = table else {
                lines.push(line);
                continue;
            };
            let raw = line.content_text().unwrap_or_default().to_string();
            match positions.get(&table_index) {
                Some(&block) => blocks[block].2.push(raw),
                None => {
                    positions.insert(table_index, blocks.len());
                    blocks.push((lines.len(), table_index, vec![raw]));
                    lines.push(line);
                }
            }
        }

        for (position, table_index, content) in blocks {
            let first = &lines[position];
            let grid = self.tables.reconstruct(content.as_slice());
            let table = Line::table(
                first.line_index,
                first.page_number,
                first.item_number.clone(),
                TableLine {
                    table_index,
                    content,
                    grid,
                },
            );
            lines[position] = table;
        }
        lines
    }
}

impl Segmenter for TextSegmenter {
    fn name(&self) -> &'static str {
        "text"
    }

    fn segment(&self, source: &str) -> Vec<Line> {
        let mut state = SegmentState::new();
        let mut queued = Vec::new();

        for (index, raw) in source.lines().enumerate() {
            let trimmed = raw.trim();
            if let Some(caps) = ITEM_HEADING.captures(trimmed) {
                state = state.with_item(&caps[1]);
            }
            if PAGE_MARKER.is_match(trimmed) {
                state = state.page_break();
            }
            if TABLE_START.is_match(trimmed) {
                state = state.open_table();
            }
            if TABLE_END.is_match(trimmed) {
                state = state.close_table();
            }

            let line = Line::text(index, state.page, state.item.clone(), Tag::Text, raw);
            queued.push((line, state.open_table));
        }

        let physical = queued.len();
        let lines = self.collapse(queued);
        log::debug!(
            "TextSegmenter: {} physical lines into {} lines, {} pages",
            physical,
            lines.len(),
            state.page
        );
        lines
    }
}
