//! Fixed-width text table reconstruction.
//!
//! Text filings lay tables out in fixed-width columns between `<TABLE>` and
//! `</TABLE>` markers. One row, the indicator row, carries `<S>` and `<C>`
//! tags whose `<` characters mark where each column starts. Rows above it
//! are column headings; rows below it are data.

use thiserror::Error;

use crate::cleanup::CellCleaner;
use crate::model::Grid;

use super::TableReconstructor;

/// Token identifying the indicator row.
pub const INDICATOR_TOKEN: &str = "<S>";

/// Character whose occurrences in the indicator row start a column.
pub const COLUMN_MARKER: char = '<';

/// Why a text block could not be laid out as a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// No row contains the indicator token
    #[error("no column indicator row")]
    NoIndicatorRow,
    /// The indicator row defines no columns
    #[error("indicator row defines no columns")]
    NoColumns,
}

/// Rebuilds a grid from the raw sub-lines of a text table block.
#[derive(Debug, Clone)]
pub struct TextTableReconstructor {
    cleaner: CellCleaner,
}

impl TextTableReconstructor {
    /// Create a new reconstructor.
    pub fn new() -> Self {
        Self {
            cleaner: CellCleaner::text(),
        }
    }

    /// Reconstruct a grid, reporting blocks without a recognizable layout.
    pub fn try_reconstruct<S: AsRef<str>>(&self, lines: &[S]) -> Result<Grid, LayoutError> {
        let indicator = lines
            .iter()
            .position(|l| l.as_ref().contains(INDICATOR_TOKEN))
            .ok_or(LayoutError::NoIndicatorRow)?;

        let markers: Vec<usize> = lines[indicator]
            .as_ref()
            .chars()
            .enumerate()
            .filter(|(_, c)| *c == COLUMN_MARKER)
            .map(|(i, _)| i)
            .collect();
        if markers.is_empty() {
            return Err(LayoutError::NoColumns);
        }

        let header: Vec<Vec<String>> = lines[..indicator]
            .iter()
            .map(|line| slice_row(line.as_ref(), &markers))
            .filter(|slices| !slices.iter().any(|s| s.contains(['<', '>'])))
            .map(|slices| self.clean_row(&slices))
            .collect();

        let data = lines[indicator + 1..]
            .iter()
            .map(|line| self.clean_row(&slice_row(line.as_ref(), &markers)))
            .filter(|cells| cells.iter().any(|c| c.chars().any(|ch| ch.is_ascii_alphanumeric())));

        let mut rows: Vec<Vec<String>> = Vec::new();
        let names = merge_header(&header, markers.len());
        if names.iter().any(|n| !n.is_empty()) {
            rows.push(names);
        }
        rows.extend(data);

        log::trace!(
            "TextTableReconstructor: {} columns, {} header rows merged, {} rows",
            markers.len(),
            header.len(),
            rows.len()
        );

        Ok(Grid::from_strings(rows))
    }

    fn clean_row(&self, slices: &[String]) -> Vec<String> {
        slices.iter().map(|s| self.cleaner.clean(s)).collect()
    }
}

impl Default for TextTableReconstructor {
    fn default() -> Self {
        Self::new()
    }
}

impl TableReconstructor for TextTableReconstructor {
    type Input<'a> = &'a [String];

    /// Reconstruct a grid, falling back to one column of raw sub-lines.
    fn reconstruct(&self, lines: &[String]) -> Grid {
        self.try_reconstruct(lines).unwrap_or_else(|err| {
            log::warn!(
                "TextTableReconstructor: {}; keeping {} raw lines",
                err,
                lines.len()
            );
            Grid::single_column(lines)
        })
    }
}

/// Slice a row into columns at the marker offsets.
///
/// The first column always starts at offset 0. A cut falling inside a token
/// moves left to the token's start, since figures are right-aligned under
/// their marker and often begin a character or two before it.
fn slice_row(line: &str, markers: &[usize]) -> Vec<String> {
    let chars: Vec<char> = line.chars().collect();
    let mut cuts = Vec::with_capacity(markers.len());
    cuts.push(0);
    for &marker in &markers[1..] {
        let floor = cuts.last().map_or(0, |c| c + 1);
        let mut cut = marker;
        while cut > floor
            && cut < chars.len()
            && !chars[cut - 1].is_whitespace()
            && !chars[cut].is_whitespace()
        {
            cut -= 1;
        }
        cuts.push(cut.max(floor));
    }

    cuts.iter()
        .enumerate()
        .map(|(i, &start)| {
            let end = cuts.get(i + 1).copied().unwrap_or(chars.len());
            let start = start.min(chars.len());
            let end = end.clamp(start, chars.len());
            chars[start..end].iter().collect()
        })
        .collect()
}

/// Merge multi-line header fragments into one name per column.
fn merge_header(rows: &[Vec<String>], columns: usize) -> Vec<String> {
    (0..columns)
        .map(|col| {
            let fragments: Vec<&str> = rows
                .iter()
                .filter_map(|row| row.get(col))
                .map(String::as_str)
                .filter(|s| !s.is_empty())
                .collect();
            merge_fragments(&fragments)
        })
        .collect()
}

/// Name a column from its non-empty header fragments, top to bottom.
///
/// Identical fragments give that fragment. Otherwise every adjacent pair
/// produces a name (the first fragment when the two are equal, both joined
/// by a space when not) and the last pair's name is kept.
fn merge_fragments(fragments: &[&str]) -> String {
    match fragments {
        [] => String::new(),
        [first, rest @ ..] if rest.iter().all(|f| f == first) => first.to_string(),
        _ => fragments
            .windows(2)
            .last()
            .map(|pair| {
                if pair[0] == pair[1] {
                    pair[0].to_string()
                } else {
                    format!("{} {}", pair[0], pair[1])
                }
            })
            .unwrap_or_default(),
    }
}
