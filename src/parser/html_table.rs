//! HTML table reconstruction with row/column span resolution.

use std::collections::HashMap;

use scraper::ElementRef;

use crate::cleanup::CellCleaner;
use crate::model::Grid;

use super::walk::{Visit, WalkStack};
use super::{CellText, TableReconstructor};

/// Upper bound for a declared span; larger values are malformed input.
const MAX_SPAN: usize = 1000;

/// Rebuilds a rectangular grid from a `<table>` element.
#[derive(Debug, Clone, Default)]
pub struct HtmlTableReconstructor {
    cell_text: CellText,
    cleaner: CellCleaner,
}

impl HtmlTableReconstructor {
    /// Create a reconstructor producing the given cell text variant.
    pub fn new(cell_text: CellText) -> Self {
        Self {
            cell_text,
            cleaner: CellCleaner::html(),
        }
    }

    /// Reconstructor keeping cell text as extracted.
    pub fn raw() -> Self {
        Self::new(CellText::Raw)
    }

    /// Reconstructor cleaning cell text.
    pub fn clean() -> Self {
        Self::new(CellText::Clean)
    }

    fn cell_value(&self, cell: ElementRef<'_>) -> String {
        let text: String = cell.text().collect();
        match self.cell_text {
            CellText::Raw => text,
            CellText::Clean => self.cleaner.clean(&text),
        }
    }
}

impl TableReconstructor for HtmlTableReconstructor {
    type Input<'a> = ElementRef<'a>;

    fn reconstruct(&self, table: ElementRef<'_>) -> Grid {
        let rows: Vec<Vec<ElementRef<'_>>> = owned_elements(table, &["tr"])
            .into_iter()
            .map(|row| owned_elements(row, &["td", "th"]))
            .collect();
        let row_count = rows.len();

        // A rowspan of 0 spans to the bottom of the table.
        let resolve_rowspan = |cell: &ElementRef<'_>, row: usize| match span(cell, "rowspan") {
            0 => row_count - row,
            n => n,
        };

        // First pass: column count. The last cell of a row counts as width 1
        // so a trailing colspan cannot create phantom columns.
        let mut column_count = 0;
        let mut pending: Vec<usize> = Vec::new();
        for (r, cells) in rows.iter().enumerate() {
            let declared = match cells.split_last() {
                Some((_, init)) => {
                    init.iter()
                        .map(|c| span(c, "colspan").max(1))
                        .sum::<usize>()
                        + 1
                }
                None => 0,
            };
            column_count = column_count.max(declared + pending.len());

            pending.extend(cells.iter().map(|c| resolve_rowspan(c, r)));
            pending = pending.into_iter().filter(|&s| s > 1).map(|s| s - 1).collect();
        }

        log::trace!(
            "HtmlTableReconstructor: {} rows x {} columns",
            row_count,
            column_count
        );

        // Second pass: place every cell at each position it spans.
        let mut grid = Grid::empty(row_count, column_count);
        let mut active: HashMap<usize, usize> = HashMap::new();
        for (r, cells) in rows.iter().enumerate() {
            let mut offset = 0;
            for (c, cell) in cells.iter().enumerate() {
                let mut col = c + offset;
                while active.get(&col).copied().unwrap_or(0) > 0 {
                    offset += 1;
                    col += 1;
                }

                let rowspan = resolve_rowspan(cell, r);
                active.insert(col, rowspan);
                let colspan = match span(cell, "colspan") {
                    0 => column_count.saturating_sub(col).max(1),
                    n => n,
                };
                offset += colspan - 1;

                let value = self.cell_value(*cell);
                for dr in 0..rowspan {
                    for dc in 0..colspan {
                        // Spans reaching outside the grid are dropped.
                        if grid.set(r + dr, col + dc, value.clone()) {
                            active.insert(col + dc, rowspan);
                        }
                    }
                }
            }

            active = active
                .into_iter()
                .filter(|&(_, s)| s > 1)
                .map(|(c, s)| (c, s - 1))
                .collect();
        }

        grid
    }
}

/// Read a span attribute. Missing or unparsable values count as 1.
fn span(cell: &ElementRef<'_>, attr: &str) -> usize {
    cell.value()
        .attr(attr)
        .and_then(|v| v.trim().parse::<usize>().ok())
        .map(|n| n.min(MAX_SPAN))
        .unwrap_or(1)
}

/// Collect descendants with one of `names`, without entering nested tables
/// or the matched elements themselves.
pub(crate) fn owned_elements<'a>(root: ElementRef<'a>, names: &[&str]) -> Vec<ElementRef<'a>> {
    let mut found = Vec::new();
    let mut stack = WalkStack::children_of(root);
    while let Some(visit) = stack.next() {
        let Visit::Element(child) = visit else {
            continue;
        };
        let name = child.value().name();
        if names.contains(&name) {
            found.push(child);
        } else if name != "table" {
            stack.descend(child);
        }
    }
    found
}
