//! Rectangular table grid.

use serde::{Deserialize, Serialize};

/// A rectangular 2-D reconstruction of a table.
///
/// Every row has the same width. Cells are `None` where no source cell
/// projects onto the position, which is normal for tables with spans.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grid {
    rows: Vec<Vec<Option<String>>>,
}

impl Grid {
    /// Create a grid of `row_count` x `column_count` empty cells.
    pub fn empty(row_count: usize, column_count: usize) -> Self {
        Self {
            rows: vec![vec![None; column_count]; row_count],
        }
    }

    /// Build a grid from rows, padding short rows with `None`.
    pub fn from_rows(mut rows: Vec<Vec<Option<String>>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut rows {
            row.resize(width, None);
        }
        Self { rows }
    }

    /// Build a fully populated grid from string rows.
    pub fn from_strings<S: Into<String>>(rows: impl IntoIterator<Item = Vec<S>>) -> Self {
        Self::from_rows(
            rows.into_iter()
                .map(|row| row.into_iter().map(|cell| Some(cell.into())).collect())
                .collect(),
        )
    }

    /// Build a single-column grid, one row per line.
    pub fn single_column<S: AsRef<str>>(lines: &[S]) -> Self {
        Self {
            rows: lines
                .iter()
                .map(|line| vec![Some(line.as_ref().to_string())])
                .collect(),
        }
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.rows.first().map(Vec::len).unwrap_or(0)
    }

    /// Check if the grid has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get the rows.
    pub fn rows(&self) -> &[Vec<Option<String>>] {
        &self.rows
    }

    /// Get a cell, `None` when out of range or unfilled.
    pub fn get(&self, row: usize, column: usize) -> Option<&str> {
        self.rows.get(row)?.get(column)?.as_deref()
    }

    /// Write a cell. Returns `false` (and writes nothing) when the position
    /// is outside the grid.
    pub fn set(&mut self, row: usize, column: usize, value: String) -> bool {
        match self.rows.get_mut(row).and_then(|r| r.get_mut(column)) {
            Some(cell) => {
                *cell = Some(value);
                true
            }
            None => false,
        }
    }

    /// Iterate over filled cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().flatten().filter_map(|c| c.as_deref())
    }

    /// Get plain text representation (tab-separated columns, one row per line).
    pub fn plain_text(&self) -> String {
        self.rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|c| c.as_deref().unwrap_or(""))
                    .collect::<Vec<_>>()
                    .join("\t")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Consume the grid and return its rows.
    pub fn into_rows(self) -> Vec<Vec<Option<String>>> {
        self.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_empty() {
        let grid = Grid::empty(2, 3);
        assert_eq!(grid.row_count(), 2);
        assert_eq!(grid.column_count(), 3);
        assert_eq!(grid.get(1, 2), None);
        assert_eq!(grid.cells().count(), 0);
    }

    #[test]
    fn test_grid_from_rows_pads() {
        let grid = Grid::from_rows(vec![
            vec![Some("a".to_string())],
            vec![Some("b".to_string()), Some("c".to_string())],
        ]);
        assert_eq!(grid.column_count(), 2);
        assert!(grid.rows().iter().all(|r| r.len() == 2));
        assert_eq!(grid.get(0, 1), None);
    }

    #[test]
    fn test_grid_set_out_of_range() {
        let mut grid = Grid::empty(1, 1);
        assert!(grid.set(0, 0, "x".to_string()));
        assert!(!grid.set(0, 1, "y".to_string()));
        assert!(!grid.set(5, 0, "z".to_string()));
        assert_eq!(grid.get(0, 0), Some("x"));
    }

    #[test]
    fn test_grid_plain_text() {
        let grid = Grid::from_strings(vec![vec!["A", "B"], vec!["1", "2"]]);
        assert_eq!(grid.plain_text(), "A\tB\n1\t2");
    }

    #[test]
    fn test_grid_serializes_as_nested_arrays() {
        let grid = Grid::from_rows(vec![vec![Some("A".to_string()), None]]);
        let json = serde_json::to_string(&grid).unwrap();
        assert_eq!(json, r#"[["A",null]]"#);
    }
}
