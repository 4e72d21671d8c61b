//! Query layer over a parsed filing.
//!
//! [`DocumentContent`] owns the lines of one document and answers searches
//! against them. It is immutable once built, so a single instance can serve
//! concurrent queries from many threads.
//!
//! # Example
//!
//! ```no_run
//! use unfiling::{DocumentContent, SearchQuery, StatementKind};
//!
//! fn main() -> unfiling::Result<()> {
//!     let raw = std::fs::read("filing.txt")?;
//!     let content = DocumentContent::parse(&raw, true)?;
//!
//!     let hits = content.search(&SearchQuery::new(["revenue"]).tables_only())?;
//!     println!("{} tables mention revenue", hits.lines().len());
//!
//!     for table in content.financial_statements(StatementKind::BalanceSheet)? {
//!         println!("balance sheet on page {}", table.page_number);
//!     }
//!     Ok(())
//! }
//! ```

mod search;
mod terms;

pub use search::{
    MatchMode, PageMatch, PageWindow, ResponseShape, RowFilter, SearchQuery, SearchResults,
};
pub use terms::{
    StatementKind, BALANCE_SHEET_TERMS, CASH_FLOW_STATEMENT_TERMS, COMPREHENSIVE_INCOME_TERMS,
    EQUITY_STATEMENT_TERMS, INCOME_STATEMENT_TERMS,
};

use std::collections::BTreeSet;

use serde::Serialize;

use crate::error::Result;
use crate::model::Line;
use crate::parser::{segmenter_for, ParseOptions};

/// Number of leading content lines per page searched for statement headings.
pub const STATEMENT_PAGE_WINDOW: usize = 9;

/// The lines of one parsed filing, with query operations.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentContent {
    #[serde(skip)]
    source: String,
    lines: Vec<Line>,
}

impl DocumentContent {
    /// Wrap already segmented lines.
    pub fn new(source: impl Into<String>, lines: Vec<Line>) -> Self {
        Self {
            source: source.into(),
            lines,
        }
    }

    /// Decode and segment a raw buffer with default options.
    pub fn parse(buffer: &[u8], is_text_file: bool) -> Result<Self> {
        Self::parse_with_options(buffer, is_text_file, &ParseOptions::default())
    }

    /// Decode and segment a raw buffer.
    pub fn parse_with_options(
        buffer: &[u8],
        is_text_file: bool,
        options: &ParseOptions,
    ) -> Result<Self> {
        let source = options.decode(buffer)?.into_owned();
        let lines = segmenter_for(is_text_file, options).segment(&source);
        log::debug!(
            "DocumentContent: {} lines, {} tables",
            lines.len(),
            lines.iter().filter(|l| l.is_table()).count()
        );
        Ok(Self { source, lines })
    }

    /// Get all lines in document order.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Get the decoded document text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Get the number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the document produced no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Consume the content and return its lines.
    pub fn into_lines(self) -> Vec<Line> {
        self.lines
    }

    /// Get all table lines.
    pub fn tables(&self) -> Vec<&Line> {
        self.lines.iter().filter(|l| l.is_table()).collect()
    }

    /// Get all lines outside table structure.
    pub fn non_table_lines(&self) -> Vec<&Line> {
        self.lines.iter().filter(|l| !l.tag.is_table_part()).collect()
    }

    /// Get all lines on a page.
    pub fn page_lines(&self, page_number: u32) -> Vec<&Line> {
        self.lines
            .iter()
            .filter(|l| l.page_number == page_number)
            .collect()
    }

    /// Get the number of pages.
    pub fn page_count(&self) -> u32 {
        self.lines.last().map(|l| l.page_number).unwrap_or(1)
    }

    /// Search the document.
    pub fn search(&self, query: &SearchQuery) -> Result<SearchResults<'_>> {
        let matcher = query.matcher()?;
        let found: Vec<&Line> = self
            .candidates(query)
            .into_iter()
            .filter(|line| matcher.matches(line))
            .collect();

        log::debug!(
            "search: {} terms ({:?}, {:?}) matched {} lines",
            query.terms.len(),
            query.mode,
            query.rows,
            found.len()
        );

        Ok(match query.response {
            ResponseShape::Lines => SearchResults::Lines(found),
            ResponseShape::Pages => SearchResults::Pages(
                pages_of(&found)
                    .into_iter()
                    .map(|page_number| PageMatch {
                        page_number,
                        lines: self.page_lines(page_number),
                    })
                    .collect(),
            ),
        })
    }

    /// Find the table with the most rows on every page holding a match.
    ///
    /// Returns at most one table per matched page, in page order. Ties go to
    /// the first table on the page. Pages without tables are skipped.
    pub fn biggest_table_on_page(&self, query: &SearchQuery) -> Result<Vec<&Line>> {
        let query = query.clone().with_response(ResponseShape::Lines);
        let found = self.search(&query)?.lines();

        let tables = pages_of(&found)
            .into_iter()
            .filter_map(|page_number| {
                self.lines
                    .iter()
                    .filter(|l| l.page_number == page_number)
                    .filter_map(|l| l.table_data().map(|t| (l, t.row_count())))
                    .fold(None, |best: Option<(&Line, usize)>, (line, rows)| match best {
                        Some((_, most)) if most >= rows => best,
                        _ => Some((line, rows)),
                    })
                    .map(|(line, _)| line)
            })
            .collect();
        Ok(tables)
    }

    /// Extract the tables of a financial statement.
    ///
    /// Looks for the statement's headings among the first
    /// [`STATEMENT_PAGE_WINDOW`] content lines of each page, then takes the
    /// biggest table on each page found.
    pub fn financial_statements(&self, kind: StatementKind) -> Result<Vec<&Line>> {
        let query = SearchQuery::new(kind.terms().iter().copied())
            .with_page_window(PageWindow::first(STATEMENT_PAGE_WINDOW));
        let tables = self.biggest_table_on_page(&query)?;
        log::debug!("financial_statements: {} -> {} tables", kind, tables.len());
        Ok(tables)
    }

    fn candidates(&self, query: &SearchQuery) -> Vec<&Line> {
        let rows = match query.rows {
            RowFilter::All => self.lines.iter().collect(),
            RowFilter::Tables => self.tables(),
            RowFilter::NonTable => self.non_table_lines(),
        };

        let rows: Vec<&Line> = if query.item_sections.is_empty() {
            rows
        } else {
            rows.into_iter()
                .filter(|l| {
                    l.item_number
                        .as_ref()
                        .is_some_and(|item| query.item_sections.contains(item))
                })
                .collect()
        };

        if query.page_window.is_all() {
            return rows;
        }

        let mut windowed = Vec::new();
        let mut page = None;
        let mut position = 0;
        for line in rows.into_iter().filter(|l| l.is_populated()) {
            if page != Some(line.page_number) {
                page = Some(line.page_number);
                position = 0;
            }
            if query.page_window.includes(position) {
                windowed.push(line);
            }
            position += 1;
        }
        windowed
    }
}

fn pages_of(lines: &[&Line]) -> BTreeSet<u32> {
    lines.iter().map(|l| l.page_number).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Grid, TableLine, Tag};

    fn text(index: usize, page: u32, item: Option<&str>, content: &str) -> Line {
        Line::text(index, page, item.map(String::from), Tag::Element("p".into()), content)
    }

    fn table(index: usize, page: u32, table_index: usize, rows: usize, label: &str) -> Line {
        let grid = Grid::from_strings((0..rows).map(|r| vec![format!("{label} {r}")]));
        Line::table(
            index,
            page,
            None,
            TableLine {
                table_index,
                content: vec![label.to_string()],
                grid,
            },
        )
    }

    fn sample() -> DocumentContent {
        DocumentContent::new(
            "",
            vec![
                text(0, 1, None, "Cover page"),
                table(1, 1, 1, 2, "Index"),
                text(2, 2, Some("8"), "Consolidated Balance Sheets"),
                table(3, 2, 2, 3, "Small"),
                table(4, 2, 3, 7, "Large"),
                text(5, 3, Some("8"), "Notes"),
                table(6, 3, 4, 4, "Revenue"),
            ],
        )
    }

    #[test]
    fn test_tables_and_rows() {
        let content = sample();
        assert_eq!(content.tables().len(), 4);
        assert_eq!(content.non_table_lines().len(), 3);
        assert_eq!(content.page_lines(2).len(), 3);
        assert_eq!(content.page_count(), 3);
    }

    #[test]
    fn test_search_lines() {
        let content = sample();
        let results = content.search(&SearchQuery::new(["revenue"]).tables_only()).unwrap();
        let lines = results.lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].table_index(), Some(4));
    }

    #[test]
    fn test_search_no_match_is_empty() {
        let content = sample();
        let results = content.search(&SearchQuery::new(["goodwill"])).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_search_pages() {
        let content = sample();
        let query = SearchQuery::new(["balance sheets", "notes"]).by_page();
        match content.search(&query).unwrap() {
            SearchResults::Pages(pages) => {
                let numbers: Vec<u32> = pages.iter().map(|p| p.page_number).collect();
                assert_eq!(numbers, vec![2, 3]);
                assert_eq!(pages[0].lines.len(), 3);
            }
            other => panic!("expected pages, got {other:?}"),
        }
    }

    #[test]
    fn test_item_sections() {
        let content = sample();
        let query = SearchQuery::new(["."])
            .with_rows(RowFilter::NonTable)
            .with_item_sections(["8"]);
        let lines = content.search(&query).unwrap().lines();
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|l| l.item_number.as_deref() == Some("8")));
    }

    #[test]
    fn test_page_window() {
        let content = sample();
        let query = SearchQuery::new(["."]).with_page_window(PageWindow::first(1));
        let firsts: Vec<usize> = content
            .search(&query)
            .unwrap()
            .lines()
            .iter()
            .map(|l| l.line_index)
            .collect();
        assert_eq!(firsts, vec![0, 2, 5]);
    }

    #[test]
    fn test_page_window_counts_whitespace_lines() {
        let content = DocumentContent::new(
            "",
            vec![text(0, 1, None, ""), text(1, 1, None, "   "), text(2, 1, None, "Heading")],
        );
        let first = SearchQuery::new(["heading"]).with_page_window(PageWindow::first(1));
        assert!(content.search(&first).unwrap().is_empty());

        let second = SearchQuery::new(["heading"]).with_page_window(PageWindow::first(2));
        let lines = content.search(&second).unwrap().lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].line_index, 2);
    }

    #[test]
    fn test_biggest_table_on_page() {
        let content = sample();
        let query = SearchQuery::new(["^consolidated balance sheets$"]);
        let tables = content.biggest_table_on_page(&query).unwrap();
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].table_index(), Some(3));
        assert_eq!(tables[0].grid().map(Grid::row_count), Some(7));
    }

    #[test]
    fn test_biggest_table_tie_keeps_first() {
        let content = DocumentContent::new(
            "",
            vec![
                text(0, 1, None, "cash"),
                table(1, 1, 1, 2, "A"),
                table(2, 1, 2, 2, "B"),
            ],
        );
        let tables = content.biggest_table_on_page(&SearchQuery::new(["cash"])).unwrap();
        assert_eq!(tables.iter().map(|l| l.table_index()).collect::<Vec<_>>(), vec![Some(1)]);
    }

    #[test]
    fn test_page_without_tables_is_skipped() {
        let content = DocumentContent::new("", vec![text(0, 1, None, "cash")]);
        let tables = content.biggest_table_on_page(&SearchQuery::new(["cash"])).unwrap();
        assert!(tables.is_empty());
    }

    #[test]
    fn test_financial_statements() {
        let content = sample();
        let tables = content.financial_statements(StatementKind::BalanceSheet).unwrap();
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].page_number, 2);
        assert_eq!(tables[0].table_index(), Some(3));

        let none = content.financial_statements(StatementKind::CashFlowStatement).unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn test_content_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DocumentContent>();
    }
}
