//! Search parameters and results.

use std::collections::BTreeSet;

use regex::{Regex, RegexBuilder};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::model::{Line, TableLine};

/// How multiple search terms combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// A line matches if any term matches
    #[default]
    Any,
    /// A line matches only if every term matches
    All,
}

/// Which lines a search considers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowFilter {
    /// Every line
    #[default]
    All,
    /// Table lines only
    Tables,
    /// Lines outside tables only
    NonTable,
}

/// Shape of a search response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseShape {
    /// The matched lines themselves
    #[default]
    Lines,
    /// Every line on each page holding a match
    Pages,
}

/// Positions within a page, counted from 0 over lines with non-empty content.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PageWindow {
    /// No restriction
    #[default]
    All,
    /// Only lines at these intra-page positions
    Positions(BTreeSet<usize>),
}

impl PageWindow {
    /// Window covering the first `n` positions of each page.
    pub fn first(n: usize) -> Self {
        PageWindow::Positions((0..n).collect())
    }

    /// Check if an intra-page position falls inside the window.
    pub fn includes(&self, position: usize) -> bool {
        match self {
            PageWindow::All => true,
            PageWindow::Positions(positions) => positions.contains(&position),
        }
    }

    /// Check if the window restricts anything.
    pub fn is_all(&self) -> bool {
        matches!(self, PageWindow::All)
    }

    /// Parse a window string (e.g., "0-8", "0,2,4-6", "all").
    ///
    /// Ranges are inclusive.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            return Ok(PageWindow::All);
        }

        let invalid = || Error::InvalidPageWindow(s.to_string());
        let position = |part: &str| part.trim().parse::<usize>().map_err(|_| invalid());

        let mut positions = BTreeSet::new();
        for part in s.split(',') {
            match part.split_once('-') {
                Some((start, end)) => {
                    let (start, end) = (position(start)?, position(end)?);
                    if start > end {
                        return Err(invalid());
                    }
                    positions.extend(start..=end);
                }
                None => {
                    positions.insert(position(part)?);
                }
            }
        }
        Ok(PageWindow::Positions(positions))
    }
}

/// Parameters of a search over a document's lines.
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    /// Regex terms, matched case-insensitively
    pub terms: Vec<String>,

    /// How terms combine
    pub mode: MatchMode,

    /// Which lines are candidates
    pub rows: RowFilter,

    /// Item sections to restrict to (empty = all)
    pub item_sections: Vec<String>,

    /// Intra-page positions to restrict to
    pub page_window: PageWindow,

    /// Shape of the response
    pub response: ResponseShape,
}

impl SearchQuery {
    /// Create a query for the given terms with default settings.
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            terms: terms.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Set the match mode.
    pub fn with_mode(mut self, mode: MatchMode) -> Self {
        self.mode = mode;
        self
    }

    /// Require every term to match.
    pub fn all_terms(mut self) -> Self {
        self.mode = MatchMode::All;
        self
    }

    /// Set the row filter.
    pub fn with_rows(mut self, rows: RowFilter) -> Self {
        self.rows = rows;
        self
    }

    /// Search table lines only.
    pub fn tables_only(mut self) -> Self {
        self.rows = RowFilter::Tables;
        self
    }

    /// Restrict to the given item sections.
    pub fn with_item_sections<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.item_sections = items.into_iter().map(Into::into).collect();
        self
    }

    /// Set the page window.
    pub fn with_page_window(mut self, window: PageWindow) -> Self {
        self.page_window = window;
        self
    }

    /// Set the response shape.
    pub fn with_response(mut self, response: ResponseShape) -> Self {
        self.response = response;
        self
    }

    /// Respond with whole pages.
    pub fn by_page(mut self) -> Self {
        self.response = ResponseShape::Pages;
        self
    }

    pub(crate) fn matcher(&self) -> Result<Matcher> {
        Matcher::new(&self.terms, self.mode)
    }
}

/// Compiled search terms.
#[derive(Debug)]
pub(crate) struct Matcher {
    patterns: Vec<Regex>,
    mode: MatchMode,
}

impl Matcher {
    fn new(terms: &[String], mode: MatchMode) -> Result<Self> {
        let patterns = terms
            .iter()
            .map(|term| RegexBuilder::new(term).case_insensitive(true).build())
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self { patterns, mode })
    }

    pub(crate) fn matches(&self, line: &Line) -> bool {
        match line.table_data() {
            Some(table) => self.matches_table(table),
            None => self.matches_text(line.content_text().unwrap_or_default()),
        }
    }

    fn matches_text(&self, text: &str) -> bool {
        match self.mode {
            MatchMode::Any => self.patterns.iter().any(|p| p.is_match(text)),
            MatchMode::All => self.patterns.iter().all(|p| p.is_match(text)),
        }
    }

    fn matches_table(&self, table: &TableLine) -> bool {
        match self.mode {
            MatchMode::Any => {
                let mut texts = table
                    .content
                    .iter()
                    .map(String::as_str)
                    .chain(table.grid.cells());
                texts.any(|text| self.patterns.iter().any(|p| p.is_match(text)))
            }
            MatchMode::All => {
                let content = table.content.join(" ");
                let cells = table.grid.cells().collect::<Vec<_>>().join(" ");
                self.matches_text(&content) || self.matches_text(&cells)
            }
        }
    }
}

/// Lines of one page holding at least one match.
#[derive(Debug, Clone, Serialize)]
pub struct PageMatch<'a> {
    /// Page number
    pub page_number: u32,

    /// Every line on the page
    pub lines: Vec<&'a Line>,
}

/// Result of a search.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "lowercase", tag = "type", content = "results")]
pub enum SearchResults<'a> {
    /// Matched lines in document order
    Lines(Vec<&'a Line>),
    /// Pages holding matches, in page order
    Pages(Vec<PageMatch<'a>>),
}

impl<'a> SearchResults<'a> {
    /// Check if nothing matched.
    pub fn is_empty(&self) -> bool {
        match self {
            SearchResults::Lines(lines) => lines.is_empty(),
            SearchResults::Pages(pages) => pages.is_empty(),
        }
    }

    /// All returned lines, flattened in order.
    pub fn lines(&self) -> Vec<&'a Line> {
        match self {
            SearchResults::Lines(lines) => lines.clone(),
            SearchResults::Pages(pages) => pages
                .iter()
                .flat_map(|p| p.lines.iter().copied())
                .collect(),
        }
    }
}
