//! Line types.

use serde::{Deserialize, Serialize};

use super::Grid;

/// Markup tag a line was produced from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "type", content = "name")]
pub enum Tag {
    /// Plain text block (text filings, or HTML text outside any block element)
    Text,
    /// A block-level HTML element, by lowercase tag name
    Element(String),
    /// A collapsed table
    Table,
}

impl Tag {
    /// Tag name as it appeared in the markup, `None` for plain text.
    pub fn name(&self) -> Option<&str> {
        match self {
            Tag::Text => None,
            Tag::Element(name) => Some(name.as_str()),
            Tag::Table => Some("table"),
        }
    }

    /// Check if this tag belongs to table structure (`table`, `tr`, `td`, `th`).
    pub fn is_table_part(&self) -> bool {
        matches!(self.name(), Some("table" | "tr" | "td" | "th"))
    }
}

/// A reconstructed table occupying one line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableLine {
    /// Identifier of the table within its document
    pub table_index: usize,

    /// Raw textual content of the table (sub-lines or cell texts)
    pub content: Vec<String>,

    /// Reconstructed grid
    pub grid: Grid,
}

impl TableLine {
    /// Get the number of grid rows.
    pub fn row_count(&self) -> usize {
        self.grid.row_count()
    }
}

/// Content of a line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "type")]
pub enum LineKind {
    /// An ordinary line of text
    Text {
        /// Line text
        content: String,
    },
    /// A collapsed table
    Table(TableLine),
}

/// One normalized content unit of a parsed filing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    /// Position in the output sequence (ascending, unique; may have gaps)
    pub line_index: usize,

    /// Ordinal of the source element in the HTML tree
    pub element_index: Option<usize>,

    /// Section ("item") the line belongs to, e.g. "7A"
    pub item_number: Option<String>,

    /// Page number (1-indexed)
    pub page_number: u32,

    /// Markup tag the line came from
    pub tag: Tag,

    /// Inline styles accumulated while building the line (HTML only)
    pub style: Option<String>,

    /// Line content
    pub kind: LineKind,
}

impl Line {
    /// Create a text line.
    pub fn text(
        line_index: usize,
        page_number: u32,
        item_number: Option<String>,
        tag: Tag,
        content: impl Into<String>,
    ) -> Self {
        Self {
            line_index,
            element_index: None,
            item_number,
            page_number,
            tag,
            style: None,
            kind: LineKind::Text {
                content: content.into(),
            },
        }
    }

    /// Create a table line.
    pub fn table(
        line_index: usize,
        page_number: u32,
        item_number: Option<String>,
        table: TableLine,
    ) -> Self {
        Self {
            line_index,
            element_index: None,
            item_number,
            page_number,
            tag: Tag::Table,
            style: None,
            kind: LineKind::Table(table),
        }
    }

    /// Set the element index and return self.
    pub fn with_element_index(mut self, index: usize) -> Self {
        self.element_index = Some(index);
        self
    }

    /// Set the accumulated style and return self.
    pub fn with_style(mut self, style: Option<String>) -> Self {
        self.style = style;
        self
    }

    /// Check if this is a table line.
    pub fn is_table(&self) -> bool {
        matches!(self.kind, LineKind::Table(_))
    }

    /// Get the table, if this is a table line.
    pub fn table_data(&self) -> Option<&TableLine> {
        match &self.kind {
            LineKind::Table(table) => Some(table),
            LineKind::Text { .. } => None,
        }
    }

    /// Get the table index, if this is a table line.
    pub fn table_index(&self) -> Option<usize> {
        self.table_data().map(|t| t.table_index)
    }

    /// Get the reconstructed grid, if this is a table line.
    pub fn grid(&self) -> Option<&Grid> {
        self.table_data().map(|t| &t.grid)
    }

    /// Get the text of an ordinary line.
    pub fn content_text(&self) -> Option<&str> {
        match &self.kind {
            LineKind::Text { content } => Some(content.as_str()),
            LineKind::Table(_) => None,
        }
    }

    /// Check if the line carries any non-whitespace content.
    pub fn has_content(&self) -> bool {
        match &self.kind {
            LineKind::Text { content } => !content.trim().is_empty(),
            LineKind::Table(table) => !table.content.is_empty(),
        }
    }

    /// Check if the line's content is non-empty. Unlike [`Line::has_content`],
    /// whitespace-only text counts.
    pub fn is_populated(&self) -> bool {
        match &self.kind {
            LineKind::Text { content } => !content.is_empty(),
            LineKind::Table(table) => !table.content.is_empty(),
        }
    }

    /// Get plain text representation.
    pub fn plain_text(&self) -> String {
        match &self.kind {
            LineKind::Text { content } => content.clone(),
            LineKind::Table(table) => table.grid.plain_text(),
        }
    }
}
