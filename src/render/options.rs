//! Rendering options.

/// Options for text and Markdown rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Skip lines without content
    pub skip_empty: bool,

    /// Mark the start of each page
    pub page_headers: bool,

    /// Render HTML heading elements (`h1`..`h6`) as Markdown headings
    pub headings: bool,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep or skip lines without content.
    pub fn with_empty_lines(mut self, include: bool) -> Self {
        self.skip_empty = !include;
        self
    }

    /// Enable or disable page headers.
    pub fn with_page_headers(mut self, include: bool) -> Self {
        self.page_headers = include;
        self
    }

    /// Enable or disable heading detection.
    pub fn with_headings(mut self, enable: bool) -> Self {
        self.headings = enable;
        self
    }

    pub(crate) fn keeps(&self, line: &crate::model::Line) -> bool {
        !self.skip_empty || line.has_content()
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            skip_empty: true,
            page_headers: false,
            headings: true,
        }
    }
}
