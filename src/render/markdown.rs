//! Markdown rendering for lines and grids.

use crate::model::{Grid, Line, LineKind, Tag};

use super::RenderOptions;

/// Render lines as Markdown.
pub fn to_markdown<'a, I>(lines: I, options: &RenderOptions) -> String
where
    I: IntoIterator<Item = &'a Line>,
{
    MarkdownRenderer::new(options.clone()).render(lines)
}

/// Render a grid as a Markdown table. The first row becomes the header.
pub fn grid_to_markdown(grid: &Grid) -> String {
    let mut output = String::new();
    render_grid(&mut output, grid);
    output
}

/// Markdown renderer.
pub struct MarkdownRenderer {
    options: RenderOptions,
}

impl MarkdownRenderer {
    /// Create a new Markdown renderer.
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Render lines to Markdown.
    pub fn render<'a, I>(&self, lines: I) -> String
    where
        I: IntoIterator<Item = &'a Line>,
    {
        let mut output = String::new();
        let mut page = None;

        for line in lines.into_iter().filter(|l| self.options.keeps(l)) {
            if self.options.page_headers && page != Some(line.page_number) {
                page = Some(line.page_number);
                output.push_str(&format!("<!-- page {} -->\n\n", line.page_number));
            }
            self.render_line(&mut output, line);
        }

        output.trim_end().to_string()
    }

    fn render_line(&self, output: &mut String, line: &Line) {
        match &line.kind {
            LineKind::Table(table) => {
                render_grid(output, &table.grid);
                output.push('\n');
            }
            LineKind::Text { content } => {
                let text = escape_markdown(content.trim());
                if let Some(level) = self.heading_level(&line.tag) {
                    output.push_str(&"#".repeat(level));
                    output.push(' ');
                }
                output.push_str(&text);
                output.push_str("\n\n");
            }
        }
    }

    fn heading_level(&self, tag: &Tag) -> Option<usize> {
        if !self.options.headings {
            return None;
        }
        match tag.name()? {
            "h1" => Some(1),
            "h2" => Some(2),
            "h3" => Some(3),
            "h4" => Some(4),
            "h5" => Some(5),
            "h6" => Some(6),
            _ => None,
        }
    }
}

fn render_grid(output: &mut String, grid: &Grid) {
    if grid.column_count() == 0 {
        return;
    }

    for (i, row) in grid.rows().iter().enumerate() {
        output.push('|');
        for cell in row {
            let content = cell.as_deref().unwrap_or("").replace('\n', " ");
            output.push_str(&format!(" {} |", escape_markdown(content.trim())));
        }
        output.push('\n');

        // Separator after the header row
        if i == 0 {
            output.push('|');
            for _ in row {
                output.push_str(" --- |");
            }
            output.push('\n');
        }
    }
}

/// Escape Markdown special characters that would alter rendering.
fn escape_markdown(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' | '`' | '*' | '_' | '[' | ']' | '|' => {
                result.push('\\');
                result.push(c);
            }
            _ => result.push(c),
        }
    }
    result
}
