//! HTML filing segmentation.
//!
//! Walks the element tree in document order. Inline elements only add their
//! text and style to the line being built; any other element closes that line
//! and opens a new one tagged with its own name. Tables are reconstructed and
//! emitted as a single line without descending into them.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html};

use crate::model::{Line, TableLine, Tag};

use super::walk::{Visit, WalkStack};
use super::{
    CellText, HtmlTableReconstructor, SegmentState, Segmenter, TableReconstructor,
};

static ITEM_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*item\s*([0-9]+[A-Za-z]*)").expect("item heading pattern is valid")
});

/// Elements that never start a new line.
pub const INLINE_TAGS: &[&str] = &[
    "a", "abbr", "acronym", "b", "bdo", "big", "button", "cite", "code", "dfn", "em", "font",
    "i", "img", "input", "kbd", "label", "map", "object", "output", "q", "samp", "script",
    "select", "small", "span", "strong", "sub", "sup", "textarea", "time", "tt", "var",
];

/// Elements whose subtrees carry no document text.
const SKIPPED_TAGS: &[&str] = &["script", "style"];

/// Style fragment marking a page break on a `div`.
const PAGE_BREAK_STYLE: &str = "page-break-";

/// Check if an element name is inline.
pub fn is_inline(name: &str) -> bool {
    INLINE_TAGS.contains(&name)
}

/// Segments HTML filings into lines.
#[derive(Debug, Clone, Default)]
pub struct HtmlSegmenter {
    tables: HtmlTableReconstructor,
}

impl HtmlSegmenter {
    /// Create a segmenter placing the given cell text variant in grids.
    pub fn new(cell_text: CellText) -> Self {
        Self {
            tables: HtmlTableReconstructor::new(cell_text),
        }
    }
}

impl Segmenter for HtmlSegmenter {
    fn name(&self) -> &'static str {
        "html"
    }

    fn segment(&self, source: &str) -> Vec<Line> {
        let document = Html::parse_document(source);
        let mut walk = Walk::new(&self.tables);
        let state = walk.visit(document.root_element(), SegmentState::new());
        let state = walk.flush(state);

        log::debug!(
            "HtmlSegmenter: {} lines from {} elements, {} tables, {} pages",
            walk.lines.len(),
            walk.ordinal,
            state.next_table - 1,
            state.page
        );
        walk.lines
    }
}

/// Text and style collected for the line being built.
#[derive(Debug)]
struct Accumulator {
    tag: Tag,
    element_index: Option<usize>,
    text: String,
    style: String,
    opened: bool,
}

impl Accumulator {
    /// Accumulator for text outside any block element.
    fn detached() -> Self {
        Self {
            tag: Tag::Text,
            element_index: None,
            text: String::new(),
            style: String::new(),
            opened: false,
        }
    }

    fn open(tag: Tag, element_index: usize) -> Self {
        Self {
            tag,
            element_index: Some(element_index),
            opened: true,
            ..Self::detached()
        }
    }

    fn push_style(&mut self, style: &str) {
        self.style.push_str(style.trim());
        self.style.push(';');
    }
}

struct Walk<'r> {
    tables: &'r HtmlTableReconstructor,
    lines: Vec<Line>,
    pending: Accumulator,
    ordinal: usize,
}

impl<'r> Walk<'r> {
    fn new(tables: &'r HtmlTableReconstructor) -> Self {
        Self {
            tables,
            lines: Vec::new(),
            pending: Accumulator::detached(),
            ordinal: 0,
        }
    }

    fn visit(&mut self, root: ElementRef<'_>, state: SegmentState) -> SegmentState {
        let mut stack = WalkStack::from_root(root);
        let mut state = state;
        while let Some(visit) = stack.next() {
            match visit {
                Visit::Text(text) => self.pending.text.push_str(&text.replace('\u{a0}', " ")),
                Visit::Element(element) => {
                    let (next, descend) = self.enter(element, state);
                    state = next;
                    if descend {
                        stack.descend(element);
                    }
                }
            }
        }
        state
    }

    /// Handle an element on entry; returns whether its children are walked.
    fn enter(&mut self, element: ElementRef<'_>, state: SegmentState) -> (SegmentState, bool) {
        let name = element.value().name();
        if SKIPPED_TAGS.contains(&name) {
            return (state, false);
        }

        let index = self.ordinal;
        self.ordinal += 1;

        if name == "table" {
            return (self.table(element, index, state), false);
        }

        let mut state = state;
        if !is_inline(name) {
            state = self.flush(state);
            self.pending = Accumulator::open(Tag::Element(name.to_string()), index);
        }
        if let Some(style) = element.value().attr("style") {
            self.pending.push_style(style);
        }
        if breaks_page(element) {
            state = state.page_break();
        }
        (state, true)
    }

    fn table(&mut self, table: ElementRef<'_>, index: usize, state: SegmentState) -> SegmentState {
        let state = self.flush(state);
        let (state, table_index) = state.take_table_index();

        let data = TableLine {
            table_index,
            content: table_text(table),
            grid: self.tables.reconstruct(table),
        };
        let style = table.value().attr("style").map(|s| format!("{};", s.trim()));
        log::trace!(
            "HtmlSegmenter: table {} at element {} ({} rows)",
            table_index,
            index,
            data.row_count()
        );

        let line = Line::table(self.lines.len(), state.page, state.item.clone(), data)
            .with_element_index(index)
            .with_style(style);
        self.lines.push(line);
        state
    }

    /// Emit the pending accumulator as a line.
    fn flush(&mut self, state: SegmentState) -> SegmentState {
        let pending = std::mem::replace(&mut self.pending, Accumulator::detached());
        if !pending.opened && pending.text.trim().is_empty() {
            return state;
        }

        let state = match ITEM_HEADING.captures(&pending.text) {
            Some(caps) => state.with_item(&caps[1]),
            None => state,
        };

        let style = (!pending.style.is_empty()).then_some(pending.style);
        let mut line = Line::text(
            self.lines.len(),
            state.page,
            state.item.clone(),
            pending.tag,
            pending.text.trim(),
        )
        .with_style(style);
        if let Some(index) = pending.element_index {
            line = line.with_element_index(index);
        }
        self.lines.push(line);
        state
    }
}

fn breaks_page(element: ElementRef<'_>) -> bool {
    match element.value().name() {
        "hr" => true,
        "div" => element
            .value()
            .attr("style")
            .is_some_and(|style| style.to_ascii_lowercase().contains(PAGE_BREAK_STYLE)),
        _ => false,
    }
}

/// Text entries of a table, split on the same inline/block rule as lines.
fn table_text(table: ElementRef<'_>) -> Vec<String> {
    let mut content = Vec::new();
    let mut text = String::new();
    collect_table_text(table, &mut text, &mut content);
    push_entry(&mut text, &mut content);
    content
}

fn collect_table_text(table: ElementRef<'_>, text: &mut String, content: &mut Vec<String>) {
    let mut stack = WalkStack::children_of(table);
    while let Some(visit) = stack.next() {
        match visit {
            Visit::Text(t) => text.push_str(t),
            Visit::Element(child) => {
                let name = child.value().name();
                if SKIPPED_TAGS.contains(&name) {
                    continue;
                }
                if !is_inline(name) {
                    push_entry(text, content);
                }
                stack.descend(child);
            }
        }
    }
}

fn push_entry(text: &mut String, content: &mut Vec<String>) {
    let entry = text.replace('\u{a0}', " ");
    let entry = entry.trim();
    if !entry.is_empty() {
        content.push(entry.to_string());
    }
    text.clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Grid;

    fn segment(html: &str) -> Vec<Line> {
        HtmlSegmenter::default().segment(html)
    }

    fn content_lines(lines: &[Line]) -> Vec<&Line> {
        lines.iter().filter(|l| l.has_content()).collect()
    }

    #[test]
    fn test_inline_text_joins_block() {
        let lines = segment("<div>Total <b>assets</b> grew</div><p>Next</p>");
        let lines = content_lines(&lines);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].content_text(), Some("Total assets grew"));
        assert_eq!(lines[0].tag, Tag::Element("div".into()));
        assert_eq!(lines[1].content_text(), Some("Next"));
        assert_eq!(lines[1].tag, Tag::Element("p".into()));
    }

    #[test]
    fn test_item_and_page_tracking() {
        let lines = segment(
            r#"<p>Intro</p>
            <p>ITEM 7A. Market risk</p>
            <p>Rates</p>
            <hr>
            <p>Currency</p>
            <div style="PAGE-BREAK-BEFORE: always"></div>
            <p>Item 8 Statements</p>"#,
        );
        let lines = content_lines(&lines);
        let summary: Vec<(Option<&str>, u32, &str)> = lines
            .iter()
            .map(|l| (l.item_number.as_deref(), l.page_number, l.content_text().unwrap_or("")))
            .collect();
        assert_eq!(
            summary,
            vec![
                (None, 1, "Intro"),
                (Some("7A"), 1, "ITEM 7A. Market risk"),
                (Some("7A"), 1, "Rates"),
                (Some("7A"), 2, "Currency"),
                (Some("8"), 3, "Item 8 Statements"),
            ]
        );
    }

    #[test]
    fn test_pages_never_decrease() {
        let lines = segment("<p>a</p><hr><p>b</p><hr><hr><p>c</p>");
        assert!(lines.windows(2).all(|w| w[0].page_number <= w[1].page_number));
        assert_eq!(lines.last().map(|l| l.page_number), Some(4));
    }

    #[test]
    fn test_table_becomes_one_line() {
        let lines = segment(
            r#"<p>Before</p>
            <table><tr><td colspan="2">A</td><td>B</td></tr><tr><td>C</td><td>D</td><td>E</td></tr></table>
            <p>After</p>"#,
        );
        let tables: Vec<&Line> = lines.iter().filter(|l| l.is_table()).collect();
        assert_eq!(tables.len(), 1);

        let table = tables[0].table_data().unwrap();
        assert_eq!(table.table_index, 1);
        assert_eq!(table.content, vec!["A", "B", "C", "D", "E"]);
        assert_eq!(
            table.grid,
            Grid::from_strings(vec![vec!["A", "A", "B"], vec!["C", "D", "E"]])
        );
        assert!(tables[0].element_index.is_some());
        assert!(!lines.iter().any(|l| matches!(l.tag.name(), Some("tr" | "td"))));

        let texts: Vec<&str> = lines
            .iter()
            .filter_map(Line::content_text)
            .filter(|t| !t.is_empty())
            .collect();
        assert_eq!(texts, vec!["Before", "After"]);
    }

    #[test]
    fn test_line_indices_ascend() {
        let lines = segment(
            "<p>a</p><table><tr><td>1</td></tr></table><p>b</p><table><tr><td>2</td></tr></table>",
        );
        assert!(lines.iter().enumerate().all(|(i, l)| l.line_index == i));
        let indices: Vec<usize> = lines.iter().filter_map(Line::table_index).collect();
        assert_eq!(indices, vec![1, 2]);
    }

    #[test]
    fn test_style_and_nbsp() {
        let lines = segment(
            r#"<p style="font-weight:bold">Net&nbsp;income <span style=" color:red ">up</span></p>"#,
        );
        let line = content_lines(&lines)[0];
        assert_eq!(line.content_text(), Some("Net income up"));
        assert_eq!(line.style.as_deref(), Some("font-weight:bold;color:red;"));
    }

    #[test]
    fn test_scripts_are_skipped() {
        let lines =
            segment("<p>Kept<script>var x = 1;</script></p><style>p { color: red }</style>");
        let texts: Vec<&str> = content_lines(&lines)
            .iter()
            .filter_map(|l| l.content_text())
            .collect();
        assert_eq!(texts, vec!["Kept"]);
    }

    #[test]
    fn test_cleaned_cells() {
        let lines = HtmlSegmenter::new(CellText::Clean)
            .segment("<table><tr><td>&nbsp;Total&nbsp;&nbsp;assets </td></tr></table>");
        let grid = lines.iter().find_map(Line::grid).unwrap();
        assert_eq!(grid.get(0, 0), Some("Total assets"));
    }

    #[test]
    fn test_deeply_nested_divs() {
        let depth = 30_000;
        let source = format!("{}x{}", "<div>".repeat(depth), "</div>".repeat(depth));
        let lines = segment(&source);
        let texts: Vec<&str> = content_lines(&lines)
            .iter()
            .filter_map(|l| l.content_text())
            .collect();
        assert_eq!(texts, vec!["x"]);
    }

    #[test]
    fn test_deep_nesting_inside_table() {
        let depth = 30_000;
        let source = format!(
            "<table><tr><td>{}cell{}</td></tr></table>",
            "<div>".repeat(depth),
            "</div>".repeat(depth)
        );
        let lines = segment(&source);
        let table = lines.iter().find_map(Line::table_data).unwrap();
        assert_eq!(table.content, vec!["cell"]);
        assert_eq!(table.grid.get(0, 0), Some("cell"));
    }
}
