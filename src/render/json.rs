//! JSON rendering for lines, search results and documents.

use serde::Serialize;

use crate::error::{Error, Result};

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Serialize any rendered value (lines, search results, a document) to JSON.
pub fn to_json<T: Serialize + ?Sized>(value: &T, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(value),
        JsonFormat::Compact => serde_json::to_string(value),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Grid, Line, TableLine, Tag};

    #[test]
    fn test_text_line_json() {
        let line = Line::text(3, 2, Some("7A".to_string()), Tag::Element("p".into()), "Rates");
        let json = to_json(&line, JsonFormat::Compact).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["line_index"], 3);
        assert_eq!(value["page_number"], 2);
        assert_eq!(value["item_number"], "7A");
        assert_eq!(value["tag"]["name"], "p");
        assert_eq!(value["kind"]["type"], "text");
        assert_eq!(value["kind"]["content"], "Rates");
        assert!(!json.contains('\n'));
    }

    #[test]
    fn test_table_line_json() {
        let table = TableLine {
            table_index: 1,
            content: vec!["A".to_string()],
            grid: Grid::from_rows(vec![vec![Some("A".to_string()), None]]),
        };
        let line = Line::table(0, 1, None, table);
        let json = to_json(&line, JsonFormat::Pretty).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["tag"]["type"], "table");
        assert_eq!(value["kind"]["type"], "table");
        assert_eq!(value["kind"]["table_index"], 1);
        assert_eq!(value["kind"]["grid"], serde_json::json!([["A", null]]));
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_lines_round_trip() {
        let lines = vec![Line::text(0, 1, None, Tag::Text, "x")];
        let json = to_json(&lines, JsonFormat::Compact).unwrap();
        let back: Vec<Line> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, lines);
    }
}
