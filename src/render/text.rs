//! Plain text rendering for lines.

use crate::model::Line;

use super::RenderOptions;

/// Render lines as plain text, one line per output line.
///
/// Tables render row by row with tab-separated cells.
pub fn to_text<'a, I>(lines: I, options: &RenderOptions) -> String
where
    I: IntoIterator<Item = &'a Line>,
{
    let mut output = String::new();
    let mut page = None;

    for line in lines.into_iter().filter(|l| options.keeps(l)) {
        if options.page_headers && page != Some(line.page_number) {
            page = Some(line.page_number);
            output.push_str(&format!("--- page {} ---\n", line.page_number));
        }
        output.push_str(line.plain_text().trim_end());
        output.push('\n');
    }

    output
}
