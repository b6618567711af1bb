//! Markdown table rendering.
//!
//! The first row is the header. Short rows are padded to the widest row and
//! cell text has pipes, backslashes and line breaks escaped so every row stays
//! on one line:
//!
//! ```markdown
//! | Name | Qty |
//! | --- | --- |
//! | Apple | 3 |
//! ```

/// Render `rows` as a GitHub Flavored Markdown table.
///
/// Returns an empty string when there are no rows or no columns.
pub fn rows_to_markdown(rows: &[Vec<String>]) -> String {
    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    if width == 0 {
        return String::new();
    }

    let mut markdown = String::with_capacity(rows.len() * width * 12);

    push_row(&mut markdown, &rows[0], width);

    markdown.push('|');
    for _ in 0..width {
        markdown.push_str(" --- |");
    }
    markdown.push('\n');

    for row in &rows[1..] {
        push_row(&mut markdown, row, width);
    }

    markdown
}

fn push_row(buffer: &mut String, row: &[String], width: usize) {
    buffer.push('|');
    for i in 0..width {
        buffer.push(' ');
        if let Some(cell) = row.get(i) {
            escape_cell_into(buffer, cell);
        }
        buffer.push_str(" |");
    }
    buffer.push('\n');
}

#[inline]
fn escape_cell_into(buffer: &mut String, cell: &str) {
    for ch in cell.trim().chars() {
        match ch {
            '|' => buffer.push_str("\\|"),
            '\\' => buffer.push_str("\\\\"),
            '\n' => buffer.push_str("<br>"),
            '\r' => {}
            _ => buffer.push(ch),
        }
    }
}
