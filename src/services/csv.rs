//! CSV parsing and template rendering
//!
//! The bulk-import dialog accepts arbitrary delimited files, so the parser
//! is deliberately forgiving: blank lines are dropped, short rows are
//! padded with empty strings, and all values stay strings (type coercion
//! is the importer's job).

use std::collections::HashMap;

/// A parsed CSV file: ordered headers plus one header->value mapping per
/// data row. Ephemeral; never persisted.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CsvBatch {
    pub headers: Vec<String>,
    pub rows: Vec<HashMap<String, String>>,
}

/// A downloadable CSV template: a filename, header line and example rows.
#[derive(Debug, Clone)]
pub struct CsvTemplate {
    pub filename: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvTemplate {
    /// Render the template to CSV text.
    pub fn render(&self) -> String {
        render_csv(&self.headers, &self.rows)
    }
}

/// Parse raw CSV text into headers and rows.
///
/// Lines are split on CR/LF and blank lines dropped; the first remaining
/// line is the header row. Fields may be wrapped in double quotes to
/// carry embedded commas, with `""` as the escape for a literal quote.
/// Values are trimmed. An empty input yields an empty batch, not an
/// error.
pub fn parse_csv(content: &str) -> CsvBatch {
    let lines: Vec<&str> = content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect();

    let Some((first, rest)) = lines.split_first() else {
        return CsvBatch::default();
    };

    let headers = split_csv_line(first);
    let rows = rest
        .iter()
        .map(|line| {
            let values = split_csv_line(line);
            headers
                .iter()
                .enumerate()
                .map(|(i, h)| (h.clone(), values.get(i).cloned().unwrap_or_default()))
                .collect()
        })
        .collect();

    CsvBatch { headers, rows }
}

/// Split a single CSV line into trimmed fields, honoring double quotes.
fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' => {
                if in_quotes && chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = !in_quotes;
                }
            }
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    fields.push(current.trim().to_string());

    fields
}

/// Render headers and rows as CSV text with a single trailing newline.
///
/// Cells containing a comma or quote are quoted with embedded quotes
/// doubled, so that `parse_csv` reproduces the input exactly. Cells with
/// embedded newlines are quoted too, but `parse_csv` splits on lines
/// before looking at quotes, so they do not round-trip.
pub fn render_csv(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut out = String::new();
    render_line(&mut out, headers);
    for row in rows {
        render_line(&mut out, row);
    }
    out
}

fn render_line(out: &mut String, fields: &[String]) {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        if field.contains(['"', ',', '\n', '\r']) {
            out.push('"');
            out.push_str(&field.replace('"', "\"\""));
            out.push('"');
        } else {
            out.push_str(field);
        }
    }
    out.push('\n');
}
