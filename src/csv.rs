//! Minimal CSV/TSV parser that produces a [`DataMatrix`].

use crate::types::{CellValue, DataMatrix};

/// Delimiter for parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Comma,
    Tab,
}

impl Delimiter {
    /// Pick the delimiter from a file name: `.tsv`/`.tab` are tab-separated,
    /// anything else comma-separated.
    pub fn for_path(path: &str) -> Self {
        let lower = path.to_ascii_lowercase();
        if lower.ends_with(".tsv") || lower.ends_with(".tab") {
            Self::Tab
        } else {
            Self::Comma
        }
    }

    fn as_char(self) -> char {
        match self {
            Self::Comma => ',',
            Self::Tab => '\t',
        }
    }
}

/// Parse CSV/TSV bytes into a data matrix, one row per non-empty line.
///
/// Empty fields read as `Null`, numeric fields as numbers, `true`/`false` as
/// booleans and everything else as text.
pub fn parse_delimited(data: &[u8], delim: Delimiter) -> DataMatrix {
    let text = String::from_utf8_lossy(data);
    let sep = delim.as_char();

    let rows: Vec<Vec<CellValue>> = text
        .lines()
        .filter(|line| !line.is_empty())
        .map(|line| {
            split_csv_line(line, sep)
                .into_iter()
                .map(|field| detect_value(field.trim()))
                .collect()
        })
        .collect();

    log::debug!("parsed {} delimited rows", rows.len());
    DataMatrix::new(rows)
}

fn detect_value(field: &str) -> CellValue {
    if field.is_empty() {
        return CellValue::Null;
    }
    if let Ok(n) = field.parse::<f64>() {
        if n.is_finite() {
            return CellValue::Number(n);
        }
    }
    match field {
        "true" | "TRUE" => CellValue::Bool(true),
        "false" | "FALSE" => CellValue::Bool(false),
        _ => CellValue::Text(field.to_string()),
    }
}

/// Split a CSV line respecting quoted fields.
fn split_csv_line(line: &str, sep: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == '"' {
                if chars.peek() == Some(&'"') {
                    // Escaped quote
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(ch);
            }
        } else if ch == '"' {
            in_quotes = true;
        } else if ch == sep {
            fields.push(std::mem::take(&mut current));
        } else {
            current.push(ch);
        }
    }
    fields.push(current);
    fields
}
