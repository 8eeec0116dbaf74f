use serde::{Deserialize, Serialize};
use std::fmt;

/// A raw value stored in the data matrix.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl CellValue {
    /// True for `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Numeric view of the value, if it is a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Text view of the value, if it is text.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for CellValue {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// The externally owned data matrix: rows of cell values.
///
/// Rows may have different lengths; a missing cell reads as `None`.
/// The grid only ever reads it, and tables hold it behind an `Rc` so that
/// replacing the reference is the one visible mutation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataMatrix {
    rows: Vec<Vec<CellValue>>,
}

impl DataMatrix {
    /// Wrap existing rows.
    pub fn new(rows: Vec<Vec<CellValue>>) -> Self {
        Self { rows }
    }

    /// Build a `rows` × `cols` matrix from a generator function.
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> CellValue) -> Self {
        let rows = (0..rows)
            .map(|r| (0..cols).map(|c| f(r, c)).collect())
            .collect();
        Self { rows }
    }

    /// Parse a JSON array of arrays.
    pub fn from_json(json: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns, taken from the first row (0 when empty).
    pub fn column_count(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    /// Value at `(row, col)`, `None` when outside the stored cells.
    pub fn get(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.rows.get(row)?.get(col)
    }

    /// All rows.
    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }
}

impl From<Vec<Vec<CellValue>>> for DataMatrix {
    fn from(rows: Vec<Vec<CellValue>>) -> Self {
        Self::new(rows)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_plain_text() {
        assert_eq!(CellValue::Number(3.0).to_string(), "3");
        assert_eq!(CellValue::Number(2.5).to_string(), "2.5");
        assert_eq!(CellValue::Bool(true).to_string(), "true");
        assert_eq!(CellValue::from("x").to_string(), "x");
        assert_eq!(CellValue::Null.to_string(), "");
    }

    #[test]
    fn test_ragged_matrix() {
        let m = DataMatrix::from_json(r#"[[1, "a", null], [true]]"#).unwrap();
        assert_eq!(m.row_count(), 2);
        assert_eq!(m.column_count(), 3);
        assert_eq!(m.get(0, 1), Some(&CellValue::from("a")));
        assert_eq!(m.get(0, 2), Some(&CellValue::Null));
        assert_eq!(m.get(1, 0), Some(&CellValue::Bool(true)));
        assert_eq!(m.get(1, 1), None);
        assert_eq!(m.get(5, 0), None);
    }

    #[test]
    fn test_empty_matrix() {
        let m = DataMatrix::default();
        assert_eq!(m.row_count(), 0);
        assert_eq!(m.column_count(), 0);
    }
}
