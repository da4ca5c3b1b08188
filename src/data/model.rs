use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// CellValue – a single typed cell
// ---------------------------------------------------------------------------

/// A dynamically-typed cell produced by the loaders.
///
/// Serialized untagged so an exported series reads as plain JSON scalars.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Bool(bool),
    Null,
}

/// Text used for row labels and the preview table.
///
/// `Null` renders as an empty string, the same as a cell missing from its row.
impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(v) => write!(f, "{v}"),
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => Ok(()),
        }
    }
}

impl CellValue {
    /// The numeric value of the cell, if it holds a finite number.
    ///
    /// Booleans, text and non-finite floats are not numbers here.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(v) if v.is_finite() => Some(*v),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Record – one row of the table
// ---------------------------------------------------------------------------

/// One row: column name → cell. A key absent from the map is a missing cell.
pub type Record = BTreeMap<String, CellValue>;

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The parsed table together with its column order.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// All rows, in file order.
    pub rows: Vec<Record>,
    /// Column names taken from the first row, in file order.
    pub column_names: Vec<String>,
}

impl Dataset {
    /// Build a dataset from rows given in file order.
    ///
    /// `header` is the file's column order; only the names the first row
    /// actually carries become columns.
    pub fn from_rows(header: &[String], rows: Vec<Record>) -> Self {
        let column_names = match rows.first() {
            Some(first) => header
                .iter()
                .filter(|name| first.contains_key(name.as_str()))
                .cloned()
                .collect(),
            None => Vec::new(),
        };
        Dataset { rows, column_names }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The cell at `row` / `column`, `Null` when the row lacks that key.
    pub fn cell(&self, row: usize, column: &str) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .unwrap_or(&CellValue::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(cells: &[(&str, CellValue)]) -> Record {
        cells
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_display_drops_trailing_zero_fraction() {
        assert_eq!(CellValue::Number(1.0).to_string(), "1");
        assert_eq!(CellValue::Number(2.5).to_string(), "2.5");
        assert_eq!(CellValue::Null.to_string(), "");
        assert_eq!(CellValue::Bool(true).to_string(), "true");
    }

    #[test]
    fn test_as_number_rejects_non_finite_and_bool() {
        assert_eq!(CellValue::Number(3.0).as_number(), Some(3.0));
        assert_eq!(CellValue::Number(f64::NAN).as_number(), None);
        assert_eq!(CellValue::Number(f64::INFINITY).as_number(), None);
        assert_eq!(CellValue::Bool(true).as_number(), None);
        assert_eq!(CellValue::Text("4".into()).as_number(), None);
    }

    #[test]
    fn test_columns_come_from_first_row_in_header_order() {
        let header = vec!["b".to_string(), "a".to_string(), "c".to_string()];
        let rows = vec![
            record(&[("a", CellValue::Number(1.0)), ("b", CellValue::Null)]),
            record(&[("c", CellValue::Number(2.0))]),
        ];
        let ds = Dataset::from_rows(&header, rows);
        assert_eq!(ds.column_names, vec!["b", "a"]);
        assert_eq!(ds.cell(1, "a"), &CellValue::Null);
        assert_eq!(ds.cell(1, "c"), &CellValue::Number(2.0));
        assert_eq!(ds.cell(9, "a"), &CellValue::Null);
    }
}
