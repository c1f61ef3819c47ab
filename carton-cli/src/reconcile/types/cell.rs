//! Raw spreadsheet cell values

use serde::{Deserialize, Serialize};

/// A single cell as it comes out of a workbook or a sink table.
///
/// Nothing about a cell is guaranteed: numbers may arrive as locale-formatted
/// text and dates as serial numbers, so consumers go through
/// [`crate::reconcile::coerce`] instead of matching on variants directly.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    /// Absent or empty cell (serialised as `null`)
    #[default]
    Empty,
    /// Boolean cell
    Bool(bool),
    /// Numeric cell, including date serials
    Number(f64),
    /// Text cell
    Text(String),
}

/// Shared empty cell for out-of-range lookups
pub(crate) static EMPTY_CELL: Cell = Cell::Empty;

impl Cell {
    /// True for empty cells and whitespace-only text
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Stringify the cell the way a spreadsheet would display its raw value
    pub fn to_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Bool(b) => b.to_string(),
            Cell::Number(n) => format_number(*n),
            Cell::Text(s) => s.clone(),
        }
    }

    /// Stringified and trimmed, used for header labels and contact names
    pub fn to_trimmed_text(&self) -> String {
        self.to_text().trim().to_string()
    }
}

/// Whole numbers print without a fractional part ("42", not "42.0")
fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        (n as i64).to_string()
    } else {
        n.to_string()
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_text())
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

impl From<i64> for Cell {
    fn from(n: i64) -> Self {
        Cell::Number(n as f64)
    }
}

impl From<bool> for Cell {
    fn from(b: bool) -> Self {
        Cell::Bool(b)
    }
}
