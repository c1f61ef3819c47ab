//! Canonical `{headers, rows}` tables passed between pipeline stages

use serde::{Deserialize, Deserializer, Serialize};

use super::cell::{Cell, EMPTY_CELL};

/// Name of the identity column, always first in a table
pub const CONTACT_HEADER: &str = "Contact";

/// Prefix of every per-day amount column
pub const DAY_COLUMN_PREFIX: &str = "nombre colonne carton ";

/// Header name for the amount column of an ISO day
pub fn day_column(day: &str) -> String {
    format!("{}{}", DAY_COLUMN_PREFIX, day)
}

/// Aggregated table: `headers[0]` is [`CONTACT_HEADER`], `row[0]` the contact
/// and every other cell a number once a stage has produced it.
///
/// Tables are never mutated once handed on; every stage builds a new one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    #[serde(default, deserialize_with = "lenient_headers")]
    pub headers: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        Table { headers, rows }
    }

    /// `{ headers: ["Contact"], rows: [] }`
    pub fn empty() -> Self {
        Table {
            headers: vec![CONTACT_HEADER.to_string()],
            rows: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Trimmed contact identity of a row
    pub fn contact_of(row: &[Cell]) -> String {
        row.first().unwrap_or(&EMPTY_CELL).to_trimmed_text()
    }

    /// Cell at (row, col); short rows read as empty
    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY_CELL)
    }

    /// Every row has exactly one cell per header
    #[cfg(test)]
    pub fn is_rectangular(&self) -> bool {
        self.rows.iter().all(|r| r.len() == self.headers.len())
    }
}

/// Header cells read back from a sheet may be blank or numeric; keep them as
/// their display text instead of rejecting the table
fn lenient_headers<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let cells = Vec::<Cell>::deserialize(deserializer)?;
    Ok(cells.iter().map(Cell::to_text).collect())
}

impl Default for Table {
    fn default() -> Self {
        Table::empty()
    }
}
