//! Read-side view of the scaled table stored by the sink

pub mod export;
pub mod render;

pub use export::write_pivot_csv;
pub use render::render_text;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::reconcile::Table;
use crate::reconcile::coerce::coerce_number;

static DAY_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)nombre colonne carton\s+(\d{4}-\d{2}-\d{2})$").unwrap());

/// Contact × day matrix extracted from a stored table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pivot {
    /// ISO days in header order
    pub days: Vec<String>,
    pub contacts: Vec<String>,
    /// `matrix[contact][day]`
    pub matrix: Vec<Vec<f64>>,
}

impl Pivot {
    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    pub fn row_totals(&self) -> Vec<f64> {
        self.matrix.iter().map(|row| row.iter().sum()).collect()
    }

    pub fn column_totals(&self) -> Vec<f64> {
        (0..self.days.len())
            .map(|d| self.matrix.iter().map(|row| row[d]).sum())
            .collect()
    }

    pub fn grand_total(&self) -> f64 {
        self.matrix.iter().flatten().sum()
    }
}

/// Pick the day columns out of a table and coerce their values
///
/// Headers that are not day columns are skipped, as are rows without a
/// contact.
pub fn parse_pivot(table: &Table) -> Pivot {
    let mut day_columns = Vec::new();
    let mut days = Vec::new();
    for (index, header) in table.headers.iter().enumerate().skip(1) {
        if let Some(caps) = DAY_HEADER.captures(header) {
            day_columns.push(index);
            days.push(caps[1].to_string());
        }
    }

    let mut contacts = Vec::new();
    let mut matrix = Vec::new();
    for (r, row) in table.rows.iter().enumerate() {
        let contact = Table::contact_of(row);
        if contact.is_empty() {
            continue;
        }
        contacts.push(contact);
        matrix.push(
            day_columns
                .iter()
                .map(|&c| coerce_number(table.cell(r, c)))
                .collect(),
        );
    }

    Pivot {
        days,
        contacts,
        matrix,
    }
}
