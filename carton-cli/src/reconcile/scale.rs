//! Scalar transform over table values

use crate::reconcile::coerce::coerce_number;
use crate::reconcile::{Cell, Table};

/// New table with every non-contact cell multiplied by `factor`
pub fn scale_table(table: &Table, factor: f64) -> Table {
    let rows = table
        .rows
        .iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .map(|(i, cell)| {
                    if i == 0 {
                        cell.clone()
                    } else {
                        Cell::Number(coerce_number(cell) * factor)
                    }
                })
                .collect()
        })
        .collect();

    Table::new(table.headers.clone(), rows)
}
