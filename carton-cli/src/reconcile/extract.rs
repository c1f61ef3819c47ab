//! Re-keys grid data rows by header label

use std::collections::HashMap;

use crate::reconcile::{Cell, EMPTY_CELL, Grid};

/// One data row keyed by trimmed header label
///
/// When two columns share a label the later column wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: HashMap<String, Cell>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cell under a label; unknown labels read as empty
    pub fn get(&self, label: &str) -> &Cell {
        self.fields.get(label).unwrap_or(&EMPTY_CELL)
    }

    pub fn insert(&mut self, label: impl Into<String>, cell: Cell) {
        self.fields.insert(label.into(), cell);
    }
}

impl<K: Into<String>> FromIterator<(K, Cell)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, Cell)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}

/// Turn every data row of a cleaned grid into a [`Record`]
pub fn extract_records(grid: &Grid) -> Vec<Record> {
    if grid.len() < 2 {
        return Vec::new();
    }

    let labels = grid.header_labels();
    grid.data_rows()
        .iter()
        .map(|row| {
            labels
                .iter()
                .enumerate()
                .map(|(i, label)| (label.clone(), row.get(i).cloned().unwrap_or_default()))
                .collect()
        })
        .collect()
}
