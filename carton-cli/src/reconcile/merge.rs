//! Outer join of two aggregated tables on contact and column name

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::reconcile::coerce::coerce_number;
use crate::reconcile::{CONTACT_HEADER, Cell, Table};

/// Sum two tables cell by cell over the union of their columns and contacts
///
/// Headers keep first-seen order (A then B) with `Contact` moved to the
/// front; contacts are sorted. Cells missing from either side count as zero,
/// so every non-contact output cell is a finite number.
pub fn merge_tables(a: &Table, b: &Table) -> Table {
    let headers = union_headers(a, b);

    let contacts: BTreeSet<String> = a
        .rows
        .iter()
        .chain(b.rows.iter())
        .map(|row| Table::contact_of(row))
        .collect();

    let sources = [SourceIndex::new(a), SourceIndex::new(b)];

    let rows = contacts
        .into_iter()
        .map(|contact| {
            let mut row = vec![Cell::Number(0.0); headers.len()];
            for source in &sources {
                if let Some(src_row) = source.row_for(&contact) {
                    source.add_into(&mut row, src_row, &headers);
                }
            }
            row[0] = Cell::Text(contact);
            for cell in row.iter_mut().skip(1) {
                *cell = Cell::Number(coerce_number(cell));
            }
            row
        })
        .collect();

    Table::new(headers, rows)
}

fn union_headers(a: &Table, b: &Table) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut headers: Vec<String> = a
        .headers
        .iter()
        .chain(b.headers.iter())
        .filter(|h| seen.insert(h.as_str()))
        .cloned()
        .collect();

    match headers.iter().position(|h| h == CONTACT_HEADER) {
        Some(0) => {}
        Some(pos) => {
            let contact = headers.remove(pos);
            headers.insert(0, contact);
        }
        None => headers.insert(0, CONTACT_HEADER.to_string()),
    }
    headers
}

/// Lookup structures over one input table
struct SourceIndex<'a> {
    columns: HashMap<&'a str, usize>,
    rows: HashMap<String, &'a [Cell]>,
}

impl<'a> SourceIndex<'a> {
    fn new(table: &'a Table) -> Self {
        let columns = table
            .headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.as_str(), i))
            .collect();

        // First row per contact wins
        let mut rows = HashMap::new();
        for row in &table.rows {
            rows.entry(Table::contact_of(row)).or_insert(row.as_slice());
        }

        SourceIndex { columns, rows }
    }

    fn row_for(&self, contact: &str) -> Option<&'a [Cell]> {
        self.rows.get(contact).copied()
    }

    fn add_into(&self, target: &mut [Cell], src_row: &[Cell], headers: &[String]) {
        for (i, name) in headers.iter().enumerate().skip(1) {
            let value = self
                .columns
                .get(name.as_str())
                .and_then(|&si| src_row.get(si))
                .map(coerce_number)
                .unwrap_or(0.0);
            target[i] = Cell::Number(coerce_number(&target[i]) + value);
        }
    }
}
