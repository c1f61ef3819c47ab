//! Per-contact, per-day aggregation of extracted records

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::reconcile::coerce::{coerce_date, coerce_number};
use crate::reconcile::extract::Record;
use crate::reconcile::{CONTACT_HEADER, Cell, ColumnMapping, Table, day_column};

/// Counters describing one aggregation
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AggregateStats {
    /// Records received
    pub records: usize,
    /// Records discarded because their key was already seen
    pub duplicates: usize,
    /// Records skipped because their date did not parse
    pub undated: usize,
    pub contacts: usize,
    pub days: usize,
}

/// Deduplicate by key, then sum amounts per (contact, day)
#[cfg(test)]
pub fn aggregate(records: &[Record], mapping: &ColumnMapping) -> Table {
    aggregate_with_stats(records, mapping).0
}

/// [`aggregate`] plus the counters for logging
///
/// The first record per key survives. Contacts of every surviving record get a
/// row, even when none of their records carry a usable date. Unobserved
/// contact/day cells are explicit zeros.
pub fn aggregate_with_stats(records: &[Record], mapping: &ColumnMapping) -> (Table, AggregateStats) {
    let mut stats = AggregateStats {
        records: records.len(),
        ..Default::default()
    };
    if records.is_empty() {
        return (Table::empty(), stats);
    }

    let mut seen: HashSet<String> = HashSet::new();
    let mut contacts: BTreeSet<String> = BTreeSet::new();
    let mut days: BTreeSet<String> = BTreeSet::new();
    let mut buckets: HashMap<(String, String), f64> = HashMap::new();

    for record in records {
        if !seen.insert(record.get(&mapping.key).to_text()) {
            stats.duplicates += 1;
            continue;
        }

        let contact = record.get(&mapping.user).to_trimmed_text();
        contacts.insert(contact.clone());

        let Some(day) = coerce_date(record.get(&mapping.date)) else {
            stats.undated += 1;
            continue;
        };
        days.insert(day.clone());

        let amount = coerce_number(record.get(&mapping.sum));
        *buckets.entry((contact, day)).or_insert(0.0) += amount;
    }

    let mut headers = Vec::with_capacity(days.len() + 1);
    headers.push(CONTACT_HEADER.to_string());
    headers.extend(days.iter().map(|d| day_column(d)));

    let rows = contacts
        .iter()
        .map(|contact| {
            let mut row = Vec::with_capacity(days.len() + 1);
            row.push(Cell::Text(contact.clone()));
            for day in &days {
                let total = buckets
                    .get(&(contact.clone(), day.clone()))
                    .copied()
                    .unwrap_or(0.0);
                row.push(Cell::Number(total));
            }
            row
        })
        .collect();

    stats.contacts = contacts.len();
    stats.days = days.len();
    (Table::new(headers, rows), stats)
}
