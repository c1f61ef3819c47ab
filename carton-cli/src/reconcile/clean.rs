//! Strips export artefacts from a raw worksheet grid
//!
//! Two artefacts are handled: the header row repeated as the first data row,
//! and a synthetic totals row at the bottom of the sheet.

use crate::reconcile::coerce::parse_number;
use crate::reconcile::{Cell, Grid, Row};

/// First-cell labels that mark a totals row (compared trimmed, lowercase)
pub const TOTAL_TOKENS: &[&str] = &["total", "totaux", "somme", "sum", "grand total", "subtotal"];

/// What the cleaner removed
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CleanReport {
    pub removed_duplicate_header: bool,
    pub removed_totals_row: bool,
}

/// Remove at most one duplicated header row and at most one trailing totals row
pub fn clean_grid(mut grid: Grid) -> (Grid, CleanReport) {
    let mut report = CleanReport::default();

    if grid.len() >= 2 && is_duplicate_header(&grid.rows()[0], &grid.rows()[1]) {
        grid.remove_row(1);
        report.removed_duplicate_header = true;
    }

    if grid.len() >= 2 {
        let last = grid.len() - 1;
        if is_totals_row(&grid.rows()[last]) {
            grid.remove_row(last);
            report.removed_totals_row = true;
        }
    }

    (grid, report)
}

/// Row equals the header position-wise after stringifying and trimming.
/// Missing trailing cells compare as empty.
pub fn is_duplicate_header(header: &Row, row: &Row) -> bool {
    let width = header.len().max(row.len());
    (0..width).all(|i| cell_text(header, i) == cell_text(row, i))
}

fn cell_text(row: &Row, i: usize) -> String {
    row.get(i).map(Cell::to_trimmed_text).unwrap_or_default()
}

/// A totals row is labelled as one, or has (almost) only numbers after its
/// first cell: at most one non-empty trailing cell fails to parse as a number.
pub fn is_totals_row(row: &Row) -> bool {
    let label = row
        .first()
        .map(|c| c.to_trimmed_text().to_lowercase())
        .unwrap_or_default();
    if TOTAL_TOKENS.contains(&label.as_str()) {
        return true;
    }

    let trailing: Vec<&Cell> = row.iter().skip(1).filter(|c| !c.is_blank()).collect();
    if trailing.is_empty() {
        return false;
    }
    let numeric = trailing.iter().filter(|c| parse_number(c).is_some()).count();
    numeric + 1 >= trailing.len()
}
