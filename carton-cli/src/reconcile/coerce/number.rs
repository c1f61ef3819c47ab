//! Locale-tolerant number coercion

use crate::reconcile::Cell;

/// Coerce a cell to a number, `0.0` when it cannot be read as one
pub fn coerce_number(cell: &Cell) -> f64 {
    parse_number(cell).unwrap_or(0.0)
}

/// Read a cell as a finite number, if it is one
///
/// Text is normalised first: whitespace (including non-breaking and narrow
/// no-break spaces) and apostrophe thousands separators are stripped. When
/// both `,` and `.` appear, the one occurring last is the decimal separator
/// and the other is dropped; a lone `,` is a decimal separator.
pub fn parse_number(cell: &Cell) -> Option<f64> {
    match cell {
        Cell::Empty => None,
        Cell::Number(n) => n.is_finite().then_some(*n),
        Cell::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Cell::Text(s) => parse_number_text(s),
    }
}

fn parse_number_text(s: &str) -> Option<f64> {
    let cleaned: String = s
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '\'' | '\u{2019}'))
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    let normalized = match (cleaned.rfind(','), cleaned.rfind('.')) {
        (Some(comma), Some(dot)) if comma > dot => cleaned.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => cleaned.replace(',', ""),
        (Some(_), None) => cleaned.replace(',', "."),
        _ => cleaned,
    };

    normalized.parse::<f64>().ok().filter(|n| n.is_finite())
}
