//! Calendar day coercion for serial numbers and date text

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::reconcile::Cell;

/// Serial number of 1970-01-01 in the 1900 date system (day zero = 1899-12-30)
const UNIX_EPOCH_SERIAL: f64 = 25_569.0;
const SECONDS_PER_DAY: f64 = 86_400.0;

/// `YYYY-MM-DD` with an optional ` HH:MM[:SS[.fff]]` or `THH:MM[:SS[.fff]]`
/// suffix and nothing after it. Text carrying an offset goes to the generic parser.
static ISO_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{4})-(\d{2})-(\d{2})(?:[T ](\d{1,2}):(\d{2})(?::(\d{2})(?:\.\d+)?)?)?$")
        .unwrap()
});

/// `DD/MM/YYYY`, `DD-MM-YYYY` or `DD.MM.YYYY` with an optional time
static DMY_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,2})[/.\-](\d{1,2})[/.\-](\d{4})(?:[T ,]+(\d{1,2}):(\d{2})(?::(\d{2}))?)?$")
        .unwrap()
});

const FALLBACK_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

const FALLBACK_DATE_FORMATS: &[&str] = &[
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%d %B %Y",
    "%d %b %Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%b %d %Y",
    "%a %b %d %Y",
];

/// Coerce a cell to a zero-padded `YYYY-MM-DD` day, `None` when unparseable
pub fn coerce_date(cell: &Cell) -> Option<String> {
    parse_date(cell).map(|d| d.format("%Y-%m-%d").to_string())
}

/// Read a cell as a calendar day
///
/// Numbers are spreadsheet serials; text is tried as ISO, then day-first,
/// then a handful of common layouts. The calendar fields are taken as
/// written, never shifted through UTC.
pub fn parse_date(cell: &Cell) -> Option<NaiveDate> {
    match cell {
        Cell::Number(n) => serial_to_date(*n),
        Cell::Text(s) => parse_date_text(s.trim()),
        Cell::Empty | Cell::Bool(_) => None,
    }
}

fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() {
        return None;
    }
    let seconds = ((serial - UNIX_EPOCH_SERIAL) * SECONDS_PER_DAY).round();
    if seconds.abs() >= i64::MAX as f64 {
        return None;
    }
    DateTime::from_timestamp(seconds as i64, 0).map(|dt| dt.naive_utc().date())
}

fn parse_date_text(s: &str) -> Option<NaiveDate> {
    if s.is_empty() {
        return None;
    }

    if let Some(caps) = ISO_DATE.captures(s) {
        return build_date(
            caps.get(1)?.as_str(),
            caps.get(2)?.as_str(),
            caps.get(3)?.as_str(),
            time_parts(&caps, 4),
        );
    }

    if let Some(caps) = DMY_DATE.captures(s) {
        return build_date(
            caps.get(3)?.as_str(),
            caps.get(2)?.as_str(),
            caps.get(1)?.as_str(),
            time_parts(&caps, 4),
        );
    }

    parse_generic(s)
}

fn time_parts<'a>(caps: &regex::Captures<'a>, first: usize) -> Option<(&'a str, &'a str, &'a str)> {
    let hour = caps.get(first)?.as_str();
    let minute = caps.get(first + 1)?.as_str();
    let second = caps.get(first + 2).map(|m| m.as_str()).unwrap_or("0");
    Some((hour, minute, second))
}

fn build_date(
    year: &str,
    month: &str,
    day: &str,
    time: Option<(&str, &str, &str)>,
) -> Option<NaiveDate> {
    let date = NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)?;
    if let Some((h, m, s)) = time {
        NaiveTime::from_hms_opt(h.parse().ok()?, m.parse().ok()?, s.parse().ok()?)?;
    }
    Some(date)
}

fn parse_generic(s: &str) -> Option<NaiveDate> {
    // Explicit offsets are converted to the local calendar
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local).date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Local).date_naive());
    }

    FALLBACK_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok().map(|dt| dt.date()))
        .or_else(|| {
            FALLBACK_DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(cell: Cell) -> Option<String> {
        coerce_date(&cell)
    }

    #[test]
    fn test_serial_numbers() {
        assert_eq!(day(Cell::Number(1.0)), Some("1899-12-31".into()));
        assert_eq!(day(Cell::Number(25569.0)), Some("1970-01-01".into()));
        assert_eq!(day(Cell::Number(44986.0)), Some("2023-03-01".into()));
        assert_eq!(day(Cell::Number(45000.0)), Some("2023-03-15".into()));
    }

    #[test]
    fn test_serial_with_time_stays_on_its_day() {
        assert_eq!(day(Cell::Number(45000.99)), Some("2023-03-15".into()));
        assert_eq!(day(Cell::Number(45000.0001)), Some("2023-03-15".into()));
    }

    #[test]
    fn test_serial_and_iso_agree() {
        assert_eq!(day(Cell::Number(45000.0)), day(Cell::from("2023-03-15")));
    }

    #[test]
    fn test_iso_text() {
        assert_eq!(day(Cell::from("2024-01-01")), Some("2024-01-01".into()));
        assert_eq!(day(Cell::from("2024-01-01 23:59:59")), Some("2024-01-01".into()));
        assert_eq!(day(Cell::from("2024-01-01T00:00:00")), Some("2024-01-01".into()));
        assert_eq!(day(Cell::from("2024-12-31T23:30")), Some("2024-12-31".into()));
        assert_eq!(day(Cell::from("2024-02-30")), None);
        assert_eq!(day(Cell::from("2024-01-01T08:15:30.250")), Some("2024-01-01".into()));
    }

    #[test]
    fn test_iso_prefix_with_trailing_text_is_none() {
        assert_eq!(day(Cell::from("2024-01-01garbage")), None);
        assert_eq!(day(Cell::from("2024-01-01 12:00 extra")), None);
    }

    #[test]
    fn test_offset_converted_to_local_day() {
        let text = "2024-01-01T23:30:00-05:00";
        let expected = DateTime::parse_from_rfc3339(text)
            .unwrap()
            .with_timezone(&Local)
            .date_naive()
            .format("%Y-%m-%d")
            .to_string();
        assert_eq!(day(Cell::from(text)), Some(expected));
    }

    #[test]
    fn test_day_first_text() {
        assert_eq!(day(Cell::from("05/03/2024")), Some("2024-03-05".into()));
        assert_eq!(day(Cell::from("5-3-2024")), Some("2024-03-05".into()));
        assert_eq!(day(Cell::from("31.12.2023 18:45")), Some("2023-12-31".into()));
        assert_eq!(day(Cell::from("13/13/2024")), None);
    }

    #[test]
    fn test_generic_fallback() {
        assert_eq!(day(Cell::from("2024/03/05")), Some("2024-03-05".into()));
        assert_eq!(day(Cell::from("5 March 2024")), Some("2024-03-05".into()));
        assert_eq!(day(Cell::from("March 5, 2024")), Some("2024-03-05".into()));
    }

    #[test]
    fn test_unparseable_is_none() {
        assert_eq!(day(Cell::from("")), None);
        assert_eq!(day(Cell::from("not a date")), None);
        assert_eq!(day(Cell::Empty), None);
        assert_eq!(day(Cell::Bool(true)), None);
        assert_eq!(day(Cell::Number(f64::NAN)), None);
    }
}
