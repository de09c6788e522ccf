//! Lenient cell parsing for dates and amounts
//!
//! Source files mix day-first text dates, ISO text dates, native Excel
//! dates and raw serial numbers, sometimes within one column.

use std::str::FromStr;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;

use crate::report::types::Cell;

/// Date-time formats, in the order they are tried
///
/// Day-first comes before month-first so that "03/04/2024" is the 3rd of
/// April; ISO forms cannot be confused with either.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %I:%M:%S%.f %p",
    "%Y-%m-%d %I:%M %p",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
    "%Y/%m/%d %I:%M:%S%.f %p",
    "%Y/%m/%d %I:%M %p",
    "%d/%m/%Y %H:%M:%S%.f",
    "%d/%m/%Y %H:%M",
    "%d/%m/%Y %I:%M:%S%.f %p",
    "%d/%m/%Y %I:%M %p",
    "%d-%m-%Y %H:%M:%S%.f",
    "%d-%m-%Y %H:%M",
    "%d-%m-%Y %I:%M:%S%.f %p",
    "%d-%m-%Y %I:%M %p",
    "%d.%m.%Y %H:%M:%S%.f",
    "%d.%m.%Y %H:%M",
    "%m/%d/%Y %H:%M:%S%.f",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M:%S%.f %p",
    "%m/%d/%Y %I:%M %p",
];

/// Spanish meridiem markers and their chrono equivalents
const MERIDIEM_MARKERS: [(&str, &str); 4] = [
    ("a. m.", "AM"),
    ("p. m.", "PM"),
    ("a.m.", "AM"),
    ("p.m.", "PM"),
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%m/%d/%Y",
];

/// Largest Excel serial date (9999-12-31)
const MAX_EXCEL_SERIAL: f64 = 2_958_466.0;

/// Parse a cell as a date-time; `None` when it cannot be read as one
pub fn parse_datetime(cell: &Cell) -> Option<NaiveDateTime> {
    match cell {
        Cell::DateTime(dt) => Some(*dt),
        Cell::Number(n) => excel_serial_to_datetime(*n),
        Cell::Text(s) => parse_datetime_str(s),
        Cell::Empty | Cell::Bool(_) => None,
    }
}

/// Parse a date-time from text, accepting day-first and ISO orderings
pub fn parse_datetime_str(s: &str) -> Option<NaiveDateTime> {
    let s = normalize_meridiem(s.trim());
    let s = s.as_str();
    if s.is_empty() {
        return None;
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d.and_time(NaiveTime::MIN));
        }
    }

    None
}

/// Rewrite a trailing "p. m." style marker as "PM"
fn normalize_meridiem(s: &str) -> String {
    for (marker, replacement) in MERIDIEM_MARKERS {
        let Some(cut) = s.len().checked_sub(marker.len()) else {
            continue;
        };
        if s.is_char_boundary(cut) && s[cut..].eq_ignore_ascii_case(marker) {
            return format!("{} {}", s[..cut].trim_end(), replacement);
        }
    }
    s.to_string()
}

/// Convert an Excel serial number (1900 date system) to a date-time
pub fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial <= 0.0 || serial >= MAX_EXCEL_SERIAL {
        return None;
    }

    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_time(NaiveTime::MIN);
    let millis = (serial * 86_400_000.0).round() as i64;
    epoch.checked_add_signed(Duration::milliseconds(millis))
}

/// Parse a cell as a decimal amount
pub fn parse_decimal(cell: &Cell) -> Option<Decimal> {
    match cell {
        Cell::Number(n) => Decimal::from_f64(*n),
        Cell::Text(s) => {
            let s = s.trim();
            if s.is_empty() {
                return None;
            }
            Decimal::from_str(s)
                .or_else(|_| Decimal::from_scientific(s))
                .ok()
        }
        Cell::Empty | Cell::Bool(_) | Cell::DateTime(_) => None,
    }
}

/// Amount with unparseable values coerced to zero
pub fn parse_amount(cell: Option<&Cell>) -> Decimal {
    cell.and_then(parse_decimal).unwrap_or(Decimal::ZERO)
}
