//! Date parsing and reporting-period inference.
//!
//! Dates arrive as native spreadsheet serials, ISO strings, or day-first
//! localized text. The reporting month comes from the sheet name where
//! possible; the reporting year is the mode of the sheet's date column.

use crate::types::RawCell;
use chrono::{Datelike, Local, NaiveDate, NaiveDateTime};
use regex::Regex;
use std::sync::OnceLock;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Legacy spreadsheet epoch: serial day 0.
fn excel_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1899, 12, 30).expect("valid epoch date")
}

/// Month-name token -> (label, number). Substring match against the
/// normalized sheet name; "sept" is an explicit alias for September.
const MONTH_TOKENS: &[(&str, &str, u32)] = &[
    ("sept", "Sep", 9),
    ("jan", "Jan", 1),
    ("feb", "Feb", 2),
    ("mar", "Mar", 3),
    ("apr", "Apr", 4),
    ("may", "May", 5),
    ("jun", "Jun", 6),
    ("jul", "Jul", 7),
    ("aug", "Aug", 8),
    ("sep", "Sep", 9),
    ("oct", "Oct", 10),
    ("nov", "Nov", 11),
    ("dec", "Dec", 12),
];

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Label for a 1-12 month number.
pub fn month_label(number: u32) -> &'static str {
    MONTH_LABELS
        .get(number.wrapping_sub(1) as usize)
        .copied()
        .unwrap_or("Unknown")
}

/// Day-first text formats tried in order, then ISO date/datetime forms.
const DATE_FORMATS: &[&str] = &[
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%d/%m/%y",
    "%d %b %Y",
    "%d %B %Y",
    "%Y-%m-%d",
];

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    excel_epoch().checked_add_signed(chrono::Duration::days(serial as i64))
}

/// Parse one cell into a calendar date. Unparseable input yields `None`,
/// never an error.
///
/// Priority: native serial dates pass through; bare numbers in [1, 60000] are
/// interpreted as serial day-counts; text is tried day-first.
pub fn parse_date(cell: &RawCell) -> Option<NaiveDate> {
    match cell {
        RawCell::Empty => None,
        RawCell::Serial(s) => serial_to_date(*s),
        RawCell::Number(n) => {
            if *n >= 1.0 && *n <= 60000.0 {
                serial_to_date(*n)
            } else {
                None
            }
        }
        RawCell::Text(s) => parse_date_text(s),
    }
}

fn parse_date_text(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    None
}

/// Lowercase a sheet name, fold diacritics away and turn every
/// non-alphanumeric character into a space.
fn normalize_sheet_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.nfkd() {
        if is_combining_mark(c) {
            continue;
        }
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(' ');
        }
    }
    out
}

fn digit_token_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b(\d{1,2})\b").expect("digit token regex"))
}

/// Infer the reporting month from a sheet name.
///
/// Month-name tokens win; otherwise a standalone one- or two-digit token in
/// 1-12 is taken as a month number. Returns `("Unknown", 0)` when neither
/// matches.
pub fn month_from_sheet_name(name: &str) -> (String, u32) {
    let normalized = normalize_sheet_name(name);
    for (token, label, number) in MONTH_TOKENS {
        if normalized.contains(token) {
            return ((*label).to_string(), *number);
        }
    }
    for cap in digit_token_regex().captures_iter(&normalized) {
        if let Ok(n) = cap[1].parse::<u32>() {
            if (1..=12).contains(&n) {
                return (month_label(n).to_string(), n);
            }
        }
    }
    ("Unknown".to_string(), 0)
}

/// Resolve the dominant reporting year of a sheet from its parsed dates.
///
/// No parseable dates -> current calendar year. Otherwise the most frequent
/// year wins, ties broken by first-encountered maximum; the second element is
/// true when more than one distinct year appeared (ambiguity warning).
pub fn resolve_year(dates: &[NaiveDate]) -> (i32, bool) {
    if dates.is_empty() {
        return (Local::now().year(), false);
    }
    let mut counts: Vec<(i32, usize)> = Vec::new();
    for d in dates {
        let year = d.year();
        match counts.iter_mut().find(|(y, _)| *y == year) {
            Some((_, c)) => *c += 1,
            None => counts.push((year, 1)),
        }
    }
    let mut best = counts[0];
    for &(year, count) in &counts[1..] {
        if count > best.1 {
            best = (year, count);
        }
    }
    (best.0, counts.len() > 1)
}
