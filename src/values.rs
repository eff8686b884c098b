//! Currency-aware parsing of monetary cells into AED amounts.

use crate::types::RawCell;

/// Currency symbol/code -> multiplicative AED conversion factor.
///
/// Table order is the tie-break authority for substring matching: AED variants
/// first, then multi-character ISO codes, then single-character symbols. The
/// first entry found in the raw text wins. Rates are static lookup constants,
/// not live exchange rates.
pub const CURRENCY_RATES: &[(&str, f64)] = &[
    ("AED", 1.0),
    ("DHS", 1.0),
    ("USD", 3.67),
    ("EUR", 4.00),
    ("GBP", 4.65),
    ("SAR", 0.98),
    ("INR", 0.044),
    ("$", 3.67),
    ("\u{20AC}", 4.00),  // €
    ("\u{00A3}", 4.65),  // £
    ("\u{20B9}", 0.044), // ₹
];

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Detect the conversion factor for a textual cell. Defaults to 1.0 (AED).
fn detect_rate(text: &str) -> f64 {
    for (symbol, rate) in CURRENCY_RATES {
        if text.contains(symbol) {
            return *rate;
        }
    }
    1.0
}

/// Convert one raw cell into a signed AED amount.
///
/// Already-numeric cells are cast directly (no currency inferred). Text goes
/// through symbol detection, separator stripping and parenthesized-negative
/// handling, then conversion and rounding to 2 decimal places. Malformed
/// numeric text and native date cells degrade silently to 0.0 so a bad cell
/// never aborts a run.
pub fn parse_amount(cell: &RawCell) -> f64 {
    match cell {
        RawCell::Empty => 0.0,
        RawCell::Number(n) => *n,
        // A date serial in a monetary column is not an amount
        RawCell::Serial(_) => 0.0,
        RawCell::Text(s) => parse_amount_text(s),
    }
}

fn parse_amount_text(raw: &str) -> f64 {
    let rate = detect_rate(raw);

    let mut cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '(' | ')'))
        .collect();
    if cleaned.starts_with('(') && cleaned.ends_with(')') && cleaned.len() > 2 {
        cleaned = format!("-{}", &cleaned[1..cleaned.len() - 1]);
    } else {
        cleaned = cleaned.replace(['(', ')'], "");
    }

    let value: f64 = cleaned.parse().unwrap_or(0.0);
    round2(value * rate)
}
