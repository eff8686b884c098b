//! Header-row detection and header-name reconciliation.

use crate::types::RawCell;
use unicode_normalization::UnicodeNormalization;

/// Keywords that mark a row as a likely header row.
const HEADER_KEYWORDS: &[&str] = &["supply", "box", "date", "tax", "gross", "net"];

/// Rows scanned when looking for the header row.
const HEADER_SCAN_ROWS: usize = 30;

/// Surface header -> canonical field name. Lookup is case- and
/// whitespace-insensitive; unmapped headers pass through unchanged.
const HEADER_ALIASES: &[(&str, &str)] = &[
    ("Supply Type", "Supply Type"),
    ("#", "Invoice Number"),
    ("Invoice #", "Invoice Number"),
    ("Invoice No.", "Invoice Number"),
    ("Date", "Date"),
    ("Recoverable", "Recoverable"),
    ("Customer/supplier Name", "Customer/supplier Name"),
    ("Customer Name", "Customer/supplier Name"),
    ("Supplier Name", "Customer/supplier Name"),
    ("Net", "Supply/Purchase Value"),
    ("Tax", "VAT Value"),
    ("Gross", "Invoice Value"),
    ("Box", "Box"),
];

/// The nine canonical record fields. Any of these missing after header mapping
/// is synthesized as an empty column.
pub const CANONICAL_FIELDS: &[&str] = &[
    "Supply Type",
    "Invoice Number",
    "Date",
    "Customer/supplier Name",
    "Supply/Purchase Value",
    "VAT Value",
    "Invoice Value",
    "Recoverable",
    "Box",
];

/// Clean a raw header string: NFKD decomposition, non-breaking space to
/// ordinary space, trim.
pub fn normalize_header(raw: &str) -> String {
    let decomposed: String = raw.nfkd().collect();
    decomposed.replace('\u{00A0}', " ").trim().to_string()
}

/// Map a cleaned header to its canonical field name, or return it unchanged.
pub fn canonical_header(cleaned: &str) -> String {
    let key = cleaned.trim();
    for (surface, canonical) in HEADER_ALIASES {
        if surface.eq_ignore_ascii_case(key) {
            return (*canonical).to_string();
        }
    }
    cleaned.to_string()
}

/// Find the zero-based index of the most likely header row.
///
/// Scans at most the first 30 rows; a row qualifies when at least 2 distinct
/// keywords appear as substrings of its lowercased cells. Falls back to row 0.
pub fn detect_header_row(grid: &[Vec<RawCell>]) -> usize {
    for (i, row) in grid.iter().take(HEADER_SCAN_ROWS).enumerate() {
        let cells: Vec<String> = row.iter().map(|c| c.as_text().to_lowercase()).collect();
        let score = HEADER_KEYWORDS
            .iter()
            .filter(|kw| cells.iter().any(|cell| cell.contains(*kw)))
            .count();
        if score >= 2 {
            return i;
        }
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_row(cells: &[&str]) -> Vec<RawCell> {
        cells.iter().map(|s| RawCell::Text(s.to_string())).collect()
    }

    #[test]
    fn detects_row_with_two_distinct_keywords() {
        let grid = vec![
            text_row(&["Company VAT Return", "", ""]),
            text_row(&["", "", ""]),
            text_row(&["Supply Type", "Date", "Net", "Box"]),
            text_row(&["Standard", "01/01/2024", "100", "A"]),
        ];
        assert_eq!(detect_header_row(&grid), 2);
    }

    #[test]
    fn score_counts_distinct_keywords_not_occurrences() {
        // "date" twice in one row is still a single keyword match
        let grid = vec![text_row(&["Date", "Due Date", "Name"])];
        assert_eq!(detect_header_row(&grid), 0);
    }

    #[test]
    fn defaults_to_row_zero_when_nothing_qualifies() {
        let grid = vec![
            text_row(&["a", "b"]),
            text_row(&["c", "d"]),
        ];
        assert_eq!(detect_header_row(&grid), 0);
        assert_eq!(detect_header_row(&[]), 0);
    }

    #[test]
    fn scan_window_is_capped_at_thirty_rows() {
        let mut grid: Vec<Vec<RawCell>> = (0..35).map(|_| text_row(&["x"])).collect();
        grid[33] = text_row(&["Supply Type", "Box"]);
        // Header row beyond the window is never returned
        assert_eq!(detect_header_row(&grid), 0);
    }

    #[test]
    fn normalizes_nbsp_and_whitespace() {
        assert_eq!(normalize_header(" Net\u{00A0}"), "Net");
        assert_eq!(normalize_header("Box "), "Box");
    }

    #[test]
    fn nfkd_strips_composed_forms() {
        // U+00C9 (E acute) decomposes to E + combining accent; the alias
        // lookup still sees the leading ASCII letters.
        let cleaned = normalize_header("\u{00C9}tat");
        assert!(cleaned.starts_with('E'));
    }

    #[test]
    fn alias_lookup_is_case_insensitive() {
        assert_eq!(canonical_header("net"), "Supply/Purchase Value");
        assert_eq!(canonical_header("TAX"), "VAT Value");
        assert_eq!(canonical_header("Invoice No."), "Invoice Number");
        assert_eq!(canonical_header("#"), "Invoice Number");
    }

    #[test]
    fn unmapped_headers_pass_through() {
        assert_eq!(canonical_header("Remarks"), "Remarks");
    }
}
