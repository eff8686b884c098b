use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Untyped cell content as read from a worksheet grid.
#[derive(Debug, Clone, PartialEq)]
pub enum RawCell {
    Empty,
    Text(String),
    Number(f64),
    /// Spreadsheet serial day-count (days since 1899-12-30).
    Serial(f64),
}

impl RawCell {
    pub fn is_empty(&self) -> bool {
        match self {
            RawCell::Empty => true,
            RawCell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Display form used for header matching and keyword scans.
    pub fn as_text(&self) -> String {
        match self {
            RawCell::Empty => String::new(),
            RawCell::Text(s) => s.clone(),
            RawCell::Number(n) => {
                // Avoid trailing ".0" for whole numbers
                if *n == (*n as i64) as f64 && n.abs() < i64::MAX as f64 {
                    format!("{}", *n as i64)
                } else {
                    format!("{}", n)
                }
            }
            RawCell::Serial(n) => format!("{}", n),
        }
    }
}

/// One raw worksheet: name plus the untyped cell grid.
#[derive(Debug, Clone)]
pub struct RawSheet {
    pub name: String,
    pub grid: Vec<Vec<RawCell>>,
}

/// One transaction row after processing a sheet. Monetary fields are in AED.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedRecord {
    pub supply_type: String,
    pub invoice_number: String,
    pub date: Option<NaiveDate>,
    pub customer_or_supplier_name: String,
    pub net_value: f64,
    pub vat_value: f64,
    pub invoice_value: f64,
    pub recoverable: String,
    /// Uppercased, trimmed box label; may be empty.
    #[serde(rename = "box")]
    pub box_label: String,
    /// First alphabetic character of the box label (after a literal BOX prefix).
    pub box_letter: Option<char>,
    /// Three-letter month label, or "Unknown".
    pub month: String,
    /// 1-12, 0 = unknown.
    pub month_number: u32,
    pub year: i32,
    pub source_sheet: String,
}

/// One (period, box) aggregate row of the final report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRow {
    pub period: String,
    pub fta_box: String,
    pub description: String,
    pub net_value: f64,
    pub vat_value: f64,
    pub net_vat_payable: f64,
}

/// Result of one end-to-end pipeline run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineOutput {
    pub records: Vec<NormalizedRecord>,
    pub summary: Vec<SummaryRow>,
    /// Non-blocking, cumulative warnings (skipped sheets, ambiguous years,
    /// failed persistence).
    pub warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mapping_hint: Option<crate::advisor::MappingHint>,
}
