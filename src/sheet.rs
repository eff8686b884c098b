//! Sheet processing: one raw worksheet grid into normalized records.

use crate::error::{Result, SummaryError};
use crate::headers::{canonical_header, detect_header_row, normalize_header};
use crate::period::{month_from_sheet_name, month_label, parse_date, resolve_year};
use crate::types::{NormalizedRecord, RawCell, RawSheet};
use crate::values::parse_amount;
use chrono::Datelike;

/// Records of one processed sheet plus any non-blocking warnings raised while
/// resolving its period.
#[derive(Debug, Default)]
pub struct SheetOutcome {
    pub records: Vec<NormalizedRecord>,
    pub warnings: Vec<String>,
}

fn sheet_error(name: &str, reason: &str) -> SummaryError {
    SummaryError::Sheet {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}

/// Column lookup for the nine canonical fields. Missing fields resolve to
/// `None` and read as empty cells downstream.
struct ColumnMap {
    indices: Vec<(String, usize)>,
}

impl ColumnMap {
    fn from_header_row(row: &[RawCell]) -> Self {
        let mut indices = Vec::new();
        for (idx, cell) in row.iter().enumerate() {
            let cleaned = normalize_header(&cell.as_text());
            if cleaned.is_empty() {
                continue;
            }
            let canonical = canonical_header(&cleaned);
            // First occurrence wins on duplicate headers
            if !indices.iter().any(|(name, _)| *name == canonical) {
                indices.push((canonical, idx));
            }
        }
        ColumnMap { indices }
    }

    fn get<'a>(&self, field: &str, row: &'a [RawCell]) -> &'a RawCell {
        self.indices
            .iter()
            .find(|(name, _)| name == field)
            .and_then(|(_, idx)| row.get(*idx))
            .unwrap_or(&RawCell::Empty)
    }
}

fn extract_box_letter(box_label: &str) -> Option<char> {
    box_label
        .replace("BOX", "")
        .chars()
        .find(|c| c.is_ascii_alphabetic())
}

/// Transform one raw sheet into a normalized record set.
///
/// Locates the header row, reconciles headers against the alias vocabulary,
/// synthesizes missing canonical columns as empty, parses the three monetary
/// columns, and resolves the sheet's (month, year) period.
pub fn process_sheet(sheet: &RawSheet) -> Result<SheetOutcome> {
    if sheet.grid.iter().all(|row| row.iter().all(|c| c.is_empty())) {
        return Err(sheet_error(&sheet.name, "sheet has no data"));
    }

    let header_row = detect_header_row(&sheet.grid);
    let header_cells = sheet
        .grid
        .get(header_row)
        .ok_or_else(|| sheet_error(&sheet.name, "header row out of range"))?;
    let columns = ColumnMap::from_header_row(header_cells);
    if columns.indices.is_empty() {
        return Err(sheet_error(&sheet.name, "no headers found"));
    }

    let data_rows: Vec<&Vec<RawCell>> = sheet
        .grid
        .iter()
        .skip(header_row + 1)
        .filter(|row| !row.iter().all(|c| c.is_empty()))
        .collect();

    let mut warnings = Vec::new();

    let (sheet_month, sheet_month_number) = month_from_sheet_name(&sheet.name);

    let parsed_dates: Vec<chrono::NaiveDate> = data_rows
        .iter()
        .filter_map(|row| parse_date(columns.get("Date", row)))
        .collect();
    let (year, ambiguous) = resolve_year(&parsed_dates);
    if ambiguous {
        let msg = format!(
            "Sheet '{}' contains dates from multiple years; using {}",
            sheet.name, year
        );
        log::warn!("{}", msg);
        warnings.push(msg);
    }

    let mut records = Vec::with_capacity(data_rows.len());
    for row in data_rows {
        let date = parse_date(columns.get("Date", row));

        let (month, month_number) = if sheet_month_number != 0 {
            (sheet_month.clone(), sheet_month_number)
        } else if let Some(d) = date {
            (month_label(d.month()).to_string(), d.month())
        } else {
            ("Unknown".to_string(), 0)
        };

        let box_label = columns
            .get("Box", row)
            .as_text()
            .trim()
            .to_uppercase();
        let box_letter = extract_box_letter(&box_label);

        records.push(NormalizedRecord {
            supply_type: columns.get("Supply Type", row).as_text().trim().to_string(),
            invoice_number: columns.get("Invoice Number", row).as_text().trim().to_string(),
            date,
            customer_or_supplier_name: columns
                .get("Customer/supplier Name", row)
                .as_text()
                .trim()
                .to_string(),
            net_value: parse_amount(columns.get("Supply/Purchase Value", row)),
            vat_value: parse_amount(columns.get("VAT Value", row)),
            invoice_value: parse_amount(columns.get("Invoice Value", row)),
            recoverable: columns.get("Recoverable", row).as_text().trim().to_string(),
            box_label,
            box_letter,
            month,
            month_number,
            year,
            source_sheet: sheet.name.clone(),
        });
    }

    Ok(SheetOutcome { records, warnings })
}
