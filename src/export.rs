//! Spreadsheet export of the summary table (the downloadable artifact).

use crate::error::Result;
use crate::types::SummaryRow;
use rust_xlsxwriter::{Format, FormatAlign, Workbook, XlsxError};
use std::path::Path;

/// Fixed worksheet name of the exported artifact.
pub const EXPORT_SHEET_NAME: &str = "VAT_Summary";

/// Column headers, in output order.
const EXPORT_HEADERS: &[&str] = &[
    "Period",
    "FTA Box",
    "Description",
    "Net Value",
    "VAT Value",
    "Net VAT Payable",
];

/// Amount columns (Net Value, VAT Value, Net VAT Payable).
const AMOUNT_COLUMNS: [usize; 3] = [3, 4, 5];
const AMOUNT_WIDTH: f64 = 14.0;

/// Estimate column width from text length (char count x 1.2, clamped 10-50).
fn estimate_text_width(text: &str) -> f64 {
    let w = text.chars().count() as f64 * 1.2;
    w.clamp(10.0, 50.0)
}

fn column_widths(rows: &[SummaryRow]) -> Vec<f64> {
    let mut widths: Vec<f64> = EXPORT_HEADERS.iter().map(|h| estimate_text_width(h)).collect();
    for row in rows {
        for (col, value) in [(0, &row.period), (1, &row.fta_box), (2, &row.description)] {
            let w = estimate_text_width(value);
            if w > widths[col] {
                widths[col] = w;
            }
        }
    }
    for idx in AMOUNT_COLUMNS {
        widths[idx] = AMOUNT_WIDTH;
    }
    widths
}

fn build_workbook(rows: &[SummaryRow]) -> std::result::Result<Workbook, XlsxError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(EXPORT_SHEET_NAME)?;

    let header_format = Format::new()
        .set_bold()
        .set_background_color(rust_xlsxwriter::Color::RGB(0x2563EB))
        .set_font_color(rust_xlsxwriter::Color::RGB(0xFFFFFF));
    let amount_format = Format::new()
        .set_num_format("#,##0.00")
        .set_align(FormatAlign::Right);

    for (col, &w) in column_widths(rows).iter().enumerate() {
        worksheet.set_column_width(col as u16, w)?;
    }
    for (col, header) in EXPORT_HEADERS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
    }

    for (row_idx, summary) in rows.iter().enumerate() {
        let row = (row_idx + 1) as u32;
        worksheet.write_string(row, 0, &summary.period)?;
        worksheet.write_string(row, 1, &summary.fta_box)?;
        worksheet.write_string(row, 2, &summary.description)?;
        worksheet.write_number_with_format(row, 3, summary.net_value, &amount_format)?;
        worksheet.write_number_with_format(row, 4, summary.vat_value, &amount_format)?;
        worksheet.write_number_with_format(row, 5, summary.net_vat_payable, &amount_format)?;
    }

    worksheet.set_freeze_panes(1, 0)?;
    Ok(workbook)
}

/// Write the summary table to an xlsx file at `path`.
pub fn export_to_path(rows: &[SummaryRow], path: &Path) -> Result<()> {
    let mut workbook = build_workbook(rows)?;
    workbook.save(path)?;
    Ok(())
}

/// Render the summary table to in-memory xlsx bytes (download artifact).
pub fn export_to_bytes(rows: &[SummaryRow]) -> Result<Vec<u8>> {
    let mut workbook = build_workbook(rows)?;
    Ok(workbook.save_to_buffer()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{open_workbook, Data, Reader, Xlsx};
    use tempfile::tempdir;

    fn sample_rows() -> Vec<SummaryRow> {
        vec![
            SummaryRow {
                period: "Jan 2024".to_string(),
                fta_box: "Box A".to_string(),
                description: "Standard Rated Supplies (5%)".to_string(),
                net_value: 500000.0,
                vat_value: 25000.0,
                net_vat_payable: 0.0,
            },
            SummaryRow {
                period: "Jan 2024".to_string(),
                fta_box: "Box D".to_string(),
                description: "Net VAT Payable (BoxA_VAT - BoxC_VAT)".to_string(),
                net_value: 0.0,
                vat_value: 15000.0,
                net_vat_payable: 15000.0,
            },
        ]
    }

    #[test]
    fn exported_file_round_trips_through_calamine() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("summary.xlsx");
        export_to_path(&sample_rows(), &path).unwrap();

        let mut workbook: Xlsx<_> = open_workbook(&path).unwrap();
        let range = workbook.worksheet_range(EXPORT_SHEET_NAME).unwrap();
        let rows: Vec<Vec<Data>> = range.rows().map(|r| r.to_vec()).collect();

        assert_eq!(rows[0][0], Data::String("Period".to_string()));
        assert_eq!(rows[0][5], Data::String("Net VAT Payable".to_string()));
        assert_eq!(rows[1][0], Data::String("Jan 2024".to_string()));
        assert_eq!(rows[1][3], Data::Float(500000.0));
        assert_eq!(rows[2][1], Data::String("Box D".to_string()));
        assert_eq!(rows[2][5], Data::Float(15000.0));
    }

    #[test]
    fn buffer_export_produces_a_readable_workbook() {
        let bytes = export_to_bytes(&sample_rows()).unwrap();
        assert!(!bytes.is_empty());
        // xlsx is a zip container
        assert_eq!(&bytes[0..2], b"PK");
    }
}
