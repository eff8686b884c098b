//! Workbook loading via calamine. The UI shell hands us either a file path or
//! raw workbook bytes; both end up as untyped [`RawSheet`] grids.

use crate::error::{Result, SummaryError};
use crate::types::{RawCell, RawSheet};
use calamine::{open_workbook_auto, open_workbook_from_rs, Data, Reader, Xlsx};
use std::io::Cursor;
use std::path::Path;

fn data_to_raw_cell(data: &Data) -> RawCell {
    match data {
        Data::Empty => RawCell::Empty,
        Data::String(s) => RawCell::Text(s.clone()),
        Data::Int(i) => RawCell::Number(*i as f64),
        Data::Float(f) => RawCell::Number(*f),
        Data::Bool(b) => RawCell::Text(b.to_string()),
        // calamine DateTime is a serial day-count since 1899-12-30
        Data::DateTime(dt) => RawCell::Serial(dt.as_f64()),
        Data::DateTimeIso(s) => RawCell::Text(s.clone()),
        Data::DurationIso(s) => RawCell::Text(s.clone()),
        Data::Error(_) => RawCell::Empty,
    }
}

fn collect_sheets<RS, R>(workbook: &mut R, warnings: &mut Vec<String>) -> Vec<RawSheet>
where
    RS: std::io::Read + std::io::Seek,
    R: Reader<RS>,
    R::Error: std::fmt::Display,
{
    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    let mut sheets = Vec::new();
    for name in &sheet_names {
        let range = match workbook.worksheet_range(name) {
            Ok(r) => r,
            Err(e) => {
                let msg = format!("Skipping unreadable sheet '{}': {}", name, e);
                log::warn!("{}", msg);
                warnings.push(msg);
                continue;
            }
        };
        let grid: Vec<Vec<RawCell>> = range
            .rows()
            .map(|row| row.iter().map(data_to_raw_cell).collect())
            .collect();
        sheets.push(RawSheet {
            name: name.clone(),
            grid,
        });
    }
    sheets
}

/// Load every sheet of a workbook file (.xlsx/.xls/.xlsb/.ods by extension).
/// Sheets whose range cannot be read are skipped with a warning.
pub fn load_path(path: &Path, warnings: &mut Vec<String>) -> Result<Vec<RawSheet>> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| SummaryError::Workbook(format!("Could not open {}: {}", path.display(), e)))?;
    Ok(collect_sheets(&mut workbook, warnings))
}

/// Load every sheet from in-memory xlsx bytes (the upload boundary).
pub fn load_bytes(bytes: &[u8], warnings: &mut Vec<String>) -> Result<Vec<RawSheet>> {
    let cursor = Cursor::new(bytes.to_vec());
    let mut workbook: Xlsx<_> = open_workbook_from_rs(cursor)
        .map_err(|e| SummaryError::Workbook(format!("Could not open workbook bytes: {}", e)))?;
    Ok(collect_sheets(&mut workbook, warnings))
}
