//! End-to-end processing run: workbook -> records -> summary -> sinks.

use crate::advisor;
use crate::db::Db;
use crate::error::{Result, SummaryError};
use crate::export;
use crate::headers::{detect_header_row, normalize_header};
use crate::sheet::process_sheet;
use crate::summary::summarize;
use crate::types::{PipelineOutput, RawSheet};
use crate::workbook;
use std::path::{Path, PathBuf};

/// Per-run settings. Sinks are optional; when set, failures there degrade to
/// warnings and the in-memory summary is still returned.
#[derive(Debug, Default, Clone)]
pub struct RunOptions {
    /// Write the summary artifact to this xlsx path.
    pub export_path: Option<PathBuf>,
    /// Persist the summary into this SQLite database (full replace).
    pub db_path: Option<PathBuf>,
    /// Ask the mapping advisor for a header-mapping hint (advisory only).
    pub use_mapping_advisor: bool,
}

/// Process a workbook file end to end.
pub fn run_path(path: &Path, options: &RunOptions) -> Result<PipelineOutput> {
    let mut warnings = Vec::new();
    let sheets = workbook::load_path(path, &mut warnings)?;
    run_sheets(sheets, warnings, options)
}

/// Process in-memory workbook bytes end to end (the upload boundary).
pub fn run_bytes(bytes: &[u8], options: &RunOptions) -> Result<PipelineOutput> {
    let mut warnings = Vec::new();
    let sheets = workbook::load_bytes(bytes, &mut warnings)?;
    run_sheets(sheets, warnings, options)
}

fn run_sheets(
    sheets: Vec<RawSheet>,
    mut warnings: Vec<String>,
    options: &RunOptions,
) -> Result<PipelineOutput> {
    let mut records = Vec::new();
    let mut processed_sheets = 0usize;

    for sheet in &sheets {
        match process_sheet(sheet) {
            Ok(outcome) => {
                records.extend(outcome.records);
                warnings.extend(outcome.warnings);
                processed_sheets += 1;
            }
            Err(e) => {
                let msg = e.to_string();
                log::warn!("{}", msg);
                warnings.push(msg);
            }
        }
    }

    if processed_sheets == 0 {
        return Err(SummaryError::NoData);
    }

    let summary = summarize(&records);

    let mapping_hint = if options.use_mapping_advisor {
        advisor::suggest_column_mapping(&surface_headers(&sheets))
    } else {
        None
    };

    let mut output = PipelineOutput {
        records,
        summary,
        warnings,
        mapping_hint,
    };

    if let Some(path) = &options.export_path {
        if let Err(e) = export::export_to_path(&output.summary, path) {
            let msg = format!("Could not export summary to {}: {}", path.display(), e);
            log::warn!("{}", msg);
            output.warnings.push(msg);
        }
    }
    if let Some(path) = &options.db_path {
        if let Err(e) = persist(&output, path) {
            let msg = format!("Could not save summary to {}: {}", path.display(), e);
            log::warn!("{}", msg);
            output.warnings.push(msg);
        }
    }

    Ok(output)
}

fn persist(output: &PipelineOutput, db_path: &Path) -> Result<()> {
    let db = Db::new(db_path)?;
    db.replace_summary(&output.summary)
}

/// Cleaned surface headers of the first sheet with a detectable header row,
/// fed to the mapping advisor.
fn surface_headers(sheets: &[RawSheet]) -> Vec<String> {
    for sheet in sheets {
        let header_row = detect_header_row(&sheet.grid);
        if let Some(row) = sheet.grid.get(header_row) {
            let headers: Vec<String> = row
                .iter()
                .map(|c| normalize_header(&c.as_text()))
                .filter(|h| !h.is_empty())
                .collect();
            if !headers.is_empty() {
                return headers;
            }
        }
    }
    Vec::new()
}
