//! CLI wrapper: process a workbook and print the Box A-D summary.
//!
//! Usage: vat_summary <workbook.xlsx> [export.xlsx] [summary.db]

use std::path::PathBuf;
use std::process::ExitCode;
use vat_box_summary::{run_path, RunOptions};

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(input) = args.first() else {
        eprintln!("Usage: vat_summary <workbook.xlsx> [export.xlsx] [summary.db]");
        return ExitCode::FAILURE;
    };

    let options = RunOptions {
        export_path: args.get(1).map(PathBuf::from),
        db_path: args.get(2).map(PathBuf::from),
        use_mapping_advisor: false,
    };

    let output = match run_path(&PathBuf::from(input), &options) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    for warning in &output.warnings {
        eprintln!("Warning: {}", warning);
    }

    println!(
        "{:<10} {:<7} {:<40} {:>14} {:>14} {:>16}",
        "Period", "FTA Box", "Description", "Net Value", "VAT Value", "Net VAT Payable"
    );
    for row in &output.summary {
        println!(
            "{:<10} {:<7} {:<40} {:>14.2} {:>14.2} {:>16.2}",
            row.period, row.fta_box, row.description, row.net_value, row.vat_value, row.net_vat_payable
        );
    }
    eprintln!(
        "Processed {} records into {} summary rows",
        output.records.len(),
        output.summary.len()
    );
    ExitCode::SUCCESS
}
