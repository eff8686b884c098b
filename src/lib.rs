//! VAT box summary generation.
//!
//! Ingests multi-sheet transaction workbooks, normalizes headers, amounts and
//! dates, classifies records into FTA boxes and aggregates them into a
//! per-period Box A-D summary with an xlsx export artifact and SQLite
//! persistence.

pub mod advisor;
pub mod db;
pub mod error;
pub mod export;
pub mod headers;
pub mod period;
pub mod pipeline;
pub mod sheet;
pub mod summary;
pub mod types;
pub mod values;
pub mod workbook;

pub use error::{Result, SummaryError};
pub use pipeline::{run_bytes, run_path, RunOptions};
pub use types::{NormalizedRecord, PipelineOutput, RawCell, RawSheet, SummaryRow};
