use thiserror::Error;

#[derive(Error, Debug)]
pub enum SummaryError {
    #[error("Could not open workbook: {0}")]
    Workbook(String),

    #[error("Sheet '{name}' could not be processed: {reason}")]
    Sheet { name: String, reason: String },

    #[error("No sheets could be processed")]
    NoData,

    #[error("Export failed: {0}")]
    Export(#[from] rust_xlsxwriter::XlsxError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SummaryError>;
