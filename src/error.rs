use thiserror::Error;

/// Columns every input must carry once aliases have been resolved.
pub const REQUIRED_COLUMNS: [&str; 3] = ["Zone", "Client Name", "Order Status"];

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),

    #[error(
        "Missing required columns: {}; expected at least: {}",
        .missing.join(", "),
        REQUIRED_COLUMNS.join(", ")
    )]
    SchemaValidation { missing: Vec<String> },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    #[error("Workbook error: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ReportError>;
