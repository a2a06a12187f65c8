use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Workbook error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("Invalid year: {0:?} (expected a positive integer)")]
    InvalidYear(String),

    #[error("Invalid {series} row #{index}: {reason}")]
    InvalidAggregateRow {
        series: String,
        index: usize,
        reason: String,
    },

    #[error("Amount overflow: {0}")]
    AmountOverflow(String),

    #[error("Unknown level: {0}")]
    UnknownLevel(String),

    #[error("Sheet not found: {0}")]
    MissingSheet(String),

    #[error("Column not found: {0}")]
    MissingColumn(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, ReportError>;
