//! CSV error types

use fleetsheet_core::BackendError;
use thiserror::Error;

/// Result type for CSV operations
pub type CsvResult<T> = std::result::Result<T, CsvError>;

/// Errors that can occur during CSV operations
#[derive(Debug, Error)]
pub enum CsvError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV library error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// No file for the sheet
    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    /// Sheet name is empty once sanitized
    #[error("Invalid sheet name: {0:?}")]
    InvalidSheetName(String),

    /// Core error
    #[error("Core error: {0}")]
    Core(#[from] fleetsheet_core::Error),
}

impl From<CsvError> for BackendError {
    fn from(err: CsvError) -> Self {
        match err {
            CsvError::Io(e) => BackendError::Io(e),
            CsvError::SheetNotFound(name) => BackendError::SheetNotFound(name),
            CsvError::Core(fleetsheet_core::Error::Backend(e)) => e,
            CsvError::Csv(e) if e.is_io_error() => match e.into_kind() {
                csv::ErrorKind::Io(io) => BackendError::Io(io),
                other => BackendError::Decode(format!("{other:?}")),
            },
            CsvError::Csv(e) => BackendError::Decode(e.to_string()),
            other => BackendError::Other(other.to_string()),
        }
    }
}
