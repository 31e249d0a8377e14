//! Error types for fleetsheet-core

use thiserror::Error;

use crate::backend::BackendError;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the store client and its helpers
#[derive(Debug, Error)]
pub enum Error {
    /// Column letters were empty or contained a non-letter
    #[error("Invalid column letters: {0:?}")]
    InvalidColumnFormat(String),

    /// Column number was not positive
    #[error("Invalid column number: {0} (columns start at 1)")]
    InvalidColumnInput(u32),

    /// Cell address or coordinates are malformed
    #[error("Invalid cell address: {0}")]
    InvalidAddress(String),

    /// Key column does not lie inside the loaded column span
    #[error("Key column {column} is outside the span {start}:{end}")]
    KeyColumnOutOfSpan {
        column: String,
        start: String,
        end: String,
    },

    /// The resolved range holds no usable data
    #[error("No usable data in '{sheet}'!{range}: {reason}")]
    EmptyRange {
        sheet: String,
        range: String,
        reason: &'static str,
    },

    /// Lookup-update target key was not found
    #[error("Key {key:?} not found in column {column} of '{sheet}'")]
    KeyNotFound {
        sheet: String,
        column: String,
        key: String,
    },

    /// Lookup-update key matched more than one row
    #[error("Key {key:?} matches rows {rows:?} in column {column} of '{sheet}'")]
    DuplicateKey {
        sheet: String,
        column: String,
        key: String,
        rows: Vec<u32>,
    },

    /// A mutation was called with nothing to write
    #[error("Nothing to write to '{sheet}'")]
    EmptyInput { sheet: String },

    /// A value could not be turned into cell text
    #[error("Cannot convert {value} to cell text")]
    Coercion { value: String },

    /// A telemetry field could not be parsed
    #[error("Invalid {field} in row {row}: {value:?}")]
    InvalidTelemetry {
        row: usize,
        field: &'static str,
        value: String,
    },

    /// A record lacks an expected header
    #[error("Header {header:?} missing from '{sheet}'")]
    MissingHeader { sheet: String, header: String },

    /// Transient failures persisted past the retry budget
    #[error("Gave up after {attempts} attempts: {last}")]
    RetryExhausted { attempts: u32, last: BackendError },

    /// Failure reported by the backend
    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl Error {
    /// Whether a retry could succeed.
    ///
    /// Only backend failures classified as transient qualify; validation
    /// errors always fail fast.
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::Backend(e) if e.is_transient())
    }

    /// Build an [`Error::EmptyRange`].
    pub fn empty_range(sheet: &str, range: impl ToString, reason: &'static str) -> Self {
        Error::EmptyRange {
            sheet: sheet.to_string(),
            range: range.to_string(),
            reason,
        }
    }
}
