//! The seam between the store client and a concrete tabular store.

use thiserror::Error;

use crate::cell::{CellAddress, CellRange};

/// Current grid extent of a sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetDimensions {
    pub rows: u32,
    pub cols: u32,
}

/// Failures reported by a backend.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Not authorized: {0}")]
    Auth(String),

    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    #[error("Malformed response: {0}")]
    Decode(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl BackendError {
    /// Network and API-layer failures worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            BackendError::Timeout(_)
            | BackendError::Connection(_)
            | BackendError::RateLimited(_)
            | BackendError::Transport(_) => true,
            BackendError::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// Result type for backend calls
pub type BackendResult<T> = std::result::Result<T, BackendError>;

/// A remote or local tabular store addressed by sheet title and 1-based cells.
///
/// Every call is a blocking round-trip; implementations must not cache sheet
/// contents between calls.
pub trait TabularBackend {
    /// Grid extent of `sheet`.
    fn dimensions(&self, sheet: &str) -> BackendResult<SheetDimensions>;

    /// Values in `range`, row-major.
    ///
    /// Trailing blank cells of a row and trailing blank rows may be omitted.
    fn read_range(&self, sheet: &str, range: &CellRange) -> BackendResult<Vec<Vec<String>>>;

    /// Column `col` from row 1 down to its last non-empty cell.
    fn read_column(&self, sheet: &str, col: u32) -> BackendResult<Vec<String>>;

    /// Write `rows` with their first cell at `top_left`.
    fn write_range(
        &mut self,
        sheet: &str,
        top_left: CellAddress,
        rows: &[Vec<String>],
    ) -> BackendResult<()>;

    /// Grow the row extent by `count`.
    fn add_rows(&mut self, sheet: &str, count: u32) -> BackendResult<()>;

    /// Remove rows `first..=last`, shifting the rows below up.
    fn delete_rows(&mut self, sheet: &str, first: u32, last: u32) -> BackendResult<()>;

    /// Blank every cell in `range`.
    fn clear_range(&mut self, sheet: &str, range: &CellRange) -> BackendResult<()>;
}

impl<B: TabularBackend + ?Sized> TabularBackend for Box<B> {
    fn dimensions(&self, sheet: &str) -> BackendResult<SheetDimensions> {
        (**self).dimensions(sheet)
    }

    fn read_range(&self, sheet: &str, range: &CellRange) -> BackendResult<Vec<Vec<String>>> {
        (**self).read_range(sheet, range)
    }

    fn read_column(&self, sheet: &str, col: u32) -> BackendResult<Vec<String>> {
        (**self).read_column(sheet, col)
    }

    fn write_range(
        &mut self,
        sheet: &str,
        top_left: CellAddress,
        rows: &[Vec<String>],
    ) -> BackendResult<()> {
        (**self).write_range(sheet, top_left, rows)
    }

    fn add_rows(&mut self, sheet: &str, count: u32) -> BackendResult<()> {
        (**self).add_rows(sheet, count)
    }

    fn delete_rows(&mut self, sheet: &str, first: u32, last: u32) -> BackendResult<()> {
        (**self).delete_rows(sheet, first, last)
    }

    fn clear_range(&mut self, sheet: &str, range: &CellRange) -> BackendResult<()> {
        (**self).clear_range(sheet, range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(BackendError::Timeout("read".into()).is_transient());
        assert!(BackendError::Connection("reset".into()).is_transient());
        assert!(BackendError::RateLimited("quota".into()).is_transient());
        assert!(BackendError::Transport("tls".into()).is_transient());
        assert!(BackendError::Api {
            status: 503,
            message: "unavailable".into()
        }
        .is_transient());
        assert!(BackendError::Api {
            status: 429,
            message: "quota".into()
        }
        .is_transient());

        assert!(!BackendError::Api {
            status: 400,
            message: "bad range".into()
        }
        .is_transient());
        assert!(!BackendError::SheetNotFound("x".into()).is_transient());
        assert!(!BackendError::Auth("expired".into()).is_transient());
        assert!(!BackendError::Decode("json".into()).is_transient());
    }
}
