//! CSV options

use fleetsheet_core::memory::DEFAULT_ROWS;

/// How sheet files are read and written
#[derive(Debug, Clone)]
pub struct CsvOptions {
    /// Field delimiter (default: comma)
    pub delimiter: u8,
    /// Quote character (default: double quote)
    pub quote: u8,
    /// Line terminator for rewritten files
    pub line_terminator: LineTerminator,
    /// Smallest row extent reported for a sheet
    pub min_rows: u32,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
            line_terminator: LineTerminator::LF,
            min_rows: DEFAULT_ROWS,
        }
    }
}

/// Line terminator type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineTerminator {
    /// Unix-style (LF)
    LF,
    /// Windows-style (CRLF)
    CRLF,
}
