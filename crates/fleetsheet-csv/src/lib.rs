//! # fleetsheet-csv
//!
//! A local store for fleetsheet: a directory holding one CSV file per sheet.
//!
//! Every backend call reads the sheet's file afresh and every mutation
//! rewrites it before returning, so several processes may share a directory
//! with the same last-writer-wins behaviour as the remote store.

mod backend;
mod error;
mod options;
mod reader;
mod writer;

pub use backend::{sanitize_sheet_name, CsvBackend};
pub use error::{CsvError, CsvResult};
pub use options::{CsvOptions, LineTerminator};
pub use reader::read_rows;
pub use writer::write_rows;
