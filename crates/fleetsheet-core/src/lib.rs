//! # fleetsheet-core
//!
//! Core types for reading and writing a spreadsheet used as a small database.
//!
//! This crate provides the pieces every backend and the store client share:
//! - [`column`] - bijective base-26 column-letter codec
//! - [`CellAddress`] and [`CellRange`] - 1-based cell addressing
//! - [`CellValue`] - values written into cells and their text coercion
//! - [`resolve`] - deciding how many rows of a column span hold data
//! - [`RawGrid`] - fetched rows and the records pivoted from them
//! - [`TabularBackend`] - the seam to a concrete store, with [`MemoryBackend`]
//!
//! ## Example
//!
//! ```rust
//! use fleetsheet_core::{resolve, ColumnSpan, MemoryBackend, SheetGrid, TabularBackend};
//!
//! let backend = MemoryBackend::new().with_sheet(SheetGrid::from_rows(
//!     "devices",
//!     vec![vec!["id", "lat"], vec!["D1", "37.5"], vec!["D2", ""]],
//! ));
//!
//! let span = ColumnSpan::new("A", "B", &["B"]).unwrap();
//! let rows = backend
//!     .read_range("devices", &span.range_to(3).unwrap())
//!     .unwrap();
//! assert_eq!(resolve::resolve_last_row(&rows, &span), Some(2));
//! ```

pub mod backend;
pub mod cell;
pub mod column;
pub mod error;
pub mod grid;
pub mod memory;
pub mod resolve;

// Re-exports for convenience
pub use backend::{BackendError, BackendResult, SheetDimensions, TabularBackend};
pub use cell::{coerce_row, CellAddress, CellRange, CellValue};
pub use column::{letters_to_number, number_to_letters, Column};
pub use error::{Error, Result};
pub use grid::{ColumnRecord, RawGrid, RowRecord, ERROR_SENTINEL};
pub use memory::{MemoryBackend, SheetGrid};
pub use resolve::ColumnSpan;
