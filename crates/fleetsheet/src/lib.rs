//! # fleetsheet
//!
//! A spreadsheet used as a small database for a motorcycle fleet dashboard.
//!
//! [`SheetClient`] wraps any [`TabularBackend`] and provides:
//!
//! - column-span loads bounded by key columns ([`SheetClient::fetch_grid`],
//!   [`SheetClient::fetch_records`], [`SheetClient::fetch_single_row`])
//! - single-cell reads and writes
//! - appends and key-lookup updates
//! - bounded linear-backoff retry of transient backend failures
//!
//! On top of it sit the login gate ([`auth`]), the per-session dashboard state
//! ([`session`]) and device telemetry records ([`telemetry`]).
//!
//! Backends: [`MemoryBackend`] always, `CsvBackend` with the `csv` feature and
//! `GoogleSheetsBackend` with the `gsheets` feature.
//!
//! ## Example
//!
//! ```rust
//! use fleetsheet::prelude::*;
//!
//! let backend = MemoryBackend::new().with_sheet(SheetGrid::from_rows(
//!     "log",
//!     vec![vec!["time", "user"], vec!["09:00", "kim"]],
//! ));
//! let mut client = SheetClient::new(backend).with_retry(RetryPolicy::none());
//!
//! let row = client.append_row("log", ["09:05", "lee"], "A").unwrap();
//! assert_eq!(row, 3);
//!
//! let records = client.fetch_records("log", "A", "B", &["A"]).unwrap();
//! assert_eq!(records["user"], vec!["kim", "lee"]);
//! ```

pub mod auth;
pub mod client;
pub mod mutation;
pub mod prelude;
pub mod retry;
pub mod session;
pub mod telemetry;

#[cfg(test)]
mod testing;

pub use auth::{AuthConfig, Authenticator, LoginOutcome};
pub use client::SheetClient;
pub use mutation::DuplicateKeyPolicy;
pub use retry::{RetryPolicy, Sleeper, ThreadSleeper};
pub use session::{DeviceSelection, Menu, SessionContext};
pub use telemetry::{DeviceRecord, MapMarker, Motion, TelemetryConfig};

// Re-export core types
pub use fleetsheet_core::{
    coerce_row, letters_to_number, number_to_letters, BackendError, BackendResult, CellAddress,
    CellRange, CellValue, Column, ColumnRecord, ColumnSpan, Error, MemoryBackend, RawGrid,
    Result, RowRecord, SheetDimensions, SheetGrid, TabularBackend, ERROR_SENTINEL,
};

// Re-export backends
#[cfg(feature = "csv")]
pub use fleetsheet_csv::{CsvBackend, CsvError};
#[cfg(feature = "gsheets")]
pub use fleetsheet_gsheets::{GoogleSheetsBackend, GoogleSheetsConfig, GsheetsError};
