//! Google Sheets backend for fleetsheet.
//!
//! Talks to the Sheets v4 REST API with blocking HTTP calls. Each
//! [`TabularBackend`](fleetsheet_core::TabularBackend) method is one or two
//! requests; nothing is cached between calls.
//!
//! # Architecture
//!
//! ```text
//! SheetClient (fleetsheet)
//!     └── GoogleSheetsBackend (this crate)
//!           └── reqwest blocking client
//!                 └── https://sheets.googleapis.com/v4/spreadsheets/{id}
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use fleetsheet_core::{CellRange, TabularBackend};
//! use fleetsheet_gsheets::{GoogleSheetsBackend, GoogleSheetsConfig};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = GoogleSheetsBackend::new(GoogleSheetsConfig::from_env()?)?;
//! let rows = backend.read_range("오토바이DB", &CellRange::parse("A1:N10")?)?;
//! println!("{} rows", rows.len());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod backend;
pub mod config;
pub mod error;

pub use backend::GoogleSheetsBackend;
pub use config::GoogleSheetsConfig;
pub use error::{GsheetsError, Result};
