//! Prelude module - common imports for fleetsheet users
//!
//! ```rust
//! use fleetsheet::prelude::*;
//! ```

pub use crate::{
    // Login and session
    AuthConfig,
    Authenticator,
    CellAddress,
    CellRange,
    CellValue,
    ColumnRecord,
    DeviceRecord,
    DuplicateKeyPolicy,

    // Error types
    Error,
    LoginOutcome,
    MapMarker,
    MemoryBackend,
    Menu,
    Result,
    RetryPolicy,
    RowRecord,
    SessionContext,

    // Main types
    SheetClient,
    SheetGrid,
    TabularBackend,
    TelemetryConfig,
};

#[cfg(feature = "csv")]
pub use crate::CsvBackend;
#[cfg(feature = "gsheets")]
pub use crate::{GoogleSheetsBackend, GoogleSheetsConfig};
