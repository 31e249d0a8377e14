//! Error types for the Google Sheets backend.

use fleetsheet_core::BackendError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GsheetsError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Sheets API returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Missing configuration: {0} is not set")]
    MissingConfig(&'static str),

    #[error("No credentials: set an access token or an API key")]
    NoCredentials,

    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

pub type Result<T> = std::result::Result<T, GsheetsError>;

impl From<GsheetsError> for BackendError {
    fn from(err: GsheetsError) -> Self {
        match err {
            GsheetsError::Http(e) if e.is_timeout() => BackendError::Timeout(e.to_string()),
            GsheetsError::Http(e) if e.is_connect() => BackendError::Connection(e.to_string()),
            GsheetsError::Http(e) if e.is_decode() => BackendError::Decode(e.to_string()),
            GsheetsError::Http(e) => BackendError::Transport(e.to_string()),
            GsheetsError::Status { status, message } => status_error(status, message),
            GsheetsError::Decode(e) => BackendError::Decode(e.to_string()),
            GsheetsError::SheetNotFound(name) => BackendError::SheetNotFound(name),
            GsheetsError::NoCredentials => BackendError::Auth(GsheetsError::NoCredentials.to_string()),
            other => BackendError::Other(other.to_string()),
        }
    }
}

/// Classify a non-success HTTP status.
pub fn status_error(status: u16, message: String) -> BackendError {
    match status {
        429 => BackendError::RateLimited(message),
        401 | 403 => BackendError::Auth(message),
        400 if message.contains("Unable to parse range") => BackendError::SheetNotFound(message),
        _ => BackendError::Api { status, message },
    }
}
