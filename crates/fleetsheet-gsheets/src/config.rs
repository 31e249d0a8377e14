//! Backend configuration

use std::time::Duration;

use crate::error::{GsheetsError, Result};

pub const ENV_SPREADSHEET_ID: &str = "FLEETSHEET_SPREADSHEET_ID";
pub const ENV_ACCESS_TOKEN: &str = "FLEETSHEET_ACCESS_TOKEN";
pub const ENV_API_KEY: &str = "FLEETSHEET_API_KEY";
pub const ENV_API_BASE: &str = "FLEETSHEET_API_BASE";

pub const DEFAULT_BASE_URL: &str = "https://sheets.googleapis.com/v4";

/// Configuration for the Google Sheets backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoogleSheetsConfig {
    /// Spreadsheet id from the document URL
    pub spreadsheet_id: String,
    /// OAuth2 bearer token. Required for writes.
    pub access_token: Option<String>,
    /// API key, enough for reading public sheets
    pub api_key: Option<String>,
    /// API root. Default: `https://sheets.googleapis.com/v4`.
    pub base_url: String,
    /// Per-request timeout. Default: 30 seconds.
    pub timeout: Duration,
}

impl Default for GoogleSheetsConfig {
    fn default() -> Self {
        Self {
            spreadsheet_id: String::new(),
            access_token: None,
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl GoogleSheetsConfig {
    pub fn new(spreadsheet_id: impl Into<String>) -> Self {
        Self {
            spreadsheet_id: spreadsheet_id.into(),
            ..Self::default()
        }
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Build from `FLEETSHEET_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable lookup; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let spreadsheet_id =
            get(ENV_SPREADSHEET_ID).ok_or(GsheetsError::MissingConfig(ENV_SPREADSHEET_ID))?;
        let mut config = Self::new(spreadsheet_id);
        config.access_token = get(ENV_ACCESS_TOKEN);
        config.api_key = get(ENV_API_KEY);
        if let Some(base) = get(ENV_API_BASE) {
            config.base_url = base;
        }
        Ok(config)
    }
}
