//! Blocking Sheets v4 client implementing [`TabularBackend`].

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde_json::Value;

use fleetsheet_core::{BackendResult, CellAddress, CellRange, SheetDimensions, TabularBackend};

use crate::api::{self, Spreadsheet, ValueRange};
use crate::config::GoogleSheetsConfig;
use crate::error::{GsheetsError, Result};

/// A spreadsheet reached over the Sheets REST API.
pub struct GoogleSheetsBackend {
    http: Client,
    config: GoogleSheetsConfig,
}

impl GoogleSheetsBackend {
    /// Build the HTTP client. Fails without an access token or API key.
    pub fn new(config: GoogleSheetsConfig) -> Result<Self> {
        if config.access_token.is_none() && config.api_key.is_none() {
            return Err(GsheetsError::NoCredentials);
        }
        if config.spreadsheet_id.trim().is_empty() {
            return Err(GsheetsError::MissingConfig(crate::config::ENV_SPREADSHEET_ID));
        }

        let http = Client::builder().timeout(config.timeout).build()?;
        tracing::info!("Sheets backend for spreadsheet {}", config.spreadsheet_id);
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &GoogleSheetsConfig {
        &self.config
    }

    /// Titles of every sheet in the spreadsheet, in tab order
    pub fn sheet_titles(&self) -> Result<Vec<String>> {
        Ok(self
            .spreadsheet()?
            .sheets
            .into_iter()
            .map(|s| s.properties.title)
            .collect())
    }

    fn url(&self, segments: &[&str], query: &[(&str, &str)]) -> Result<Url> {
        api::endpoint(
            &self.config.base_url,
            &self.config.spreadsheet_id,
            segments,
            query,
        )
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match (&self.config.access_token, &self.config.api_key) {
            (Some(token), _) => request.bearer_auth(token),
            (None, Some(key)) => request.query(&[("key", key)]),
            (None, None) => request,
        }
    }

    fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = self.authorize(request).send()?;
        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            return Err(api::api_error(status.as_u16(), &body));
        }
        if body.trim().is_empty() {
            return Ok(serde_json::from_str("{}")?);
        }
        Ok(serde_json::from_str(&body)?)
    }

    fn spreadsheet(&self) -> Result<Spreadsheet> {
        let url = self.url(&[], &[("fields", "sheets.properties")])?;
        tracing::debug!("GET {url}");
        self.send(self.http.get(url))
    }

    fn sheet_id(&self, sheet: &str) -> Result<i64> {
        Ok(self.spreadsheet()?.sheet(sheet)?.sheet_id)
    }

    fn get_values(&self, range: &str) -> Result<Vec<Vec<String>>> {
        let url = self.url(
            &["values", range],
            &[("majorDimension", "ROWS"), ("valueRenderOption", "FORMATTED_VALUE")],
        )?;
        tracing::debug!("GET values {range}");
        let values: ValueRange = self.send(self.http.get(url))?;
        Ok(values.into_text())
    }

    fn batch_update(&self, body: &Value) -> Result<()> {
        let target = format!("{}:batchUpdate", self.config.spreadsheet_id);
        let url = api::endpoint(&self.config.base_url, &target, &[], &[])?;
        tracing::debug!("POST batchUpdate {body}");
        let _: Value = self.send(self.http.post(url).json(body))?;
        Ok(())
    }
}

impl TabularBackend for GoogleSheetsBackend {
    fn dimensions(&self, sheet: &str) -> BackendResult<SheetDimensions> {
        let meta = self.spreadsheet()?;
        Ok(SheetDimensions::from(meta.sheet(sheet)?))
    }

    fn read_range(&self, sheet: &str, range: &CellRange) -> BackendResult<Vec<Vec<String>>> {
        Ok(self.get_values(&api::a1_range(sheet, range))?)
    }

    fn read_column(&self, sheet: &str, col: u32) -> BackendResult<Vec<String>> {
        let rows = self.get_values(&api::column_range(sheet, col)?)?;
        Ok(rows
            .into_iter()
            .map(|row| row.into_iter().next().unwrap_or_default())
            .collect())
    }

    fn write_range(
        &mut self,
        sheet: &str,
        top_left: CellAddress,
        rows: &[Vec<String>],
    ) -> BackendResult<()> {
        let range = api::a1_range(sheet, &api::block_range(top_left, rows));
        let url = self.url(&["values", &range], &[("valueInputOption", "USER_ENTERED")])?;
        tracing::debug!("PUT values {range}");
        let body = ValueRange::rows(range, rows);
        let _: Value = self.send(self.http.put(url).json(&body))?;
        Ok(())
    }

    fn add_rows(&mut self, sheet: &str, count: u32) -> BackendResult<()> {
        let sheet_id = self.sheet_id(sheet)?;
        self.batch_update(&api::append_rows_request(sheet_id, count))?;
        Ok(())
    }

    fn delete_rows(&mut self, sheet: &str, first: u32, last: u32) -> BackendResult<()> {
        let sheet_id = self.sheet_id(sheet)?;
        self.batch_update(&api::delete_rows_request(sheet_id, first, last))?;
        Ok(())
    }

    fn clear_range(&mut self, sheet: &str, range: &CellRange) -> BackendResult<()> {
        let segment = format!("{}:clear", api::a1_range(sheet, range));
        let url = self.url(&["values", &segment], &[])?;
        tracing::debug!("POST values {segment}");
        let _: Value = self.send(self.http.post(url).json(&serde_json::json!({})))?;
        Ok(())
    }
}
