//! Sheets v4 wire types and the pure request/response mapping around them.

use fleetsheet_core::{CellAddress, CellRange, SheetDimensions};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{GsheetsError, Result};

/// `values.get` response and `values.update` body
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub major_dimension: Option<String>,
    #[serde(default)]
    pub values: Vec<Vec<Value>>,
}

impl ValueRange {
    /// Row-major body for a write
    pub fn rows(range: String, rows: &[Vec<String>]) -> Self {
        Self {
            range: Some(range),
            major_dimension: Some("ROWS".to_string()),
            values: rows
                .iter()
                .map(|r| r.iter().cloned().map(Value::String).collect())
                .collect(),
        }
    }

    /// Cell text, row-major
    pub fn into_text(self) -> Vec<Vec<String>> {
        self.values
            .into_iter()
            .map(|row| row.into_iter().map(cell_text).collect())
            .collect()
    }
}

/// Text of one returned cell.
///
/// Formatted values arrive as strings; numbers and booleans only appear with
/// an unformatted render option.
pub fn cell_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        Value::Bool(true) => "TRUE".to_string(),
        Value::Bool(false) => "FALSE".to_string(),
        other => other.to_string(),
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spreadsheet {
    #[serde(default)]
    pub sheets: Vec<Sheet>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Sheet {
    pub properties: SheetProperties,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetProperties {
    #[serde(default)]
    pub sheet_id: i64,
    pub title: String,
    #[serde(default)]
    pub grid_properties: GridProperties,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridProperties {
    #[serde(default)]
    pub row_count: u32,
    #[serde(default)]
    pub column_count: u32,
}

impl Spreadsheet {
    /// Properties of the sheet titled `title`
    pub fn sheet(&self, title: &str) -> Result<&SheetProperties> {
        self.sheets
            .iter()
            .map(|s| &s.properties)
            .find(|p| p.title == title)
            .ok_or_else(|| GsheetsError::SheetNotFound(title.to_string()))
    }
}

impl From<&SheetProperties> for SheetDimensions {
    fn from(p: &SheetProperties) -> Self {
        SheetDimensions {
            rows: p.grid_properties.row_count,
            cols: p.grid_properties.column_count,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: String,
}

/// Error for a non-success response, using the API's message when the body has one
pub fn api_error(status: u16, body: &str) -> GsheetsError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.error.message)
        .ok()
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| body.trim().chars().take(200).collect());
    GsheetsError::Status { status, message }
}

/// `'sheet'!A1:B2`, with quotes in the title doubled
pub fn a1_range(sheet: &str, range: &CellRange) -> String {
    format!("{}!{}", quote_sheet(sheet), range.to_a1_string())
}

/// `'sheet'!C:C`, the whole column
pub fn column_range(sheet: &str, col: u32) -> Result<String> {
    let letters = fleetsheet_core::number_to_letters(col)
        .map_err(|e| GsheetsError::InvalidUrl(e.to_string()))?;
    Ok(format!("{}!{letters}:{letters}", quote_sheet(sheet)))
}

/// Range covered by `rows` written with their first cell at `top_left`
pub fn block_range(top_left: CellAddress, rows: &[Vec<String>]) -> CellRange {
    let height = rows.len().max(1) as u32;
    let width = rows.iter().map(Vec::len).max().unwrap_or(0).max(1) as u32;
    CellRange::new(
        top_left,
        CellAddress {
            row: top_left.row + height - 1,
            col: top_left.col + width - 1,
        },
    )
}

fn quote_sheet(sheet: &str) -> String {
    format!("'{}'", sheet.replace('\'', "''"))
}

/// `{base}/spreadsheets/{id}/{segments...}?{query}`
pub fn endpoint(base: &str, spreadsheet_id: &str, segments: &[&str], query: &[(&str, &str)]) -> Result<Url> {
    let mut url = Url::parse(base).map_err(|e| GsheetsError::InvalidUrl(format!("{base}: {e}")))?;
    {
        let mut path = url
            .path_segments_mut()
            .map_err(|_| GsheetsError::InvalidUrl(base.to_string()))?;
        path.pop_if_empty().push("spreadsheets").push(spreadsheet_id);
        for segment in segments {
            path.push(segment);
        }
    }
    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query);
    }
    Ok(url)
}

/// `batchUpdate` body growing a sheet by `count` rows
pub fn append_rows_request(sheet_id: i64, count: u32) -> Value {
    json!({
        "requests": [{
            "appendDimension": {
                "sheetId": sheet_id,
                "dimension": "ROWS",
                "length": count,
            }
        }]
    })
}

/// `batchUpdate` body deleting 1-based rows `first..=last`
pub fn delete_rows_request(sheet_id: i64, first: u32, last: u32) -> Value {
    json!({
        "requests": [{
            "deleteDimension": {
                "range": {
                    "sheetId": sheet_id,
                    "dimension": "ROWS",
                    "startIndex": first.saturating_sub(1),
                    "endIndex": last,
                }
            }
        }]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_ranges() {
        let range = CellRange::parse("A1:N40").unwrap();
        assert_eq!(a1_range("오토바이DB", &range), "'오토바이DB'!A1:N40");
        assert_eq!(a1_range("Bob's", &range), "'Bob''s'!A1:N40");
        assert_eq!(column_range("[ 로그인 내역 ]", 28).unwrap(), "'[ 로그인 내역 ]'!AB:AB");

        let top_left = CellAddress::parse("B6").unwrap();
        let rows = vec![vec!["a".to_string()], vec!["b".to_string(), "c".to_string()]];
        assert_eq!(block_range(top_left, &rows).to_a1_string(), "B6:C7");
    }

    #[test]
    fn test_endpoint_encodes_range() {
        let url = endpoint(
            "https://sheets.googleapis.com/v4",
            "1AbC",
            &["values", "'log'!A1:B2"],
            &[("valueInputOption", "USER_ENTERED")],
        )
        .unwrap();
        assert_eq!(url.host_str(), Some("sheets.googleapis.com"));
        assert!(url.path().starts_with("/v4/spreadsheets/1AbC/values/"));
        assert!(!url.path().contains(' '));
        assert_eq!(url.query(), Some("valueInputOption=USER_ENTERED"));

        let url = endpoint("http://localhost:8080/v4/", "x", &[], &[]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/v4/spreadsheets/x");
    }

    #[test]
    fn test_value_range_decoding() {
        let body = r#"{
            "range": "'오토바이DB'!A1:C3",
            "majorDimension": "ROWS",
            "values": [["장비ID", "위도"], ["D1", 37.5, true], []]
        }"#;
        let range: ValueRange = serde_json::from_str(body).unwrap();
        assert_eq!(
            range.into_text(),
            vec![
                vec!["장비ID", "위도"],
                vec!["D1", "37.5", "TRUE"],
                vec![],
            ]
        );

        let empty: ValueRange = serde_json::from_str(r#"{"range": "A1:B2"}"#).unwrap();
        assert!(empty.values.is_empty());
    }

    #[test]
    fn test_value_range_body() {
        let body = ValueRange::rows("'log'!A6:B6".into(), &[vec!["x".into(), "y".into()]]);
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"range": "'log'!A6:B6", "majorDimension": "ROWS", "values": [["x", "y"]]})
        );
    }

    #[test]
    fn test_spreadsheet_lookup() {
        let body = r#"{"sheets": [
            {"properties": {"sheetId": 0, "title": "오토바이DB",
                "gridProperties": {"rowCount": 1000, "columnCount": 14}}},
            {"properties": {"sheetId": 917, "title": "[ 로그인 내역 ]",
                "gridProperties": {"rowCount": 52, "columnCount": 4}}}
        ]}"#;
        let meta: Spreadsheet = serde_json::from_str(body).unwrap();

        let sheet = meta.sheet("[ 로그인 내역 ]").unwrap();
        assert_eq!(sheet.sheet_id, 917);
        assert_eq!(SheetDimensions::from(sheet), SheetDimensions { rows: 52, cols: 4 });
        assert!(matches!(meta.sheet("nope"), Err(GsheetsError::SheetNotFound(_))));
    }

    #[test]
    fn test_dimension_requests() {
        assert_eq!(
            append_rows_request(917, 3)["requests"][0]["appendDimension"]["length"],
            3
        );
        let delete = delete_rows_request(917, 5, 5);
        let range = &delete["requests"][0]["deleteDimension"]["range"];
        assert_eq!(range["startIndex"], 4);
        assert_eq!(range["endIndex"], 5);
        assert_eq!(range["sheetId"], 917);
    }

    #[test]
    fn test_api_error_message() {
        let body = r#"{"error": {"code": 400, "message": "Unable to parse range: 'x'!A1", "status": "INVALID_ARGUMENT"}}"#;
        match api_error(400, body) {
            GsheetsError::Status { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Unable to parse range: 'x'!A1");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(matches!(
            api_error(502, "<html>Bad Gateway</html>"),
            GsheetsError::Status { status: 502, message } if message.contains("Bad Gateway")
        ));
    }
}
