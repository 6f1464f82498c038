use anyhow::{anyhow, Result};
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client, Method,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, error};

use shared_config::AppConfig;

/// Thin client for a Sheets-v4-style spreadsheet REST API. The base URL is
/// taken from configuration so tests can point it at a mock server.
pub struct SheetsClient {
    client: Client,
    base_url: String,
    api_token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SheetProperties {
    #[serde(rename = "sheetId")]
    pub sheet_id: i64,
    pub title: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatedSpreadsheet {
    #[serde(rename = "spreadsheetId")]
    pub spreadsheet_id: String,
    #[serde(rename = "spreadsheetUrl")]
    pub spreadsheet_url: String,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

impl SheetsClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.sheets_api_base_url.clone(),
            api_token: config.sheets_api_token.clone(),
        }
    }

    fn get_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", self.api_token)) {
            headers.insert(AUTHORIZATION, value);
        }
        headers
    }

    async fn request(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making request to {}", url);

        let mut req = self.client.request(method, &url).headers(self.get_headers());
        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            error!("Sheets API error ({}): {}", status, error_text);

            return Err(match status.as_u16() {
                401 | 403 => anyhow!("Authentication error: {}", error_text),
                404 => anyhow!("Resource not found: {}", error_text),
                _ => anyhow!("Sheets API error ({}): {}", status, error_text),
            });
        }

        let data = response.json::<Value>().await?;
        Ok(data)
    }

    /// Read all values of a range (typically a whole tab) as rows of strings.
    pub async fn get_values(&self, spreadsheet_id: &str, range: &str) -> Result<Vec<Vec<String>>> {
        let path = format!("/v4/spreadsheets/{}/values/{}", spreadsheet_id, range);
        let data = self.request(Method::GET, &path, None).await?;
        let value_range: ValueRange = serde_json::from_value(data)?;
        Ok(value_range.values)
    }

    /// Append a single row to the first empty row of a tab.
    pub async fn append_row(&self, spreadsheet_id: &str, tab: &str, row: &[String]) -> Result<()> {
        let path = format!(
            "/v4/spreadsheets/{}/values/{}:append?valueInputOption=USER_ENTERED",
            spreadsheet_id, tab
        );
        let body = json!({ "values": [row] });
        self.request(Method::POST, &path, Some(body)).await?;
        Ok(())
    }

    /// Clear all values in a range, leaving the tab itself in place.
    pub async fn clear_values(&self, spreadsheet_id: &str, range: &str) -> Result<()> {
        let path = format!(
            "/v4/spreadsheets/{}/values/{}:clear",
            spreadsheet_id, range
        );
        self.request(Method::POST, &path, Some(json!({}))).await?;
        Ok(())
    }

    /// Overwrite a single cell addressed in A1 notation (e.g. `Stats!A2`).
    pub async fn update_cell(&self, spreadsheet_id: &str, range: &str, value: &str) -> Result<()> {
        let path = format!(
            "/v4/spreadsheets/{}/values/{}?valueInputOption=RAW",
            spreadsheet_id, range
        );
        let body = json!({ "values": [[value]] });
        self.request(Method::PUT, &path, Some(body)).await?;
        Ok(())
    }

    /// List the tabs of a spreadsheet.
    pub async fn list_sheets(&self, spreadsheet_id: &str) -> Result<Vec<SheetProperties>> {
        let path = format!("/v4/spreadsheets/{}?fields=sheets.properties", spreadsheet_id);
        let data = self.request(Method::GET, &path, None).await?;
        let meta: SpreadsheetMeta = serde_json::from_value(data)?;
        Ok(meta.sheets.into_iter().map(|s| s.properties).collect())
    }

    /// Add a new tab with the given grid size.
    pub async fn add_sheet(
        &self,
        spreadsheet_id: &str,
        title: &str,
        rows: u32,
        cols: u32,
    ) -> Result<()> {
        let path = format!("/v4/spreadsheets/{}:batchUpdate", spreadsheet_id);
        let body = json!({
            "requests": [{
                "addSheet": {
                    "properties": {
                        "title": title,
                        "gridProperties": { "rowCount": rows, "columnCount": cols }
                    }
                }
            }]
        });
        self.request(Method::POST, &path, Some(body)).await?;
        Ok(())
    }

    /// Delete a tab by its numeric sheet id.
    pub async fn delete_sheet(&self, spreadsheet_id: &str, sheet_id: i64) -> Result<()> {
        let path = format!("/v4/spreadsheets/{}:batchUpdate", spreadsheet_id);
        let body = json!({
            "requests": [{ "deleteSheet": { "sheetId": sheet_id } }]
        });
        self.request(Method::POST, &path, Some(body)).await?;
        Ok(())
    }

    /// Create a new spreadsheet and return its id and URL.
    pub async fn create_spreadsheet(&self, title: &str) -> Result<CreatedSpreadsheet> {
        let body = json!({ "properties": { "title": title } });
        let data = self.request(Method::POST, "/v4/spreadsheets", Some(body)).await?;
        let created: CreatedSpreadsheet = serde_json::from_value(data)?;
        Ok(created)
    }
}

/// Extract the spreadsheet id from a `.../spreadsheets/d/{id}[/...]` URL.
pub fn spreadsheet_id_from_url(url: &str) -> Option<String> {
    let (_, rest) = url.split_once("/d/")?;
    let id = rest.split(['/', '?', '#']).next().unwrap_or_default();
    if id.is_empty() {
        None
    } else {
        Some(id.to_string())
    }
}
