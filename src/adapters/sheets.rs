use crate::domain::ports::SheetSource;
use crate::utils::error::{EtlError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

pub const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";
pub const DEFAULT_SHEETS_ENDPOINT: &str = "https://sheets.googleapis.com";

#[derive(Debug, Deserialize)]
struct ValueRange {
    // absent when the range holds no data
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Google Sheets v4 `spreadsheets.values.get` over plain HTTPS.
pub struct GoogleSheetsClient {
    client: Client,
    endpoint: Url,
    access_token: String,
}

impl GoogleSheetsClient {
    pub fn new(endpoint: &str, access_token: impl Into<String>) -> Result<Self> {
        let endpoint = Url::parse(endpoint).map_err(|e| EtlError::InvalidConfigValueError {
            field: "sheets_endpoint".to_string(),
            value: endpoint.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client: Client::new(),
            endpoint,
            access_token: access_token.into(),
        })
    }

    /// Exchanges the service-account key at `key_path` for an access token.
    pub async fn from_service_account_file(endpoint: &str, key_path: &str) -> Result<Self> {
        let token = service_account_token(key_path).await?;
        Self::new(endpoint, token)
    }

    fn values_url(&self, spreadsheet_id: &str, range: &str) -> Result<Url> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| EtlError::ConfigError {
                message: format!("Sheets endpoint cannot be a base URL: {}", self.endpoint),
            })?
            .pop_if_empty()
            .extend(["v4", "spreadsheets", spreadsheet_id, "values", range]);
        Ok(url)
    }
}

#[async_trait]
impl SheetSource for GoogleSheetsClient {
    async fn fetch_range(&self, spreadsheet_id: &str, range: &str) -> Result<Vec<Vec<String>>> {
        let url = self.values_url(spreadsheet_id, range)?;
        tracing::debug!("Fetching sheet range from: {}", url);

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.access_token)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Sheets API response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|b| b.error.message)
                .unwrap_or(body);
            return Err(EtlError::SheetsApiError {
                status: status.as_u16(),
                message,
            });
        }

        let range: ValueRange = response.json().await?;
        Ok(range
            .values
            .into_iter()
            .map(|row| row.into_iter().map(display_value).collect())
            .collect())
    }
}

fn display_value(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

async fn service_account_token(key_path: &str) -> Result<String> {
    let key = yup_oauth2::read_service_account_key(key_path).await?;
    let auth = yup_oauth2::ServiceAccountAuthenticator::builder(key)
        .build()
        .await?;

    let token = auth
        .token(&[SHEETS_SCOPE])
        .await
        .map_err(|e| EtlError::AuthError {
            message: e.to_string(),
        })?;

    token
        .token()
        .map(str::to_string)
        .ok_or_else(|| EtlError::AuthError {
            message: "token response carried no access token".to_string(),
        })
}
