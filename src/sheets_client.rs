//! Google Sheets access for the recorded-dates column.

use async_trait::async_trait;
use google_sheets4::api::ValueRange;
use google_sheets4::hyper_rustls::HttpsConnector;
use google_sheets4::{hyper_rustls, yup_oauth2, Sheets};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;

use crate::config::SheetConfig;
use crate::error::{SyncError, SyncResult};
use crate::sync::SheetStore;

/// Client for the target spreadsheet, authenticated as a service account.
pub struct SheetsClient {
    hub: Sheets<HttpsConnector<HttpConnector>>,
    spreadsheet_id: String,
    range: String,
}

impl SheetsClient {
    /// Build the Sheets hub from the configured service-account key.
    ///
    /// All failures here are configuration errors: nothing has touched the
    /// network yet.
    pub async fn new(config: &SheetConfig) -> SyncResult<Self> {
        let key = yup_oauth2::parse_service_account_key(config.service_account_json.as_bytes())
            .map_err(|e| {
                SyncError::Config(format!(
                    "GCP_CREDENTIALS is not a valid service account key: {}",
                    e
                ))
            })?;

        let auth = yup_oauth2::ServiceAccountAuthenticator::builder(key)
            .build()
            .await
            .map_err(|e| {
                SyncError::Config(format!("Failed to build service account authenticator: {}", e))
            })?;

        let connector = hyper_rustls::HttpsConnectorBuilder::new()
            .with_native_roots()
            .map_err(|e| SyncError::Config(format!("Failed to load native TLS roots: {}", e)))?
            .https_or_http()
            .enable_http1()
            .build();

        let client = Client::builder(TokioExecutor::new()).build(connector);
        let hub = Sheets::new(client, auth);

        Ok(Self {
            hub,
            spreadsheet_id: config.spreadsheet_id.clone(),
            range: config.range.clone(),
        })
    }
}

#[async_trait]
impl SheetStore for SheetsClient {
    async fn read_dates(&self) -> SyncResult<Vec<String>> {
        let (_, value_range) = self
            .hub
            .spreadsheets()
            .values_get(&self.spreadsheet_id, &self.range)
            .doit()
            .await
            .map_err(SyncError::SheetRead)?;

        Ok(value_range
            .values
            .unwrap_or_default()
            .into_iter()
            .flatten()
            .filter_map(|cell| cell.as_str().map(|s| s.trim().to_string()))
            .collect())
    }

    async fn append_dates(&self, dates: &[String]) -> SyncResult<()> {
        let rows = dates
            .iter()
            .map(|date| vec![serde_json::Value::String(date.clone())])
            .collect();

        let request = ValueRange {
            values: Some(rows),
            ..Default::default()
        };

        self.hub
            .spreadsheets()
            .values_append(request, &self.spreadsheet_id, &self.range)
            .value_input_option("USER_ENTERED")
            .insert_data_option("INSERT_ROWS")
            .doit()
            .await
            .map_err(SyncError::SheetWrite)?;

        Ok(())
    }
}
