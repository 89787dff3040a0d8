use std::path::Path;

use google_sheets4::api::{Scope, ValueRange};
use google_sheets4::{hyper_rustls, hyper_util, yup_oauth2, Sheets};
use serde_json::Value;
use tokio::runtime::Runtime;

use super::{RecordStore, StoreError};

/// HTTPS connector used when the client is built from a service-account key.
pub type SheetsConnector =
    hyper_rustls::HttpsConnector<hyper_util::client::legacy::connect::HttpConnector>;

/// Thin wrapper around the generated google-sheets4 client so the synchronous
/// tracking run can talk to Sheets without exposing async details.
pub struct GoogleSheetsClient<C>
where
    C: google_sheets4::common::Connector + Send + Sync + 'static,
{
    hub: Sheets<C>,
    runtime: Runtime,
    sheet_id: String,
}

impl<C> GoogleSheetsClient<C>
where
    C: google_sheets4::common::Connector + Send + Sync + 'static,
{
    pub fn new(hub: Sheets<C>, runtime: Runtime, sheet_id: impl Into<String>) -> Self {
        Self {
            hub,
            runtime,
            sheet_id: sheet_id.into(),
        }
    }

    fn map_error<E: std::fmt::Display>(err: E) -> StoreError {
        StoreError::Backend(err.to_string())
    }
}

impl GoogleSheetsClient<SheetsConnector> {
    /// Authenticate with a service-account key file and open the spreadsheet.
    pub fn from_service_account(
        sheet_id: &str,
        credentials_path: &Path,
    ) -> Result<Self, StoreError> {
        let runtime = Runtime::new().map_err(|err| StoreError::Runtime(err.to_string()))?;

        let hub = runtime.block_on(async {
            let key = yup_oauth2::read_service_account_key(credentials_path)
                .await
                .map_err(|err| {
                    StoreError::Credentials(format!("{}: {err}", credentials_path.display()))
                })?;
            let auth = yup_oauth2::ServiceAccountAuthenticator::builder(key)
                .build()
                .await
                .map_err(|err| StoreError::Credentials(err.to_string()))?;

            let connector = hyper_rustls::HttpsConnectorBuilder::new()
                .with_native_roots()
                .map_err(|err| StoreError::Runtime(format!("tls roots unavailable: {err}")))?
                .https_or_http()
                .enable_http1()
                .build();
            let client = hyper_util::client::legacy::Client::builder(
                hyper_util::rt::TokioExecutor::new(),
            )
            .build(connector);

            Ok::<_, StoreError>(Sheets::new(client, auth))
        })?;

        Ok(Self::new(hub, runtime, sheet_id))
    }
}

impl<C> std::fmt::Debug for GoogleSheetsClient<C>
where
    C: google_sheets4::common::Connector + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleSheetsClient")
            .field("sheet_id", &self.sheet_id)
            .finish_non_exhaustive()
    }
}

impl<C> RecordStore for GoogleSheetsClient<C>
where
    C: google_sheets4::common::Connector + Send + Sync + 'static,
{
    fn worksheet_titles(&self) -> Result<Vec<String>, StoreError> {
        let result = self.runtime.block_on(async {
            self.hub
                .spreadsheets()
                .get(&self.sheet_id)
                .param("fields", "sheets.properties.title")
                .add_scope(Scope::Spreadsheet)
                .doit()
                .await
        });

        let (_, spreadsheet) = result.map_err(Self::map_error)?;
        Ok(spreadsheet
            .sheets
            .unwrap_or_default()
            .into_iter()
            .filter_map(|sheet| sheet.properties.and_then(|properties| properties.title))
            .collect())
    }

    fn read_rows(&self, title: &str) -> Result<Vec<Vec<String>>, StoreError> {
        let range = quote_title(title);
        let result = self.runtime.block_on(async {
            self.hub
                .spreadsheets()
                .values_get(&self.sheet_id, &range)
                .add_scope(Scope::Spreadsheet)
                .doit()
                .await
        });

        let (_, values) = result.map_err(Self::map_error)?;
        Ok(values
            .values
            .unwrap_or_default()
            .into_iter()
            .map(|row| row.into_iter().map(cell_text).collect())
            .collect())
    }

    fn write_cell(
        &self,
        title: &str,
        row: usize,
        column: usize,
        value: &str,
    ) -> Result<(), StoreError> {
        if row == 0 || column == 0 {
            return Err(StoreError::InvalidAddress { row, column });
        }

        let range = format!("{}!{}{}", quote_title(title), column_letters(column), row);
        let request = ValueRange {
            range: Some(range.clone()),
            values: Some(vec![vec![Value::String(value.to_string())]]),
            ..ValueRange::default()
        };

        let result = self.runtime.block_on(async {
            self.hub
                .spreadsheets()
                .values_update(request, &self.sheet_id, &range)
                .value_input_option("RAW")
                .add_scope(Scope::Spreadsheet)
                .doit()
                .await
        });

        result.map_err(Self::map_error)?;
        Ok(())
    }
}

/// A1 notation sheet reference; single quotes inside titles are doubled.
fn quote_title(title: &str) -> String {
    format!("'{}'", title.replace('\'', "''"))
}

/// 1-based column index to A1 letters (1 → A, 27 → AA).
fn column_letters(mut column: usize) -> String {
    let mut letters = Vec::new();
    while column > 0 {
        let remainder = (column - 1) % 26;
        letters.push(char::from(b'A' + remainder as u8));
        column = (column - 1) / 26;
    }
    letters.iter().rev().collect()
}

fn cell_text(value: Value) -> String {
    match value {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
