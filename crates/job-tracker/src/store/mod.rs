//! Tabular record store holding the tracked applications. Each worksheet has a
//! header row followed by one row per application; addressing is 1-based.

mod csv_workbook;
mod google_sheets;

pub use csv_workbook::CsvWorkbook;
pub use google_sheets::{GoogleSheetsClient, SheetsConnector};

use crate::config::StoreConfig;

/// Storage abstraction so the tracking workflow can be exercised in isolation.
pub trait RecordStore {
    /// Worksheet titles in store order.
    fn worksheet_titles(&self) -> Result<Vec<String>, StoreError>;

    /// Every row of a worksheet, header included, as raw cell text.
    fn read_rows(&self, title: &str) -> Result<Vec<Vec<String>>, StoreError>;

    /// Overwrite a single cell. `row` and `column` are 1-based.
    fn write_cell(
        &self,
        title: &str,
        row: usize,
        column: usize,
        value: &str,
    ) -> Result<(), StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("worksheet '{0}' not found")]
    WorksheetNotFound(String),
    #[error("cell address row {row}, column {column} is invalid")]
    InvalidAddress { row: usize, column: usize },
    #[error("record store io failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid worksheet data: {0}")]
    Csv(#[from] csv::Error),
    #[error("record store credentials unusable: {0}")]
    Credentials(String),
    #[error("record store request failed: {0}")]
    Backend(String),
    #[error("record store runtime unavailable: {0}")]
    Runtime(String),
}

/// Open the configured store. Connection problems are fatal for the run.
pub fn open(config: &StoreConfig) -> Result<Box<dyn RecordStore>, StoreError> {
    match config {
        StoreConfig::GoogleSheets {
            sheet_id,
            credentials_path,
        } => {
            let client = GoogleSheetsClient::from_service_account(sheet_id, credentials_path)?;
            Ok(Box::new(client))
        }
        StoreConfig::CsvWorkbook { directory } => Ok(Box::new(CsvWorkbook::open(directory)?)),
    }
}
