use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use crate::browser::{BrowserSession, NavigationError};
use crate::config::{
    AppConfig, BrowserConfig, LinkedInCredentials, PacingConfig, PortalCredentials, StoreConfig,
    TelemetryConfig, WorkdayCredentials,
};
use crate::store::{RecordStore, StoreError};
use crate::workflows::tracking::pacing::{DelayWindow, Pacer};

pub(super) const WORKDAY_PASSWORDS: [&str; 2] = ["first-secret", "second-secret"];
pub(super) const LINKEDIN_FEED: &str = "https://www.linkedin.com/feed/";

pub(super) fn credentials() -> PortalCredentials {
    PortalCredentials {
        linkedin: Some(LinkedInCredentials {
            email: "candidate@example.com".to_string(),
            password: "linkedin-secret".to_string(),
        }),
        workday: Some(WorkdayCredentials {
            email: "candidate@example.com".to_string(),
            passwords: WORKDAY_PASSWORDS.map(str::to_string),
        }),
    }
}

/// Short waits so recorded pauses are easy to tell apart from row delays.
pub(super) fn pacing() -> PacingConfig {
    PacingConfig {
        row_delay: DelayWindow::new(Duration::from_secs(3), Duration::from_secs(6))
            .expect("valid window"),
        page_settle: Duration::from_millis(500),
        login_page_settle: Duration::from_millis(300),
        linkedin_submit_settle: Duration::from_millis(400),
        workday_submit_settle: Duration::from_millis(500),
    }
}

pub(super) fn app_config(cache_path: PathBuf) -> AppConfig {
    AppConfig {
        store: StoreConfig::CsvWorkbook {
            directory: PathBuf::from("unused"),
        },
        browser: BrowserConfig {
            headless: true,
            navigation_timeout: Duration::from_secs(45),
        },
        credentials: credentials(),
        cache_path,
        pacing: pacing(),
        telemetry: TelemetryConfig {
            log_level: "debug".to_string(),
        },
    }
}

pub(super) fn rows(cells: &[&[&str]]) -> Vec<Vec<String>> {
    cells
        .iter()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .collect()
}

/// Browser fake driven by per-URL page text. LinkedIn submits land on the
/// feed (or `linkedin_landing`); Workday submits leave the login page only
/// when the typed password is accepted.
#[derive(Default)]
pub(super) struct ScriptedSession {
    pub(super) visits: Vec<String>,
    pub(super) typed: Vec<(String, String)>,
    pub(super) pages: HashMap<String, String>,
    pub(super) navigation_failures: HashMap<String, NavigationError>,
    pub(super) accepted_passwords: BTreeSet<String>,
    linkedin_landing: Option<String>,
    current: String,
    pending_password: Option<String>,
}

impl ScriptedSession {
    pub(super) fn with_page(mut self, url: &str, text: &str) -> Self {
        self.pages.insert(url.to_string(), text.to_string());
        self
    }

    pub(super) fn failing(mut self, url: &str, error: NavigationError) -> Self {
        self.navigation_failures.insert(url.to_string(), error);
        self
    }

    pub(super) fn landing_on(mut self, url: &str) -> Self {
        self.linkedin_landing = Some(url.to_string());
        self
    }

    pub(super) fn accepting(mut self, password: &str) -> Self {
        self.accepted_passwords.insert(password.to_string());
        self
    }

    /// Passwords typed into password fields, in order.
    pub(super) fn password_attempts(&self) -> Vec<&str> {
        self.typed
            .iter()
            .filter(|(selector, _)| selector.contains("password"))
            .map(|(_, value)| value.as_str())
            .collect()
    }
}

impl BrowserSession for ScriptedSession {
    fn goto(&mut self, url: &str) -> Result<(), NavigationError> {
        self.visits.push(url.to_string());
        if let Some(error) = self.navigation_failures.get(url) {
            return Err(error.clone());
        }
        self.current = url.to_string();
        self.pending_password = None;
        Ok(())
    }

    fn fill(&mut self, selector: &str, value: &str) -> Result<(), NavigationError> {
        self.typed.push((selector.to_string(), value.to_string()));
        if selector.contains("password") {
            self.pending_password = Some(value.to_string());
        }
        Ok(())
    }

    fn click(&mut self, _selector: &str) -> Result<(), NavigationError> {
        if self.current.contains("linkedin.com/login") {
            self.current = self
                .linkedin_landing
                .clone()
                .unwrap_or_else(|| LINKEDIN_FEED.to_string());
        }
        Ok(())
    }

    fn press_key(&mut self, key: &str) -> Result<(), NavigationError> {
        let accepted = self
            .pending_password
            .as_ref()
            .is_some_and(|password| self.accepted_passwords.contains(password));
        if key == "Enter" && self.current.ends_with("/login.htm") && accepted {
            self.current = self.current.replace("/login.htm", "/home.htm");
        }
        Ok(())
    }

    fn wait_for_settle(&mut self) -> Result<(), NavigationError> {
        Ok(())
    }

    fn current_url(&self) -> String {
        self.current.clone()
    }

    fn content(&mut self) -> Result<String, NavigationError> {
        Ok(self.pages.get(&self.current).cloned().unwrap_or_default())
    }
}

#[derive(Debug, Default)]
pub(super) struct RecordingPacer {
    pub(super) pauses: Vec<Duration>,
}

impl Pacer for RecordingPacer {
    fn pause(&mut self, duration: Duration) {
        self.pauses.push(duration);
    }
}

pub(super) type CellWrite = (String, usize, usize, String);

/// Worksheets kept in memory in insertion order.
#[derive(Default)]
pub(super) struct MemoryStore {
    sheets: Mutex<Vec<(String, Vec<Vec<String>>)>>,
    writes: Mutex<Vec<CellWrite>>,
    pub(super) unreadable: BTreeSet<String>,
    pub(super) rejected_rows: BTreeSet<usize>,
    pub(super) listing_fails: bool,
}

impl MemoryStore {
    pub(super) fn with_sheet(self, title: &str, cells: &[&[&str]]) -> Self {
        self.sheets
            .lock()
            .expect("store mutex poisoned")
            .push((title.to_string(), rows(cells)));
        self
    }

    pub(super) fn writes(&self) -> Vec<CellWrite> {
        self.writes.lock().expect("store mutex poisoned").clone()
    }

    pub(super) fn sheet(&self, title: &str) -> Vec<Vec<String>> {
        self.read_rows(title).expect("sheet exists")
    }
}

impl RecordStore for MemoryStore {
    fn worksheet_titles(&self) -> Result<Vec<String>, StoreError> {
        if self.listing_fails {
            return Err(StoreError::Backend("quota exceeded".to_string()));
        }
        let sheets = self.sheets.lock().expect("store mutex poisoned");
        Ok(sheets.iter().map(|(title, _)| title.clone()).collect())
    }

    fn read_rows(&self, title: &str) -> Result<Vec<Vec<String>>, StoreError> {
        if self.unreadable.contains(title) {
            return Err(StoreError::Backend(format!("cannot read {title}")));
        }
        let sheets = self.sheets.lock().expect("store mutex poisoned");
        sheets
            .iter()
            .find(|(name, _)| name == title)
            .map(|(_, rows)| rows.clone())
            .ok_or_else(|| StoreError::WorksheetNotFound(title.to_string()))
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
        if self.rejected_rows.contains(&row) {
            return Err(StoreError::Backend(format!("row {row} is protected")));
        }

        let mut sheets = self.sheets.lock().expect("store mutex poisoned");
        let (_, rows) = sheets
            .iter_mut()
            .find(|(name, _)| name == title)
            .ok_or_else(|| StoreError::WorksheetNotFound(title.to_string()))?;
        if rows.len() < row {
            rows.resize(row, Vec::new());
        }
        let cells = &mut rows[row - 1];
        if cells.len() < column {
            cells.resize(column, String::new());
        }
        cells[column - 1] = value.to_string();

        self.writes.lock().expect("store mutex poisoned").push((
            title.to_string(),
            row,
            column,
            value.to_string(),
        ));
        Ok(())
    }
}
