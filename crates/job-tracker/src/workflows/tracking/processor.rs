//! Drains one worksheet: every pending row is classified once and its label
//! written back into the Decision column.

use tracing::{debug, info, warn};

use super::credentials::CredentialCache;
use super::domain::{classify_domain, extract_tenant, PortalDomain};
use super::login::LoginOrchestrator;
use super::pacing::Pacer;
use super::status::{classify_status, StatusLabel};
use crate::browser::{BrowserSession, NavigationError};
use crate::config::PacingConfig;
use crate::store::{RecordStore, StoreError};

pub const URL_HEADER: &str = "url";
pub const DECISION_HEADER: &str = "decision";

/// Zero-based positions of the columns the tracker reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    pub url: usize,
    pub decision: usize,
}

impl ColumnLayout {
    /// 1-based column number of the Decision cell, as the store addresses it.
    pub fn decision_column(&self) -> usize {
        self.decision + 1
    }
}

/// Header matching is trimmed and case-insensitive. When a name repeats, the
/// right-most column wins.
pub fn locate_columns(header: &[String]) -> Option<ColumnLayout> {
    let position = |name: &str| {
        header
            .iter()
            .rposition(|cell| cell.trim().eq_ignore_ascii_case(name))
    };

    Some(ColumnLayout {
        url: position(URL_HEADER)?,
        decision: position(DECISION_HEADER)?,
    })
}

/// One tracked application. Cells other than URL and Decision are carried
/// through untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobApplicationRecord {
    pub row_number: usize,
    pub url: String,
    pub decision: String,
    pub cells: Vec<String>,
}

impl JobApplicationRecord {
    pub fn from_cells(row_number: usize, cells: Vec<String>, layout: ColumnLayout) -> Self {
        let cell = |index: usize| cells.get(index).cloned().unwrap_or_default();
        Self {
            row_number,
            url: cell(layout.url),
            decision: cell(layout.decision),
            cells,
        }
    }

    /// A row needs work when it has a URL and no decision yet.
    pub fn is_pending(&self) -> bool {
        !self.url.trim().is_empty() && self.decision.trim().is_empty()
    }
}

/// Data rows of a worksheet (header excluded) with their 1-based row numbers.
pub fn records(
    rows: Vec<Vec<String>>,
    layout: ColumnLayout,
) -> impl Iterator<Item = JobApplicationRecord> {
    rows.into_iter()
        .enumerate()
        .skip(1)
        .map(move |(index, cells)| JobApplicationRecord::from_cells(index + 1, cells, layout))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetOutcome {
    Processed { updated: usize },
    MissingColumns,
}

impl SheetOutcome {
    pub fn updated(&self) -> usize {
        match self {
            Self::Processed { updated } => *updated,
            Self::MissingColumns => 0,
        }
    }
}

/// Navigate, let the page settle, and read its source.
pub fn fetch_page(
    session: &mut dyn BrowserSession,
    pacer: &mut dyn Pacer,
    url: &str,
    settle: std::time::Duration,
) -> Result<String, NavigationError> {
    session.goto(url)?;
    pacer.pause(settle);
    session.content()
}

pub struct RowProcessor<'a> {
    store: &'a dyn RecordStore,
    orchestrator: &'a LoginOrchestrator,
    pacing: &'a PacingConfig,
}

impl<'a> RowProcessor<'a> {
    pub fn new(
        store: &'a dyn RecordStore,
        orchestrator: &'a LoginOrchestrator,
        pacing: &'a PacingConfig,
    ) -> Self {
        Self {
            store,
            orchestrator,
            pacing,
        }
    }

    /// Reading the worksheet is the only failure surfaced to the caller; row
    /// level problems are logged and the sheet carries on.
    pub fn process_sheet(
        &self,
        title: &str,
        session: &mut dyn BrowserSession,
        pacer: &mut dyn Pacer,
        cache: &mut CredentialCache,
    ) -> Result<SheetOutcome, StoreError> {
        let rows = self.store.read_rows(title)?;
        let Some(header) = rows.first() else {
            info!(sheet = title, "worksheet is empty");
            return Ok(SheetOutcome::Processed { updated: 0 });
        };
        let Some(layout) = locate_columns(header) else {
            warn!(sheet = title, "worksheet lacks URL or Decision column; skipping");
            return Ok(SheetOutcome::MissingColumns);
        };

        info!(sheet = title, rows = rows.len().saturating_sub(1), "processing worksheet");
        let mut updated = 0;
        for record in records(rows, layout) {
            if !record.is_pending() {
                continue;
            }
            if self.process_row(title, &record, layout, session, pacer, cache) {
                updated += 1;
            }
            pacer.pause(self.pacing.row_delay.sample(&mut rand::thread_rng()));
        }

        info!(sheet = title, updated, "worksheet done");
        Ok(SheetOutcome::Processed { updated })
    }

    /// Returns whether a label was written.
    fn process_row(
        &self,
        title: &str,
        record: &JobApplicationRecord,
        layout: ColumnLayout,
        session: &mut dyn BrowserSession,
        pacer: &mut dyn Pacer,
        cache: &mut CredentialCache,
    ) -> bool {
        let url = record.url.trim();
        let domain = classify_domain(url);
        info!(sheet = title, row = record.row_number, %domain, url, "checking application");

        // LinkedIn was signed into once for the whole run.
        if domain != PortalDomain::LinkedIn {
            let tenant = match domain {
                PortalDomain::Workday => extract_tenant(url),
                _ => None,
            };
            let outcome =
                self.orchestrator
                    .login(session, pacer, domain, tenant.as_deref(), cache);
            debug!(row = record.row_number, %domain, tenant = ?tenant, ?outcome, "portal login");
        }

        let label = match fetch_page(session, pacer, url, self.pacing.page_settle) {
            Ok(content) => classify_status(&content, domain),
            Err(err) => {
                warn!(row = record.row_number, url, error = %err, "page fetch failed");
                StatusLabel::from_failure(&err)
            }
        };

        let status = label.to_string();
        match self
            .store
            .write_cell(title, record.row_number, layout.decision_column(), &status)
        {
            Ok(()) => {
                info!(sheet = title, row = record.row_number, %status, "decision recorded");
                true
            }
            Err(err) => {
                warn!(
                    sheet = title,
                    row = record.row_number,
                    error = %err,
                    "failed to write decision"
                );
                false
            }
        }
    }
}
