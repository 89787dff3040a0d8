use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use super::credentials::CredentialCacheStore;
use super::domain::PortalDomain;
use super::login::{LoginOrchestrator, LoginOutcome};
use super::pacing::Pacer;
use super::processor::{RowProcessor, SheetOutcome};
use crate::browser::BrowserSession;
use crate::config::{AppConfig, PacingConfig};
use crate::store::{RecordStore, StoreError};

/// Result of draining one worksheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum SheetStatus {
    Updated { rows: usize },
    MissingColumns,
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetReport {
    pub title: String,
    pub status: SheetStatus,
}

impl SheetReport {
    pub fn updated(&self) -> usize {
        match self.status {
            SheetStatus::Updated { rows } => rows,
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub linkedin_signed_in: bool,
    pub sheets: Vec<SheetReport>,
}

impl RunSummary {
    pub fn total_updated(&self) -> usize {
        self.sheets.iter().map(SheetReport::updated).sum()
    }
}

/// Owns the browser session and pacing for one tracking run over every
/// worksheet of a record store.
pub struct RunCoordinator<'a, S, P> {
    store: &'a dyn RecordStore,
    session: S,
    pacer: P,
    orchestrator: LoginOrchestrator,
    pacing: PacingConfig,
    cache_store: CredentialCacheStore,
}

impl<'a, S, P> RunCoordinator<'a, S, P>
where
    S: BrowserSession,
    P: Pacer,
{
    pub fn new(store: &'a dyn RecordStore, session: S, pacer: P, config: &AppConfig) -> Self {
        Self {
            store,
            session,
            pacer,
            orchestrator: LoginOrchestrator::new(config.credentials.clone(), config.pacing.clone()),
            pacing: config.pacing.clone(),
            cache_store: CredentialCacheStore::new(&config.cache_path),
        }
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn pacer(&self) -> &P {
        &self.pacer
    }

    /// Failing worksheets are recorded and skipped. Only a failure to list the
    /// worksheets aborts the run, and the credential cache is flushed first.
    pub fn run(&mut self) -> Result<RunSummary, StoreError> {
        let started_at = Utc::now();
        let mut cache = self.cache_store.load();
        info!(
            tenants = cache.len(),
            path = %self.cache_store.path().display(),
            "credential cache loaded"
        );

        let linkedin = self.orchestrator.login(
            &mut self.session,
            &mut self.pacer,
            PortalDomain::LinkedIn,
            None,
            &mut cache,
        );

        let titles = self.store.worksheet_titles();
        let mut sheets = Vec::new();
        if let Ok(titles) = &titles {
            let processor = RowProcessor::new(self.store, &self.orchestrator, &self.pacing);
            for title in titles {
                let outcome =
                    processor.process_sheet(title, &mut self.session, &mut self.pacer, &mut cache);
                let status = match outcome {
                    Ok(SheetOutcome::Processed { updated }) => {
                        SheetStatus::Updated { rows: updated }
                    }
                    Ok(SheetOutcome::MissingColumns) => SheetStatus::MissingColumns,
                    Err(err) => {
                        warn!(sheet = %title, error = %err, "worksheet failed; moving on");
                        SheetStatus::Failed {
                            reason: err.to_string(),
                        }
                    }
                };
                sheets.push(SheetReport {
                    title: title.clone(),
                    status,
                });
            }
        }

        match self.cache_store.save(&cache) {
            Ok(()) => info!(tenants = cache.len(), "credential cache saved"),
            Err(err) => warn!(error = %err, "failed to save credential cache"),
        }

        if let Err(err) = titles {
            warn!(error = %err, "unable to list worksheets");
            return Err(err);
        }

        let summary = RunSummary {
            started_at,
            finished_at: Utc::now(),
            linkedin_signed_in: linkedin == LoginOutcome::Success,
            sheets,
        };
        info!(total_updated = summary.total_updated(), "tracking run finished");
        Ok(summary)
    }
}
