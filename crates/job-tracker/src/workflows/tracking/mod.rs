//! Application status tracking: portal detection, logins, page
//! classification and the worksheet drain that ties them together.

pub mod coordinator;
pub mod credentials;
pub mod domain;
pub mod login;
pub mod pacing;
pub mod processor;
pub mod status;
pub mod summary;

#[cfg(test)]
mod tests;

pub use coordinator::{RunCoordinator, RunSummary, SheetReport, SheetStatus};
pub use credentials::{
    attempt_order, CacheError, CredentialCache, CredentialCacheStore, CredentialSlot,
};
pub use domain::{classify_domain, extract_tenant, PortalDomain};
pub use login::{LoginOrchestrator, LoginOutcome, WorkdayLoginState};
pub use pacing::{DelayWindow, Pacer, ThreadPacer};
pub use processor::{
    locate_columns, ColumnLayout, JobApplicationRecord, RowProcessor, SheetOutcome,
};
pub use status::{classify_status, StatusCategory, StatusLabel};
pub use summary::{summarize, WorkbookSummary};
