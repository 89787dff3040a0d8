//! Read-only overview of the workbook: how many applications sit in each
//! decision and on each portal.

use std::collections::BTreeMap;

use serde::Serialize;

use super::domain::{classify_domain, PortalDomain};
use super::processor::{locate_columns, records};
use crate::store::{RecordStore, StoreError};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WorkbookSummary {
    pub applications: usize,
    pub pending: usize,
    pub by_decision: BTreeMap<String, usize>,
    pub by_domain: BTreeMap<PortalDomain, usize>,
    /// Worksheets without URL and Decision headers.
    pub skipped_sheets: Vec<String>,
}

impl WorkbookSummary {
    /// Decisions ordered by count, most frequent first.
    pub fn ranked_decisions(&self) -> Vec<(&str, usize)> {
        let mut ranked: Vec<_> = self
            .by_decision
            .iter()
            .map(|(decision, count)| (decision.as_str(), *count))
            .collect();
        ranked.sort_by(|left, right| right.1.cmp(&left.1).then(left.0.cmp(right.0)));
        ranked
    }
}

/// Rows without a URL are not applications and are left out entirely.
pub fn summarize(store: &dyn RecordStore) -> Result<WorkbookSummary, StoreError> {
    let mut summary = WorkbookSummary::default();

    for title in store.worksheet_titles()? {
        let rows = store.read_rows(&title)?;
        let Some(layout) = rows.first().and_then(|header| locate_columns(header)) else {
            if !rows.is_empty() {
                summary.skipped_sheets.push(title);
            }
            continue;
        };

        for record in records(rows, layout) {
            let url = record.url.trim();
            if url.is_empty() {
                continue;
            }
            summary.applications += 1;
            *summary.by_domain.entry(classify_domain(url)).or_default() += 1;

            let decision = record.decision.trim();
            if decision.is_empty() {
                summary.pending += 1;
            } else {
                *summary.by_decision.entry(decision.to_string()).or_default() += 1;
            }
        }
    }

    Ok(summary)
}
