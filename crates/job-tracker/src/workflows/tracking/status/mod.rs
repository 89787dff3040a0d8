mod patterns;

use super::domain::PortalDomain;
use crate::browser::NavigationError;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusCategory {
    ApplicationRejected,
    ApplicationUnderReview,
    ApplicationViewed,
    ApplicationSubmitted,
    ApplicationInProcess,
    JobClosed,
    Unknown,
}

impl StatusCategory {
    pub const fn label(self) -> &'static str {
        match self {
            Self::ApplicationRejected => "APPLICATION REJECTED",
            Self::ApplicationUnderReview => "APPLICATION UNDER REVIEW",
            Self::ApplicationViewed => "APPLICATION VIEWED",
            Self::ApplicationSubmitted => "APPLICATION SUBMITTED",
            Self::ApplicationInProcess => "APPLICATION IN PROCESS",
            Self::JobClosed => "JOB CLOSED",
            Self::Unknown => "UNKNOWN",
        }
    }
}

/// Value written into a row's Decision cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusLabel {
    Classified {
        category: StatusCategory,
        domain: PortalDomain,
    },
    /// The page could not be fetched; `kind` names the failure.
    Error { kind: &'static str },
}

impl StatusLabel {
    pub fn from_failure(error: &NavigationError) -> Self {
        Self::Error {
            kind: error.kind_name(),
        }
    }

    pub fn category(&self) -> Option<StatusCategory> {
        match self {
            Self::Classified { category, .. } => Some(*category),
            Self::Error { .. } => None,
        }
    }
}

impl fmt::Display for StatusLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Classified { category, domain } => {
                write!(f, "{} ({})", category.label(), domain.label())
            }
            Self::Error { kind } => write!(f, "ERROR: {kind}"),
        }
    }
}

/// Ordered phrase matching over the lower-cased page text: the portal's own
/// application rules first, then the shared closed-posting phrases, then
/// `UNKNOWN`. Any occurrence of a phrase anywhere in the text is a match.
pub fn classify_status(page_text: &str, domain: PortalDomain) -> StatusLabel {
    let text = page_text.to_lowercase();
    let contains_any = |phrases: &[&str]| phrases.iter().any(|phrase| text.contains(phrase));

    let rules: &[(StatusCategory, &[&str])] = match domain {
        PortalDomain::LinkedIn => patterns::LINKEDIN_RULES,
        PortalDomain::Workday => patterns::WORKDAY_RULES,
        _ => &[],
    };

    let category = rules
        .iter()
        .find(|rule| contains_any(rule.1))
        .map(|rule| rule.0)
        .or_else(|| contains_any(patterns::CLOSED).then_some(StatusCategory::JobClosed))
        .unwrap_or(StatusCategory::Unknown);

    StatusLabel::Classified { category, domain }
}
