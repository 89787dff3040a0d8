//! Fixed phrase lists matched against lower-cased page text.

use super::StatusCategory;

/// Posting-level signals shared by every portal.
pub(crate) const CLOSED: &[&str] = &[
    "no longer accepting applications",
    "no longer available",
    "job has expired",
    "position has been filled",
    "position filled",
    "job is closed",
    "this job is closed",
    "no longer posted",
    "no longer active",
    "position is no longer open",
];

const LINKEDIN_REJECT: &[&str] = &[
    "no longer being considered for this job",
    "you’re no longer being considered",
    "you are no longer in consideration",
];

const LINKEDIN_REVIEW: &[&str] = &[
    "your application is under review",
    "your application is being reviewed",
];

const LINKEDIN_VIEWED: &[&str] = &[
    "your application has been viewed",
    "your application was viewed",
];

const LINKEDIN_SUBMITTED: &[&str] = &["we received your application", "application submitted"];

const WORKDAY_REJECT: &[&str] = &[
    "no longer in consideration",
    "not selected",
    "no longer being considered",
];

const WORKDAY_IN_PROCESS: &[&str] = &["in progress", "under review", "under consideration"];

/// Application-level rules in priority order; checked before [`CLOSED`].
pub(crate) const LINKEDIN_RULES: &[(StatusCategory, &[&str])] = &[
    (StatusCategory::ApplicationRejected, LINKEDIN_REJECT),
    (StatusCategory::ApplicationUnderReview, LINKEDIN_REVIEW),
    (StatusCategory::ApplicationViewed, LINKEDIN_VIEWED),
    (StatusCategory::ApplicationSubmitted, LINKEDIN_SUBMITTED),
];

pub(crate) const WORKDAY_RULES: &[(StatusCategory, &[&str])] = &[
    (StatusCategory::ApplicationRejected, WORKDAY_REJECT),
    (StatusCategory::ApplicationInProcess, WORKDAY_IN_PROCESS),
];
