use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Job-application portal a URL belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortalDomain {
    LinkedIn,
    Workday,
    Greenhouse,
    Lever,
    Taleo,
    SmartRecruiters,
    Generic,
}

/// Host markers checked in order; the first contained marker wins.
const HOST_MARKERS: [(&str, PortalDomain); 6] = [
    ("linkedin.com", PortalDomain::LinkedIn),
    ("myworkdayjobs.com", PortalDomain::Workday),
    ("greenhouse.io", PortalDomain::Greenhouse),
    ("lever.co", PortalDomain::Lever),
    ("taleo.net", PortalDomain::Taleo),
    ("smartrecruiters.com", PortalDomain::SmartRecruiters),
];

impl PortalDomain {
    pub const fn ordered() -> [Self; 7] {
        [
            Self::LinkedIn,
            Self::Workday,
            Self::Greenhouse,
            Self::Lever,
            Self::Taleo,
            Self::SmartRecruiters,
            Self::Generic,
        ]
    }

    /// Lowercase identifier used in logs.
    pub const fn id(self) -> &'static str {
        match self {
            Self::LinkedIn => "linkedin",
            Self::Workday => "workday",
            Self::Greenhouse => "greenhouse",
            Self::Lever => "lever",
            Self::Taleo => "taleo",
            Self::SmartRecruiters => "smartrecruiters",
            Self::Generic => "generic",
        }
    }

    /// Name shown inside status labels. Only the portals with application-level
    /// classification get a display name; the rest keep their identifier.
    pub const fn label(self) -> &'static str {
        match self {
            Self::LinkedIn => "LinkedIn",
            Self::Workday => "Workday",
            other => other.id(),
        }
    }
}

impl fmt::Display for PortalDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Classify a URL by case-insensitive host-marker containment.
pub fn classify_domain(url: &str) -> PortalDomain {
    let lowered = url.to_lowercase();
    HOST_MARKERS
        .iter()
        .find(|(marker, _)| lowered.contains(marker))
        .map(|(_, domain)| *domain)
        .unwrap_or(PortalDomain::Generic)
}

fn tenant_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"https://([^.]+)\.wd\d+\.myworkdayjobs\.com")
            .unwrap_or_else(|err| unreachable!("tenant pattern is a valid regex: {err}"))
    })
}

/// Workday tenant encoded in `https://<tenant>.wd<N>.myworkdayjobs.com/...`.
pub fn extract_tenant(url: &str) -> Option<String> {
    tenant_pattern()
        .captures(url)
        .and_then(|captures| captures.get(1))
        .map(|tenant| tenant.as_str().to_string())
}
