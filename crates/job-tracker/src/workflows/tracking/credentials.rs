//! Per-tenant memory of which Workday password last worked.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Index of one of the two configured Workday passwords, stored as `1` or `2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum CredentialSlot {
    First,
    Second,
}

impl CredentialSlot {
    pub const fn number(self) -> u8 {
        match self {
            Self::First => 1,
            Self::Second => 2,
        }
    }

    pub const fn index(self) -> usize {
        match self {
            Self::First => 0,
            Self::Second => 1,
        }
    }

    pub const fn other(self) -> Self {
        match self {
            Self::First => Self::Second,
            Self::Second => Self::First,
        }
    }
}

impl TryFrom<u8> for CredentialSlot {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::First),
            2 => Ok(Self::Second),
            other => Err(format!("credential slot must be 1 or 2, got {other}")),
        }
    }
}

impl From<CredentialSlot> for u8 {
    fn from(slot: CredentialSlot) -> Self {
        slot.number()
    }
}

/// Order in which to try the two passwords: last known good first.
pub fn attempt_order(cached: Option<CredentialSlot>) -> [CredentialSlot; 2] {
    let first = cached.unwrap_or(CredentialSlot::First);
    [first, first.other()]
}

/// In-memory tenant → slot mapping. Mutated during the run, flushed once at the end.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CredentialCache {
    entries: BTreeMap<String, CredentialSlot>,
}

impl CredentialCache {
    pub fn get(&self, tenant: &str) -> Option<CredentialSlot> {
        self.entries.get(tenant).copied()
    }

    pub fn record_success(&mut self, tenant: &str, slot: CredentialSlot) {
        self.entries.insert(tenant.to_string(), slot);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, CredentialSlot)> for CredentialCache {
    fn from_iter<I: IntoIterator<Item = (String, CredentialSlot)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("failed to encode credential cache: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("failed to write credential cache: {0}")]
    Io(#[from] std::io::Error),
}

/// JSON file holding the cache as a flat `{"tenant": 1|2}` object.
#[derive(Debug, Clone)]
pub struct CredentialCacheStore {
    path: PathBuf,
}

impl CredentialCacheStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing or unreadable files yield an empty cache.
    pub fn load(&self) -> CredentialCache {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) => {
                debug!(path = %self.path.display(), error = %err, "no credential cache loaded");
                return CredentialCache::default();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(cache) => cache,
            Err(err) => {
                warn!(
                    path = %self.path.display(),
                    error = %err,
                    "ignoring unreadable credential cache"
                );
                CredentialCache::default()
            }
        }
    }

    /// Writes through a sibling temp file and renames it over the target.
    pub fn save(&self, cache: &CredentialCache) -> Result<(), CacheError> {
        let body = serde_json::to_string_pretty(cache)?;
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, body)?;
        fs::rename(&staging, &self.path)?;
        Ok(())
    }
}
