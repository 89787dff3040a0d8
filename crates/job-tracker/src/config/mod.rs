use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::workflows::tracking::pacing::DelayWindow;

const DEFAULT_CACHE_PATH: &str = "workday_cache.json";
const DEFAULT_NAVIGATION_TIMEOUT_SECS: f64 = 45.0;
const DEFAULT_ROW_DELAY_MIN_SECS: f64 = 3.0;
const DEFAULT_ROW_DELAY_MAX_SECS: f64 = 6.0;

/// Top-level configuration for a tracking run, loaded once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub browser: BrowserConfig,
    pub credentials: PortalCredentials,
    pub cache_path: PathBuf,
    pub pacing: PacingConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with_store(None)
    }

    /// Like [`AppConfig::load`], but an explicit store replaces the store
    /// variables entirely.
    pub fn load_with_store(store: Option<StoreConfig>) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_env_with_store(store)
    }

    pub(crate) fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with_store(None)
    }

    fn from_env_with_store(store: Option<StoreConfig>) -> Result<Self, ConfigError> {
        let store = match store {
            Some(store) => store,
            None => StoreConfig::from_env()?,
        };

        let headless = env::var("HEADLESS")
            .map(|value| value.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        let navigation_timeout =
            seconds_var("TRACKER_NAVIGATION_TIMEOUT_SECS", DEFAULT_NAVIGATION_TIMEOUT_SECS)?;

        let row_delay_min = seconds_var("TRACKER_ROW_DELAY_MIN_SECS", DEFAULT_ROW_DELAY_MIN_SECS)?;
        let row_delay_max = seconds_var("TRACKER_ROW_DELAY_MAX_SECS", DEFAULT_ROW_DELAY_MAX_SECS)?;
        let row_delay = DelayWindow::new(row_delay_min, row_delay_max).ok_or(
            ConfigError::InvalidDelayWindow {
                min: row_delay_min,
                max: row_delay_max,
            },
        )?;

        let cache_path = non_empty_var("WORKDAY_CACHE_PATH")
            .unwrap_or_else(|| DEFAULT_CACHE_PATH.to_string());
        let log_level = env::var("TRACKER_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            store,
            browser: BrowserConfig {
                headless,
                navigation_timeout,
            },
            credentials: PortalCredentials::from_env(),
            cache_path: PathBuf::from(cache_path),
            pacing: PacingConfig {
                row_delay,
                ..PacingConfig::default()
            },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Backing record store holding one worksheet per application batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    GoogleSheets {
        sheet_id: String,
        credentials_path: PathBuf,
    },
    CsvWorkbook {
        directory: PathBuf,
    },
}

impl StoreConfig {
    /// A local workbook directory takes precedence over the spreadsheet settings.
    fn from_env() -> Result<Self, ConfigError> {
        if let Some(directory) = non_empty_var("TRACKER_WORKBOOK_DIR") {
            return Ok(Self::CsvWorkbook {
                directory: PathBuf::from(directory),
            });
        }

        let sheet_id = non_empty_var("GOOGLE_SHEET_ID").ok_or(ConfigError::MissingSheetIdentity)?;
        let credentials_path = non_empty_var("GOOGLE_SHEETS_CREDENTIALS_PATH")
            .ok_or(ConfigError::MissingCredentialsPath)?;
        Ok(Self::GoogleSheets {
            sheet_id,
            credentials_path: PathBuf::from(credentials_path),
        })
    }
}

/// Settings for the single browser session shared by the whole run.
#[derive(Debug, Clone, PartialEq)]
pub struct BrowserConfig {
    pub headless: bool,
    pub navigation_timeout: Duration,
}

/// Waits inserted between interactions with third-party sites.
#[derive(Debug, Clone, PartialEq)]
pub struct PacingConfig {
    pub row_delay: DelayWindow,
    pub page_settle: Duration,
    pub login_page_settle: Duration,
    pub linkedin_submit_settle: Duration,
    pub workday_submit_settle: Duration,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            row_delay: DelayWindow::default(),
            page_settle: Duration::from_secs(5),
            login_page_settle: Duration::from_secs(3),
            linkedin_submit_settle: Duration::from_secs(4),
            workday_submit_settle: Duration::from_secs(5),
        }
    }
}

/// Site credentials. A portal without a complete set simply does not log in.
#[derive(Debug, Clone, Default)]
pub struct PortalCredentials {
    pub linkedin: Option<LinkedInCredentials>,
    pub workday: Option<WorkdayCredentials>,
}

impl PortalCredentials {
    fn from_env() -> Self {
        let linkedin = match (
            non_empty_var("LINKEDIN_EMAIL"),
            non_empty_var("LINKEDIN_PASSWORD"),
        ) {
            (Some(email), Some(password)) => Some(LinkedInCredentials { email, password }),
            _ => None,
        };

        let workday = match (
            non_empty_var("WORKDAY_EMAIL"),
            non_empty_var("WORKDAY_PASSWORD_1"),
            non_empty_var("WORKDAY_PASSWORD_2"),
        ) {
            (Some(email), Some(first), Some(second)) => Some(WorkdayCredentials {
                email,
                passwords: [first, second],
            }),
            _ => None,
        };

        Self { linkedin, workday }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct LinkedInCredentials {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for LinkedInCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinkedInCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// One Workday account shared across tenants, with two candidate passwords.
#[derive(Clone, PartialEq, Eq)]
pub struct WorkdayCredentials {
    pub email: String,
    pub passwords: [String; 2],
}

impl fmt::Debug for WorkdayCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkdayCredentials")
            .field("email", &self.email)
            .field("passwords", &["<redacted>", "<redacted>"])
            .finish()
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    MissingSheetIdentity,
    MissingCredentialsPath,
    InvalidNumber { key: &'static str, value: String },
    InvalidDelayWindow { min: Duration, max: Duration },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingSheetIdentity => write!(
                f,
                "GOOGLE_SHEET_ID (or TRACKER_WORKBOOK_DIR) must be set"
            ),
            ConfigError::MissingCredentialsPath => write!(
                f,
                "GOOGLE_SHEETS_CREDENTIALS_PATH must be set when GOOGLE_SHEET_ID is used"
            ),
            ConfigError::InvalidNumber { key, value } => {
                write!(f, "{key} must be a non-negative number of seconds, got '{value}'")
            }
            ConfigError::InvalidDelayWindow { min, max } => write!(
                f,
                "row delay minimum {:.1}s exceeds maximum {:.1}s",
                min.as_secs_f64(),
                max.as_secs_f64()
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn seconds_var(key: &'static str, default: f64) -> Result<Duration, ConfigError> {
    let Some(raw) = non_empty_var(key) else {
        return Ok(Duration::from_secs_f64(default));
    };

    raw.parse::<f64>()
        .ok()
        .filter(|secs| secs.is_finite() && *secs >= 0.0)
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
        .ok_or(ConfigError::InvalidNumber { key, value: raw })
}
