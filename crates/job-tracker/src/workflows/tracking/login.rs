//! Per-portal login state machines sharing one browser session.

use tracing::{debug, info, warn};

use super::credentials::{attempt_order, CredentialCache, CredentialSlot};
use super::domain::PortalDomain;
use super::pacing::Pacer;
use crate::browser::{BrowserSession, NavigationError};
use crate::config::{PacingConfig, PortalCredentials};

const LINKEDIN_LOGIN_URL: &str = "https://www.linkedin.com/login";
const LINKEDIN_USERNAME_SELECTOR: &str = "#username";
const LINKEDIN_PASSWORD_SELECTOR: &str = "#password";
const LINKEDIN_SUBMIT_SELECTOR: &str = "button[type=submit]";

const WORKDAY_EMAIL_SELECTOR: &str = "input[type=email], input[type=text]";
const WORKDAY_PASSWORD_SELECTOR: &str = "input[type=password]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    Success,
    Failed,
    /// No login exists for the portal, or it is not configured.
    Skipped,
}

/// Progress of the two-password Workday login for a single tenant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkdayLoginState {
    NotAttempted,
    Trying(CredentialSlot),
    Success(CredentialSlot),
    Failed,
}

impl WorkdayLoginState {
    /// Transition after the attempt in the current state finished.
    /// `attempt_succeeded` is ignored outside `Trying`.
    pub fn next(self, order: [CredentialSlot; 2], attempt_succeeded: bool) -> Self {
        match self {
            Self::NotAttempted => Self::Trying(order[0]),
            Self::Trying(slot) if attempt_succeeded => Self::Success(slot),
            Self::Trying(slot) if slot == order[0] => Self::Trying(order[1]),
            Self::Trying(_) => Self::Failed,
            settled => settled,
        }
    }
}

pub fn workday_login_url(tenant: &str) -> String {
    format!("https://{tenant}.myworkday.com/{tenant}/login.htm")
}

/// Dispatches a login attempt to the portal-specific routine.
#[derive(Debug, Clone)]
pub struct LoginOrchestrator {
    credentials: PortalCredentials,
    pacing: PacingConfig,
}

impl LoginOrchestrator {
    pub fn new(credentials: PortalCredentials, pacing: PacingConfig) -> Self {
        Self {
            credentials,
            pacing,
        }
    }

    /// At most one login per call. Never fails the caller: the outcome is
    /// informational and the page is fetched either way.
    pub fn login(
        &self,
        session: &mut dyn BrowserSession,
        pacer: &mut dyn Pacer,
        domain: PortalDomain,
        tenant: Option<&str>,
        cache: &mut CredentialCache,
    ) -> LoginOutcome {
        match domain {
            PortalDomain::LinkedIn => self.linkedin(session, pacer),
            PortalDomain::Workday => match tenant {
                Some(tenant) => self.workday(session, pacer, tenant, cache),
                None => {
                    debug!("workday url without tenant; skipping login");
                    LoginOutcome::Skipped
                }
            },
            PortalDomain::Greenhouse => self.greenhouse(session, pacer),
            PortalDomain::Lever => self.lever(session, pacer),
            PortalDomain::Taleo | PortalDomain::SmartRecruiters | PortalDomain::Generic => {
                LoginOutcome::Skipped
            }
        }
    }

    fn linkedin(&self, session: &mut dyn BrowserSession, pacer: &mut dyn Pacer) -> LoginOutcome {
        let Some(credentials) = &self.credentials.linkedin else {
            warn!("no LinkedIn credentials configured");
            return LoginOutcome::Failed;
        };

        info!("logging into LinkedIn");
        match self.linkedin_attempt(session, pacer, &credentials.email, &credentials.password) {
            Ok(url) if url.contains("feed") || url.contains("/jobs") => {
                info!("LinkedIn login successful");
                LoginOutcome::Success
            }
            Ok(url) => {
                // A captcha or MFA page is not told apart from success; the run
                // proceeds to the application pages regardless.
                warn!(%url, "LinkedIn login may be challenged (MFA/captcha); continuing anyway");
                LoginOutcome::Success
            }
            Err(err) => {
                warn!(error = %err, "LinkedIn login failed");
                LoginOutcome::Failed
            }
        }
    }

    /// Returns the URL the browser settled on after submitting.
    fn linkedin_attempt(
        &self,
        session: &mut dyn BrowserSession,
        pacer: &mut dyn Pacer,
        email: &str,
        password: &str,
    ) -> Result<String, NavigationError> {
        session.goto(LINKEDIN_LOGIN_URL)?;
        pacer.pause(self.pacing.login_page_settle);
        session.fill(LINKEDIN_USERNAME_SELECTOR, email)?;
        session.fill(LINKEDIN_PASSWORD_SELECTOR, password)?;
        session.click(LINKEDIN_SUBMIT_SELECTOR)?;
        session.wait_for_settle()?;
        pacer.pause(self.pacing.linkedin_submit_settle);
        Ok(session.current_url())
    }

    fn workday(
        &self,
        session: &mut dyn BrowserSession,
        pacer: &mut dyn Pacer,
        tenant: &str,
        cache: &mut CredentialCache,
    ) -> LoginOutcome {
        let Some(credentials) = &self.credentials.workday else {
            warn!(tenant, "missing Workday credentials; skipping login");
            return LoginOutcome::Skipped;
        };

        let login_url = workday_login_url(tenant);
        let order = attempt_order(cache.get(tenant));
        info!(tenant, %login_url, first_slot = order[0].number(), "Workday tenant login");

        let mut state = WorkdayLoginState::NotAttempted.next(order, false);
        while let WorkdayLoginState::Trying(slot) = state {
            info!(tenant, slot = slot.number(), "trying Workday password");
            let password = &credentials.passwords[slot.index()];
            let succeeded = match self.workday_attempt(
                session,
                pacer,
                &login_url,
                &credentials.email,
                password,
            ) {
                Ok(succeeded) => succeeded,
                Err(err) => {
                    debug!(
                        tenant,
                        slot = slot.number(),
                        error = %err,
                        "Workday login attempt errored"
                    );
                    false
                }
            };
            state = state.next(order, succeeded);
        }

        match state {
            WorkdayLoginState::Success(slot) => {
                info!(tenant, slot = slot.number(), "Workday login successful");
                cache.record_success(tenant, slot);
                LoginOutcome::Success
            }
            _ => {
                warn!(tenant, "Workday login failed with both passwords");
                LoginOutcome::Failed
            }
        }
    }

    /// Success means the tenant redirected away from its login page.
    fn workday_attempt(
        &self,
        session: &mut dyn BrowserSession,
        pacer: &mut dyn Pacer,
        login_url: &str,
        email: &str,
        password: &str,
    ) -> Result<bool, NavigationError> {
        session.goto(login_url)?;
        pacer.pause(self.pacing.login_page_settle);
        session.fill(WORKDAY_EMAIL_SELECTOR, email)?;
        session.fill(WORKDAY_PASSWORD_SELECTOR, password)?;
        session.press_key("Enter")?;
        pacer.pause(self.pacing.workday_submit_settle);
        Ok(!session.current_url().to_lowercase().contains("login"))
    }

    /// Candidate portal login is not needed for public Greenhouse postings.
    fn greenhouse(
        &self,
        _session: &mut dyn BrowserSession,
        _pacer: &mut dyn Pacer,
    ) -> LoginOutcome {
        LoginOutcome::Skipped
    }

    /// Lever postings are classified without a candidate login.
    fn lever(&self, _session: &mut dyn BrowserSession, _pacer: &mut dyn Pacer) -> LoginOutcome {
        LoginOutcome::Skipped
    }
}
