use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use headless_chrome::{Browser, LaunchOptions, Tab};
use tracing::debug;

use super::{BrowserSession, NavigationError};
use crate::config::BrowserConfig;

/// Chrome kills itself after this long without DevTools traffic. Rows pause
/// for several seconds between requests, so keep it well above that.
const IDLE_BROWSER_TIMEOUT: Duration = Duration::from_secs(600);

/// One Chrome process with a single tab reused for every row of the run.
/// Dropping the session shuts the browser down.
pub struct ChromeSession {
    _browser: Browser,
    tab: Arc<Tab>,
}

impl ChromeSession {
    /// Launch Chrome, disabling the sandbox inside containers (detected via
    /// `/.dockerenv` or `TRACKER_CONTAINER`). `CHROME_PATH` overrides the
    /// binary lookup.
    pub fn launch(config: &BrowserConfig) -> Result<Self, NavigationError> {
        let is_container =
            std::env::var("TRACKER_CONTAINER").is_ok() || Path::new("/.dockerenv").exists();
        let chrome_path = std::env::var("CHROME_PATH").ok().map(PathBuf::from);

        let options = LaunchOptions::default_builder()
            .headless(config.headless)
            .sandbox(!is_container)
            .path(chrome_path)
            .window_size(Some((1366, 900)))
            .idle_browser_timeout(IDLE_BROWSER_TIMEOUT)
            .build()
            .map_err(|err| NavigationError::Launch(format!("invalid launch options: {err}")))?;

        let browser = Browser::new(options)
            .map_err(|err| NavigationError::Launch(format!("failed to launch Chrome: {err}")))?;
        let tab = browser
            .new_tab()
            .map_err(|err| NavigationError::Launch(format!("failed to open tab: {err}")))?;
        tab.set_default_timeout(config.navigation_timeout);

        debug!(
            headless = config.headless,
            timeout_secs = config.navigation_timeout.as_secs(),
            "browser session ready"
        );

        Ok(Self {
            _browser: browser,
            tab,
        })
    }
}

impl BrowserSession for ChromeSession {
    fn goto(&mut self, url: &str) -> Result<(), NavigationError> {
        self.tab
            .navigate_to(url)
            .and_then(|tab| tab.wait_until_navigated())
            .map_err(|err| navigation_error(url, err))?;
        Ok(())
    }

    fn fill(&mut self, selector: &str, value: &str) -> Result<(), NavigationError> {
        let element = self
            .tab
            .find_element(selector)
            .map_err(|err| element_error(selector, err))?;
        element
            .call_js_fn("function() { this.value = ''; }", vec![], false)
            .map_err(|err| element_error(selector, err))?;
        element
            .click()
            .and_then(|element| element.type_into(value))
            .map_err(|err| element_error(selector, err))?;
        Ok(())
    }

    fn click(&mut self, selector: &str) -> Result<(), NavigationError> {
        self.tab
            .find_element(selector)
            .and_then(|element| element.click().map(|_| ()))
            .map_err(|err| element_error(selector, err))
    }

    fn press_key(&mut self, key: &str) -> Result<(), NavigationError> {
        self.tab
            .press_key(key)
            .map_err(|err| element_error(key, err))?;
        Ok(())
    }

    fn wait_for_settle(&mut self) -> Result<(), NavigationError> {
        let url = self.tab.get_url();
        self.tab
            .wait_until_navigated()
            .map_err(|err| navigation_error(&url, err))?;
        Ok(())
    }

    fn current_url(&self) -> String {
        self.tab.get_url()
    }

    fn content(&mut self) -> Result<String, NavigationError> {
        self.tab
            .get_content()
            .map_err(|err| NavigationError::Content(err.to_string()))
    }
}

fn navigation_error(url: &str, err: anyhow::Error) -> NavigationError {
    if err.downcast_ref::<headless_chrome::util::Timeout>().is_some() {
        NavigationError::Timeout {
            url: url.to_string(),
        }
    } else {
        NavigationError::Navigation {
            url: url.to_string(),
            reason: err.to_string(),
        }
    }
}

fn element_error(selector: &str, err: anyhow::Error) -> NavigationError {
    NavigationError::Element {
        selector: selector.to_string(),
        reason: err.to_string(),
    }
}
