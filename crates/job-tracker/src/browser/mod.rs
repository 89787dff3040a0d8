//! Browser automation seam. The tracker only needs a handful of page
//! interactions, so the trait stays small and the Chrome adapter lives in
//! [`chrome`].

mod chrome;

pub use chrome::ChromeSession;

/// A single, reusable browser tab driven sequentially by the run.
pub trait BrowserSession {
    /// Navigate and block until the page reports it has loaded or the
    /// navigation timeout elapses.
    fn goto(&mut self, url: &str) -> Result<(), NavigationError>;

    /// Replace the value of the first element matching `selector`.
    fn fill(&mut self, selector: &str, value: &str) -> Result<(), NavigationError>;

    fn click(&mut self, selector: &str) -> Result<(), NavigationError>;

    fn press_key(&mut self, key: &str) -> Result<(), NavigationError>;

    /// Wait for any navigation triggered by the previous interaction.
    fn wait_for_settle(&mut self) -> Result<(), NavigationError>;

    fn current_url(&self) -> String;

    /// Rendered page source of the current document.
    fn content(&mut self) -> Result<String, NavigationError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NavigationError {
    #[error("navigation to {url} timed out")]
    Timeout { url: String },
    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },
    #[error("element '{selector}' unavailable: {reason}")]
    Element { selector: String, reason: String },
    #[error("unable to read page content: {0}")]
    Content(String),
    #[error("browser unavailable: {0}")]
    Launch(String),
}

impl NavigationError {
    /// Failure name written into the Decision column as `ERROR: <kind>`.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            NavigationError::Timeout { .. } => "TimeoutError",
            NavigationError::Navigation { .. } => "NavigationError",
            NavigationError::Element { .. } => "ElementError",
            NavigationError::Content(_) => "ContentError",
            NavigationError::Launch(_) => "BrowserError",
        }
    }
}
