use async_trait::async_trait;

use crate::config::{Backend, Config};
use crate::error::Result;

/// One interactive session against the catalog search page.
///
/// Controls are addressed by CSS selector. Every call acts on the page the
/// session is currently showing, so a session must not be shared between
/// concurrent lookups.
#[async_trait]
pub trait CatalogSession: Send {
    /// Load `url`, discarding whatever the session was showing.
    async fn navigate(&mut self, url: &str) -> Result<()>;
    /// Pick the option whose value is `value` in a `<select>`.
    async fn select_option(&mut self, selector: &str, value: &str) -> Result<()>;
    /// Type `text` into a text input, after any text already there.
    async fn type_text(&mut self, selector: &str, text: &str) -> Result<()>;
    /// Activate a submit control and wait for the resulting page.
    async fn submit(&mut self, selector: &str) -> Result<()>;
    /// Rendered text of every element matching `selector`, in page order.
    async fn texts(&mut self, selector: &str) -> Result<Vec<String>>;
    /// Release the session. Called once, after the last lookup.
    async fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Opens the session backend picked in the configuration.
pub async fn open(config: &Config) -> Result<Box<dyn CatalogSession>> {
    match config.backend {
        Backend::Http => Ok(Box::new(crate::client::HttpSession::new(
            config.wait_timeout(),
            &config.user_agent,
        )?)),
        #[cfg(feature = "browser")]
        Backend::Browser => Ok(Box::new(
            crate::browser::BrowserSession::launch(config.wait_timeout()).await?,
        )),
        #[cfg(not(feature = "browser"))]
        Backend::Browser => Err(crate::error::ScraperError::BrowserError(
            "this build has no browser support; rebuild with `--features browser`".to_string(),
        )),
    }
}
