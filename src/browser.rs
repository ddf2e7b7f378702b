//! Headless Chromium session driven over CDP with chromiumoxide.
//!
//! Only built with the `browser` feature. Element lookups poll until the
//! configured wait bound runs out, standing in for a driver-wide implicit wait.

use async_trait::async_trait;
use chromiumoxide::element::Element;
use chromiumoxide::error::CdpError;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures_util::StreamExt;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::error::{Result, ScraperError};
use crate::session::CatalogSession;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

pub struct BrowserSession {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
    wait_timeout: Duration,
}

fn cdp(err: CdpError) -> ScraperError {
    ScraperError::BrowserError(err.to_string())
}

/// Chrome reports a selector with no match as a lookup of node id 0.
fn is_missing_node(err: &CdpError) -> bool {
    matches!(err, CdpError::NotFound) || err.to_string().contains("Could not find node")
}

/// Quotes a Rust string as a JavaScript string literal.
fn js_string(value: &str) -> Result<String> {
    serde_json::to_string(value).map_err(|e| ScraperError::BrowserError(e.to_string()))
}

/// Script that picks `value` in the `<select>` matched by `selector`.
/// Evaluates to "ok", "no-option" or "missing".
fn select_script(selector: &str, value: &str) -> Result<String> {
    Ok(format!(
        r#"(() => {{
            const el = document.querySelector({sel});
            if (!el || el.tagName !== "SELECT") return "missing";
            const option = Array.from(el.options).find(o => o.value === {val});
            if (!option) return "no-option";
            el.value = option.value;
            el.dispatchEvent(new Event("change", {{ bubbles: true }}));
            return "ok";
        }})()"#,
        sel = js_string(selector)?,
        val = js_string(value)?,
    ))
}

impl BrowserSession {
    /// Launches a headless browser with a single blank tab.
    pub async fn launch(wait_timeout: Duration) -> Result<Self> {
        let config = BrowserConfig::builder()
            .build()
            .map_err(ScraperError::BrowserError)?;

        let (browser, mut handler) = Browser::launch(config).await.map_err(cdp)?;

        // The handler must be polled for the browser to make progress
        let handler = tokio::spawn(async move {
            while let Some(_event) = handler.next().await {}
        });

        let page = browser.new_page("about:blank").await.map_err(cdp)?;
        debug!(wait_timeout = ?wait_timeout, "browser launched");

        Ok(Self {
            browser,
            page,
            handler,
            wait_timeout,
        })
    }

    async fn wait_for(&self, selector: &str) -> Result<Element> {
        let start = Instant::now();
        loop {
            match self.page.find_element(selector).await {
                Ok(element) => return Ok(element),
                Err(err) if !is_missing_node(&err) => return Err(cdp(err)),
                Err(_) if start.elapsed() < self.wait_timeout => {
                    tokio::time::sleep(POLL_INTERVAL).await
                }
                Err(_) => {
                    return Err(ScraperError::Timeout {
                        selector: selector.to_string(),
                        waited_ms: start.elapsed().as_millis(),
                    });
                }
            }
        }
    }
}

#[async_trait]
impl CatalogSession for BrowserSession {
    async fn navigate(&mut self, url: &str) -> Result<()> {
        self.page.goto(url).await.map_err(cdp)?;
        Ok(())
    }

    async fn select_option(&mut self, selector: &str, value: &str) -> Result<()> {
        self.wait_for(selector).await?;

        let script = select_script(selector, value)?;
        let outcome: String = self
            .page
            .evaluate(script)
            .await
            .map_err(cdp)?
            .into_value()
            .map_err(|e| ScraperError::BrowserError(e.to_string()))?;

        match outcome.as_str() {
            "ok" => Ok(()),
            "no-option" => Err(ScraperError::OptionNotFound {
                selector: selector.to_string(),
                value: value.to_string(),
            }),
            _ => Err(ScraperError::ElementNotFound(selector.to_string())),
        }
    }

    async fn type_text(&mut self, selector: &str, text: &str) -> Result<()> {
        let element = self.wait_for(selector).await?;
        element.click().await.map_err(cdp)?;
        element.type_str(text).await.map_err(cdp)?;
        Ok(())
    }

    async fn submit(&mut self, selector: &str) -> Result<()> {
        let element = self.wait_for(selector).await?;
        element.click().await.map_err(cdp)?;
        self.page.wait_for_navigation().await.map_err(cdp)?;
        Ok(())
    }

    async fn texts(&mut self, selector: &str) -> Result<Vec<String>> {
        let start = Instant::now();
        let elements = loop {
            let found = match self.page.find_elements(selector).await {
                Ok(found) => found,
                Err(err) if is_missing_node(&err) => Vec::new(),
                Err(err) => return Err(cdp(err)),
            };
            if !found.is_empty() || start.elapsed() >= self.wait_timeout {
                break found;
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        };

        let mut texts = Vec::with_capacity(elements.len());
        for element in elements {
            texts.push(element.inner_text().await.map_err(cdp)?.unwrap_or_default());
        }
        Ok(texts)
    }

    async fn close(&mut self) -> Result<()> {
        let closed = self.browser.close().await.map_err(cdp);
        self.handler.abort();
        closed.map(|_| ())
    }
}
