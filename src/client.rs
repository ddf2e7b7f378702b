use crate::error::{Result, ScraperError};
use crate::parsers::{form, text};
use crate::session::CatalogSession;
use async_trait::async_trait;
use reqwest::Url;
use reqwest::cookie::Jar;
use scraper::Html;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// The page a session is currently showing.
struct Page {
    url: Url,
    html: String,
}

/// A browser-less session: GETs pages and posts forms the way a browser
/// would, keeping cookies and hidden form state (ASP.NET view state) between
/// requests.
pub struct HttpSession {
    client: reqwest::Client,
    page: Option<Page>,
    /// Values chosen or typed on the current page, by control name.
    pending: Vec<(String, String)>,
}

impl HttpSession {
    /// `wait_timeout` bounds every request, including reading the body.
    pub fn new(wait_timeout: Duration, user_agent: &str) -> Result<Self> {
        let cookie_jar = Arc::new(Jar::default());

        let client = reqwest::Client::builder()
            .cookie_provider(cookie_jar)
            .user_agent(user_agent)
            .timeout(wait_timeout)
            .build()?;

        Ok(Self {
            client,
            page: None,
            pending: Vec::new(),
        })
    }

    fn current(&self) -> Result<&Page> {
        self.page
            .as_ref()
            .ok_or_else(|| ScraperError::ElementNotFound("no page loaded yet".to_string()))
    }

    fn document(&self) -> Result<Html> {
        Ok(Html::parse_document(&self.current()?.html))
    }

    async fn load(&mut self, response: reqwest::Response) -> Result<()> {
        let response = response.error_for_status()?;
        let url = response.url().clone();
        let html = response.text().await?;

        debug!(url = %url, bytes = html.len(), "page loaded");
        self.page = Some(Page { url, html });
        self.pending.clear();
        Ok(())
    }

    fn set_pending(&mut self, name: String, value: String) {
        match self.pending.iter_mut().find(|(n, _)| *n == name) {
            Some(field) => field.1 = value,
            None => self.pending.push((name, value)),
        }
    }
}

#[async_trait]
impl CatalogSession for HttpSession {
    async fn navigate(&mut self, url: &str) -> Result<()> {
        let response = self.client.get(url).send().await?;
        self.load(response).await
    }

    async fn select_option(&mut self, selector: &str, value: &str) -> Result<()> {
        let name = {
            let document = self.document()?;
            let control = form::find_control(&document, selector)?;
            form::ensure_option(control, selector, value)?;
            form::control_name(control, selector)?
        };

        self.set_pending(name, value.to_string());
        Ok(())
    }

    async fn type_text(&mut self, selector: &str, text: &str) -> Result<()> {
        let (name, initial) = {
            let document = self.document()?;
            let control = form::find_control(&document, selector)?;
            (
                form::control_name(control, selector)?,
                form::input_value(control),
            )
        };

        let mut value = self
            .pending
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.clone())
            .unwrap_or(initial);
        value.push_str(text);

        self.set_pending(name, value);
        Ok(())
    }

    async fn submit(&mut self, selector: &str) -> Result<()> {
        let submission = {
            let page = self.current()?;
            let document = Html::parse_document(&page.html);
            form::build_submission(&document, &page.url, selector, &self.pending)?
        };

        debug!(
            action = %submission.action,
            fields = submission.fields.len(),
            "submitting form"
        );

        let response = self
            .client
            .post(submission.action)
            .form(&submission.fields)
            .send()
            .await?;
        self.load(response).await
    }

    async fn texts(&mut self, selector: &str) -> Result<Vec<String>> {
        let document = self.document()?;
        let selector = form::selector(selector)?;

        Ok(document.select(&selector).map(text::rendered_text).collect())
    }
}
