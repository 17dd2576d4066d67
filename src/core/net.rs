// src/core/net.rs
// Blocking HTTP page client. No JavaScript: pages are fetched, parsed and
// queried as served. "Waiting" for an element means re-fetching the same URL,
// with the pause doubling after each try, until the locator resolves or the
// budget runs out. Once one wait on a page has run out, the page is settled:
// later waits on it evaluate the loaded document once and never re-fetch.

use std::thread;
use std::time::{Duration, Instant};

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use scraper::Html;

use super::html;
use crate::config::consts::REQUEST_TIMEOUT_SECS;
use crate::config::Settings;
use crate::page::{Locator, PageClient, PageError};

struct Loaded {
    url: String,
    source: String,
    doc: Html,
    settled: bool,
}

pub struct HttpPage {
    client: Client,
    poll: Duration,
    current: Option<Loaded>,
}

impl HttpPage {
    pub fn new(settings: &Settings) -> Result<Self, PageError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));

        let client = Client::builder()
            .user_agent(settings.user_agent.as_str())
            .default_headers(headers)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(|e| PageError::Client(e.to_string()))?;

        Ok(Self { client, poll: settings.poll, current: None })
    }

    fn fetch(&self, url: &str) -> Result<String, PageError> {
        let nav_err = |reason: String| PageError::Navigation { url: s!(url), reason };

        let resp = self.client.get(url).send().map_err(|e| nav_err(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(nav_err(format!("HTTP {status}")));
        }
        resp.text().map_err(|e| nav_err(e.to_string()))
    }

    fn reload(&mut self) -> Result<(), PageError> {
        let url = match &self.current {
            Some(page) => page.url.clone(),
            None => return Err(PageError::NoPage),
        };
        self.navigate(&url)
    }
}

impl PageClient for HttpPage {
    fn navigate(&mut self, url: &str) -> Result<(), PageError> {
        let source = self.fetch(url)?;
        let doc = Html::parse_document(&source);
        logd!("loaded {} ({} bytes)", url, source.len());
        self.current = Some(Loaded { url: s!(url), source, doc, settled: false });
        Ok(())
    }

    fn wait_for_text(&mut self, locator: &Locator, timeout: Duration) -> Result<String, PageError> {
        let deadline = Instant::now() + timeout;
        let mut pause = self.poll;
        loop {
            let page = self.current.as_ref().ok_or(PageError::NoPage)?;
            if let Some(text) = html::resolve(&page.doc, locator)? {
                return Ok(text);
            }

            let now = Instant::now();
            if page.settled || now >= deadline {
                if let Some(page) = self.current.as_mut() {
                    page.settled = true;
                }
                return Err(PageError::Timeout { locator: locator.to_string(), secs: timeout.as_secs() });
            }
            thread::sleep(pause.min(deadline - now));
            pause = pause.saturating_mul(2);

            // A failed re-fetch keeps the previous document; the wait budget still applies.
            if let Err(e) = self.reload() {
                logd!("re-fetch while waiting for {}: {}", locator, e);
            }
        }
    }

    fn page_source(&self) -> Option<&str> {
        self.current.as_ref().map(|p| p.source.as_str())
    }

    fn close(&mut self) {
        self.current = None;
    }
}
