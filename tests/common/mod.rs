// tests/common/mod.rs
//
// In-memory page client shared by the integration tests.
//
#![allow(dead_code)]

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use ub_airlog::config::Settings;
use ub_airlog::page::{Locator, PageClient, PageError};

/// Canned pages keyed by URL, canned text keyed by locator. A locator with no
/// entry on the current page times out immediately.
#[derive(Default)]
pub struct FakePage {
    pages: HashMap<String, HashMap<Locator, String>>,
    /// Navigations to fail before a URL loads.
    flaky: HashMap<String, u32>,
    current: Option<String>,
    pub navigations: Vec<String>,
    pub queries: Vec<Locator>,
    pub closed: Rc<Cell<bool>>,
    /// Runs before every navigation, e.g. to act as a second writer.
    hook: Option<Box<dyn FnMut(&str)>>,
}

impl FakePage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `url` with the given locator → text answers.
    pub fn page(mut self, url: &str, answers: &[(Locator, &str)]) -> Self {
        let map = answers.iter().map(|(l, t)| (*l, t.to_string())).collect();
        self.pages.insert(url.to_string(), map);
        self
    }

    pub fn flaky(mut self, url: &str, failures: u32) -> Self {
        self.flaky.insert(url.to_string(), failures);
        self
    }

    pub fn on_navigate(mut self, hook: impl FnMut(&str) + 'static) -> Self {
        self.hook = Some(Box::new(hook));
        self
    }

    pub fn navigated_to(&self, prefix: &str) -> usize {
        self.navigations.iter().filter(|u| u.starts_with(prefix)).count()
    }
}

impl PageClient for FakePage {
    fn navigate(&mut self, url: &str) -> Result<(), PageError> {
        self.navigations.push(url.to_string());
        if let Some(hook) = self.hook.as_mut() {
            hook(url);
        }
        if let Some(left) = self.flaky.get_mut(url) {
            if *left > 0 {
                *left -= 1;
                return Err(PageError::Navigation { url: url.to_string(), reason: "connection reset".into() });
            }
        }
        if !self.pages.contains_key(url) {
            return Err(PageError::Navigation { url: url.to_string(), reason: "HTTP 503".into() });
        }
        self.current = Some(url.to_string());
        Ok(())
    }

    fn wait_for_text(&mut self, locator: &Locator, timeout: Duration) -> Result<String, PageError> {
        self.queries.push(*locator);
        let url = self.current.as_ref().ok_or(PageError::NoPage)?;
        self.pages[url]
            .get(locator)
            .cloned()
            .ok_or(PageError::Timeout { locator: locator.to_string(), secs: timeout.as_secs() })
    }

    fn page_source(&self) -> Option<&str> {
        self.current.as_deref()
    }

    fn close(&mut self) {
        self.closed.set(true);
    }
}

/// Settings pointed at `dir`, with no sleeping anywhere.
pub fn quick_settings(dir: &std::path::Path) -> Settings {
    let mut s = Settings::default();
    s.out_dir = dir.to_path_buf();
    s.retry.delay = Duration::ZERO;
    s.wait = Duration::ZERO;
    s.poll = Duration::ZERO;
    s
}
