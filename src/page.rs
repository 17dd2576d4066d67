// src/page.rs
//! The page client capability the pipeline consumes.
//!
//! A client holds one "current page" at a time: `navigate` replaces it,
//! `wait_for_text` queries it. Everything site-specific lives in `specs`,
//! everything transport-specific in `core::net`.

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::time::Duration;

pub use crate::error::PageError;

/// A rule for finding one piece of rendered content.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Locator {
    /// Text of the first element matching a CSS selector.
    Css(&'static str),
    /// Regex over the page's visible text; first capture group, else the whole match.
    Pattern(&'static str),
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Css(sel) => write!(f, "css `{sel}`"),
            Locator::Pattern(re) => write!(f, "pattern /{re}/"),
        }
    }
}

pub trait PageClient {
    /// Load `url` as the current page.
    fn navigate(&mut self, url: &str) -> Result<(), PageError>;

    /// Wait up to `timeout` for `locator` to resolve on the current page and
    /// return its text, trimmed.
    fn wait_for_text(&mut self, locator: &Locator, timeout: Duration) -> Result<String, PageError>;

    /// Raw source of the current page, if one is loaded.
    fn page_source(&self) -> Option<&str>;

    /// Release whatever the client holds. Called exactly once by [`Session`].
    fn close(&mut self) {}
}

/// Scoped ownership of a page client: `close` runs when the session is
/// dropped, on success and on every error path.
pub struct Session<P: PageClient> {
    client: P,
}

impl<P: PageClient> Session<P> {
    pub fn new(client: P) -> Self {
        Self { client }
    }
}

impl<P: PageClient> Deref for Session<P> {
    type Target = P;
    fn deref(&self) -> &P {
        &self.client
    }
}

impl<P: PageClient> DerefMut for Session<P> {
    fn deref_mut(&mut self) -> &mut P {
        &mut self.client
    }
}

impl<P: PageClient> Drop for Session<P> {
    fn drop(&mut self) {
        self.client.close();
        logd!("page session closed");
    }
}
