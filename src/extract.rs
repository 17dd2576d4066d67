// src/extract.rs
use std::time::Duration;

use crate::page::{Locator, PageClient};

/// Raw result of one field extraction, before normalization.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Extracted {
    Text(String),
    /// Every locator in the chain came up empty.
    Failed,
}

impl Extracted {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Extracted::Text(t) => Some(t),
            Extracted::Failed => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Extracted::Failed)
    }
}

/// Walks an ordered locator chain against the current page.
#[derive(Clone, Debug)]
pub struct FieldExtractor {
    wait: Duration,
}

impl FieldExtractor {
    pub fn new(wait: Duration) -> Self {
        Self { wait }
    }

    /// First non-empty text in chain order. Later locators are never queried
    /// once one succeeds.
    pub fn extract<P>(&self, page: &mut P, locators: &[Locator], label: &str) -> Extracted
    where
        P: PageClient + ?Sized,
    {
        self.extract_preferring(page, locators, label, |_| true)
    }

    /// Like [`extract`](Self::extract), but keeps scanning until a text
    /// satisfies `prefer`. If nothing does, the first non-empty text wins.
    pub fn extract_preferring<P, F>(
        &self,
        page: &mut P,
        locators: &[Locator],
        label: &str,
        prefer: F,
    ) -> Extracted
    where
        P: PageClient + ?Sized,
        F: Fn(&str) -> bool,
    {
        let mut fallback: Option<String> = None;

        for loc in locators {
            let text = match page.wait_for_text(loc, self.wait) {
                Ok(t) => s!(t.trim()),
                Err(e) => {
                    logd!("{}: {} failed: {}", label, loc, e);
                    continue;
                }
            };
            if text.is_empty() {
                logd!("{}: {} matched empty text", label, loc);
                continue;
            }
            if prefer(&text) {
                logd!("{}: {}", label, text);
                return Extracted::Text(text);
            }
            logd!("{}: {} gave {:?}, trying next locator", label, loc, text);
            if fallback.is_none() {
                fallback = Some(text);
            }
        }

        match fallback {
            Some(text) => {
                logd!("{}: {} (no preferred match)", label, text);
                Extracted::Text(text)
            }
            None => {
                logw!("{}: all {} locators failed", label, locators.len());
                Extracted::Failed
            }
        }
    }
}
