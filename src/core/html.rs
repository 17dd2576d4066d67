// src/core/html.rs
// Locator evaluation over a parsed document.
// Whitespace inside an element is kept as the markup has it; the normalizer
// reconciles it later. Only the outer edges are trimmed here.

use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};

use super::sanitize::normalize_ws;
use crate::page::{Locator, PageError};

/// Resolve `loc` against `doc`. `Ok(None)` means "not on this page (yet)";
/// an empty text counts as not found.
pub fn resolve(doc: &Html, loc: &Locator) -> Result<Option<String>, PageError> {
    let text = match loc {
        Locator::Css(sel) => css_first(doc, sel)?,
        Locator::Pattern(re) => pattern(doc, re)?,
    };
    Ok(text.filter(|t| !t.is_empty()))
}

pub fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// All text nodes outside `<script>`/`<style>`, whitespace-collapsed.
pub fn visible_text(doc: &Html) -> String {
    let mut out = String::new();
    for node in doc.root_element().descendants() {
        let Node::Text(t) = node.value() else { continue };
        let hidden = node
            .parent()
            .and_then(|p| p.value().as_element().map(|e| matches!(e.name(), "script" | "style" | "noscript" | "template")))
            .unwrap_or(false);
        if !hidden {
            out.push_str(t);
            out.push(' ');
        }
    }
    normalize_ws(&out)
}

fn css_first(doc: &Html, sel: &str) -> Result<Option<String>, PageError> {
    let selector = Selector::parse(sel).map_err(|e| PageError::Locator {
        locator: s!(sel),
        reason: format!("{e:?}"),
    })?;
    Ok(doc.select(&selector).next().map(element_text))
}

fn pattern(doc: &Html, re: &str) -> Result<Option<String>, PageError> {
    let rx = Regex::new(re).map_err(|e| PageError::Locator {
        locator: s!(re),
        reason: e.to_string(),
    })?;
    let text = visible_text(doc);
    Ok(rx.captures(&text).and_then(|caps| {
        caps.get(1)
            .or_else(|| caps.get(0))
            .map(|m| m.as_str().trim().to_string())
    }))
}
