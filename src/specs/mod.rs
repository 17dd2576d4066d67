// src/specs/mod.rs
//! # Scraping "specs" module
//!
//! Page-specific field tables: *where the ground truth lives in the HTML* for
//! each source, and what each field is.
//!
//! ## What lives here
//! - **Locator chains** per field, most specific first. Structural CSS paths
//!   come first; `Locator::Pattern` fallbacks over the visible text come last
//!   and only fire once the layout has drifted.
//! - **Field kinds** (numeric / timestamp / status), which pick the
//!   normalization rules.
//! - **Log schemas**: column names and their history.
//!
//! ## What does **not** live here
//! - Fetching, retrying and waiting (`retrieval`, `core::net`).
//! - Cleaning values (`normalize`), deciding when to scrape (`staleness`),
//!   persistence (`store`).
//!
//! ## Conventions & invariants
//! - Column order never changes; new columns go at the end.
//! - Every log starts with the capture `timestamp` column.
//! - The structural paths are brittle by nature. When a source redesigns its
//!   page, fix the chain here and nowhere else.
pub mod pm25;
pub mod weather;

use crate::normalize::FieldKind;
use crate::page::Locator;

pub const TIMESTAMP_COL: &str = "timestamp";

/// One logical field on a page.
#[derive(Clone, Copy, Debug)]
pub struct FieldSpec {
    /// Column name in the log.
    pub name: &'static str,
    /// Human label for diagnostics.
    pub label: &'static str,
    pub kind: FieldKind,
    pub locators: &'static [Locator],
}
