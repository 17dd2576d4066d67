// src/specs/pm25.rs
//! Scraping *spec* for the per-station PM2.5 pages.
//!
//! Each monitoring station has its own page carrying the current PM2.5
//! concentration and a "last updated" stamp. Stations report hourly, so the
//! whole block sits behind the staleness gate.
//!
//! The stamp has two homes depending on the page version: the primary
//! heading, or a sibling div when the heading is occupied by something else.
//! The right one is recognised by its "Local time" wording; see
//! [`prefers_local_time`].
//!
//! Log columns: `timestamp`, then `pm25_<id>,time_<id>` per station in
//! [`STATIONS`] order. Stations are only ever appended to that list.

use super::{FieldSpec, TIMESTAMP_COL};
use crate::config::consts::IQAIR_CITY_URL;
use crate::normalize::FieldKind::{Numeric, Timestamp};
use crate::page::Locator::{self, Css, Pattern};
use crate::store::LogSchema;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Station {
    pub id: &'static str,
    pub label: &'static str,
    slug: &'static str,
}

pub const STATIONS: &[Station] = &[
    Station { id: "french", label: "French Embassy", slug: "french-embassy-peace-avenue" },
    Station { id: "eu", label: "EU Delegation", slug: "eu-delegation-to-mongolia" },
    Station { id: "czech", label: "Czech Embassy", slug: "czech-embassy-ulaanbaatar" },
    Station { id: "yarmag", label: "Yarmag Garden City", slug: "yarmag-garden-city" },
    Station { id: "chd9", label: "CHD 9 Khoroo", slug: "chd-9-khoroo" },
    Station { id: "mandakh", label: "Mandakh Naran Tuv", slug: "mandakh-naran-tuv" },
    Station { id: "chd6", label: "CHD 6 Horoo", slug: "chd-6-horoo" },
    Station { id: "airv", label: "Air V", slug: "air-v" },
];

const VALUE: &[Locator] = &[
    Css("#main-content > div:nth-of-type(3) > div:nth-of-type(2) > div:nth-of-type(1) > div:nth-of-type(2) > div:nth-of-type(2) > div > div:nth-of-type(1) > div:nth-of-type(3) > p"),
    Pattern(r"(\d+(?:\.\d+)?\s*[µμ]g/m³)"),
];

const TIME: &[Locator] = &[
    Css("#main-content > div:nth-of-type(3) > div:nth-of-type(2) > div:nth-of-type(1) > div:nth-of-type(2) > div:nth-of-type(1) > div:nth-of-type(1) > div > div:nth-of-type(2) > h2"),
    Css("#main-content > div:nth-of-type(3) > div:nth-of-type(2) > div:nth-of-type(1) > div:nth-of-type(2) > div:nth-of-type(1) > div:nth-of-type(1) > div > div:nth-of-type(2) > div:nth-of-type(2)"),
    Pattern(r"((?:Local time|Updated)[^|]{0,40}?\d{1,2}:\d{2}\s*(?:[AaPp][Mm])?,?\s*[A-Za-z]{3}\s*\d{1,2})"),
];

pub const VALUE_FIELD: FieldSpec = FieldSpec { name: "pm25", label: "PM2.5", kind: Numeric, locators: VALUE };
pub const TIME_FIELD: FieldSpec = FieldSpec { name: "time", label: "Time", kind: Timestamp, locators: TIME };

impl Station {
    pub fn url(&self) -> String {
        join!(IQAIR_CITY_URL, self.slug)
    }

    pub fn value_column(&self) -> String {
        format!("pm25_{}", self.id)
    }

    pub fn time_column(&self) -> String {
        format!("time_{}", self.id)
    }
}

/// The station stamp the page means is the one phrased in local time.
pub fn prefers_local_time(text: &str) -> bool {
    text.contains("Local time")
}

/// Current header plus one older version per station added after the first.
pub fn schema() -> LogSchema {
    let groups: Vec<Vec<String>> = STATIONS
        .iter()
        .map(|s| vec![s.value_column(), s.time_column()])
        .collect();
    LogSchema::grown(&[TIMESTAMP_COL], &groups)
}
