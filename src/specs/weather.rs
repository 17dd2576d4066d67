// src/specs/weather.rs
//! Scraping *spec* for the weather service front page.
//!
//! One page, four numeric readings for the city: temperature, feels-like,
//! wind speed (m/s) and relative humidity. The page is rebuilt client-side
//! often enough that each field keeps a text-pattern fallback behind its
//! structural path.

use super::{FieldSpec, TIMESTAMP_COL};
use crate::config::consts::WEATHER_URL;
use crate::normalize::FieldKind::Numeric;
use crate::page::Locator::{self, Css, Pattern};
use crate::store::LogSchema;

pub const URL: &str = WEATHER_URL;

const TEMPERATURE: &[Locator] = &[
    Css("body > div > div:nth-of-type(2) > div > div:nth-of-type(2) > div > div:nth-of-type(1) > div > div:nth-of-type(2) > div:nth-of-type(2)"),
    Pattern(r"(-?\d+(?:\.\d+)?\s*°C?)"),
];

const FEELS_LIKE: &[Locator] = &[
    Css("body > div > div:nth-of-type(2) > div > div:nth-of-type(2) > div > div:nth-of-type(1) > div > div:nth-of-type(2) > div:nth-of-type(3) > div > div:nth-of-type(2) > h1"),
    Pattern(r"(?i)feels like\s*:?\s*(-?\d+(?:\.\d+)?\s*°?C?)"),
];

const WIND_SPEED: &[Locator] = &[
    Css("body > div:nth-of-type(1) > div:nth-of-type(2) > div > div:nth-of-type(2) > div > div:nth-of-type(1) > div > div:nth-of-type(3) > div:nth-of-type(1) > p:nth-of-type(2)"),
    Pattern(r"(\d+(?:\.\d+)?\s*(?:м/с|m/s))"),
];

const HUMIDITY: &[Locator] = &[
    Css("body > div:nth-of-type(1) > div:nth-of-type(2) > div > div:nth-of-type(2) > div > div:nth-of-type(1) > div > div:nth-of-type(3) > div:nth-of-type(3) > p:nth-of-type(2)"),
    Pattern(r"(\d{1,3}\s*%)"),
];

pub const FIELDS: &[FieldSpec] = &[
    FieldSpec { name: "temperature", label: "Temperature", kind: Numeric, locators: TEMPERATURE },
    FieldSpec { name: "feels_like", label: "Feels Like", kind: Numeric, locators: FEELS_LIKE },
    FieldSpec { name: "wind_speed", label: "Wind Speed (m/s)", kind: Numeric, locators: WIND_SPEED },
    FieldSpec { name: "humidity", label: "Humidity", kind: Numeric, locators: HUMIDITY },
];

/// `timestamp,temperature,feels_like,wind_speed,humidity`
pub fn schema() -> LogSchema {
    let mut header = vec![TIMESTAMP_COL];
    header.extend(FIELDS.iter().map(|f| f.name));
    LogSchema::new(&header)
}
