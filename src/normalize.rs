// src/normalize.rs
//! Raw page text → canonical [`Reading`].
//!
//! Checks run in a fixed order and the first hit decides:
//! 1. extraction failed → `Error`
//! 2. whitespace/line breaks collapsed
//! 3. error marker in the text → `Error`
//! 4. "no current data" marker (any case) → `Offline`
//! 5. timestamps: known patterns → `HH:MM, Mon DD`; short text with a colon
//!    passes through verbatim; anything else → `Error`
//! 6. numerics: unit/label noise stripped, first signed decimal kept; no
//!    number → the residual text passes through, empty if only units were left
//! 7. status text passes through cleaned
//!
//! Empty text after cleaning is an `Error` for every kind.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::config::consts::OFFLINE_CELL;
use crate::core::sanitize::{contains_ci, normalize_ws};
use crate::extract::Extracted;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Numeric,
    Timestamp,
    Status,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Status {
    Ok,
    /// The source says it has nothing to report right now.
    Offline,
    /// Retrieval or parsing failed.
    Error,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// `text` is the exact decimal substring found; `value` its parse.
    Number { text: String, value: f64 },
    /// Canonical `HH:MM, Mon DD`.
    Timestamp(String),
    /// Best-effort passthrough.
    Text(String),
}

impl Value {
    pub fn as_str(&self) -> &str {
        match self {
            Value::Number { text, .. } => text,
            Value::Timestamp(t) | Value::Text(t) => t,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number { value, .. } => Some(*value),
            _ => None,
        }
    }
}

/// One observation of one field. `value()` is `Some` exactly when `status()` is `Ok`.
#[derive(Clone, Debug, PartialEq)]
pub struct Reading {
    field: String,
    raw: Option<String>,
    status: Status,
    value: Option<Value>,
}

impl Reading {
    fn ok(field: &str, raw: Option<String>, value: Value) -> Self {
        Self { field: s!(field), raw, status: Status::Ok, value: Some(value) }
    }

    fn offline(field: &str, raw: Option<String>) -> Self {
        Self { field: s!(field), raw, status: Status::Offline, value: None }
    }

    /// An `Error` reading. Pass `None` for fields whose page never loaded.
    pub fn error(field: &str, raw: Option<String>) -> Self {
        Self { field: s!(field), raw, status: Status::Error, value: None }
    }

    pub fn field_name(&self) -> &str { &self.field }
    pub fn raw_text(&self) -> Option<&str> { self.raw.as_deref() }
    pub fn status(&self) -> Status { self.status }
    pub fn value(&self) -> Option<&Value> { self.value.as_ref() }

    /// Log cell text: the canonical value, empty for `Error`, `OFFLINE` for `Offline`.
    pub fn cell(&self) -> String {
        match (self.status, &self.value) {
            (Status::Ok, Some(v)) => s!(v.as_str()),
            (Status::Offline, _) => s!(OFFLINE_CELL),
            _ => s!(),
        }
    }
}

const ERROR_MARKER: &str = "ERROR";
const NO_DATA_MARKERS: &[&str] = &["no current data", "no data available"];
/// Longest unrecognised timestamp text still accepted verbatim.
const MAX_TIME_PASSTHROUGH: usize = 40;

const MONTHS: [&str; 12] = ["Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec"];

// Unit tokens removed before number matching. Longest first so "°C" goes before "°".
const UNIT_TOKENS: &[&str] = &[
    "µg/m³", "μg/m³", "ug/m³", "ug/m3", "мкг/м³", "°C", "°F", "℃", "°", "м/с", "m/s", "км/ц", "km/h", "%", "|",
];

static LABELS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:feels\s+like|pm\s*2\.5|pm25|humidity|wind(?:\s+speed)?|temperature|aqi)\b:?")
        .expect("label regex")
});
static NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[-+]?\d+(?:\.\d+)?").expect("number regex"));

static TIME_12H: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d{1,2}):(\d{2})\s*([ap])\.?m\.?\s*,?\s*([a-z]{3})[a-z]*\.?\s*(\d{1,2})\b")
        .expect("12h regex")
});
static TIME_24H: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d{1,2}):(\d{2})\s*,?\s*([a-z]{3})[a-z]*\.?\s*(\d{1,2})\b").expect("24h regex")
});
static DATE_FIRST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b([a-z]{3})[a-z]*\.?\s+(\d{1,2}),?\s+(\d{1,2}):(\d{2})(?:\s*([ap])\.?m\.?)?")
        .expect("date-first regex")
});

/// Normalize one extracted field.
pub fn normalize(field: &str, raw: &Extracted, kind: FieldKind) -> Reading {
    let raw_text = match raw {
        Extracted::Failed => return Reading::error(field, None),
        Extracted::Text(t) => t,
    };
    let keep = || Some(raw_text.clone());

    let text = normalize_ws(raw_text);
    if text.is_empty() || text.contains(ERROR_MARKER) {
        return Reading::error(field, keep());
    }
    if NO_DATA_MARKERS.iter().any(|m| contains_ci(&text, m)) {
        return Reading::offline(field, keep());
    }

    match kind {
        FieldKind::Timestamp => match canonical_time(&text) {
            Some(ts) => Reading::ok(field, keep(), Value::Timestamp(ts)),
            None if text.contains(':') && text.chars().count() < MAX_TIME_PASSTHROUGH => {
                Reading::ok(field, keep(), Value::Text(text))
            }
            None => Reading::error(field, keep()),
        },
        FieldKind::Numeric => Reading::ok(field, keep(), numeric(&text)),
        FieldKind::Status => Reading::ok(field, keep(), Value::Text(text)),
    }
}

/// Shorthand for callers holding plain text.
pub fn normalize_text(field: &str, raw: &str, kind: FieldKind) -> Reading {
    normalize(field, &Extracted::Text(s!(raw)), kind)
}

fn numeric(text: &str) -> Value {
    let mut residual = text.replace('\u{2212}', "-");
    for unit in UNIT_TOKENS {
        residual = residual.replace(unit, " ");
    }
    let residual = normalize_ws(&LABELS.replace_all(&residual, " "));

    if let Some(m) = NUMBER.find(&residual) {
        let text = s!(m.as_str());
        if let Ok(value) = text.parse::<f64>() {
            return Value::Number { text, value };
        }
    }
    Value::Text(residual)
}

/// First known pattern wins; a match with out-of-range parts falls through to the next.
pub fn canonical_time(text: &str) -> Option<String> {
    if let Some(c) = TIME_12H.captures(text) {
        let hour12 = num(&c, 1)?;
        let pm = c[3].eq_ignore_ascii_case("p");
        if (1..=12).contains(&hour12) {
            let hour = hour12 % 12 + if pm { 12 } else { 0 };
            if let Some(ts) = format_time(hour, num(&c, 2)?, &c[4], num(&c, 5)?) {
                return Some(ts);
            }
        }
    }
    if let Some(c) = TIME_24H.captures(text) {
        if let Some(ts) = format_time(num(&c, 1)?, num(&c, 2)?, &c[3], num(&c, 4)?) {
            return Some(ts);
        }
    }
    if let Some(c) = DATE_FIRST.captures(text) {
        let mut hour = num(&c, 3)?;
        if let Some(ampm) = c.get(5) {
            if !(1..=12).contains(&hour) {
                return None;
            }
            hour = hour % 12 + if ampm.as_str().eq_ignore_ascii_case("p") { 12 } else { 0 };
        }
        return format_time(hour, num(&c, 4)?, &c[1], num(&c, 2)?);
    }
    None
}

fn num(c: &Captures<'_>, i: usize) -> Option<u32> {
    c.get(i)?.as_str().parse().ok()
}

fn format_time(hour: u32, minute: u32, month: &str, day: u32) -> Option<String> {
    if hour > 23 || minute > 59 || !(1..=31).contains(&day) {
        return None;
    }
    let mon = MONTHS.iter().find(|m| m.eq_ignore_ascii_case(month))?;
    Some(format!("{hour:02}:{minute:02}, {mon} {day}"))
}
