// src/staleness.rs
use chrono::{Duration, NaiveDateTime, Timelike};

use crate::config::consts::{CAPTURE_FMT, REFETCH_MINS};

/// Decides whether the slow-changing dataset is due for another fetch.
///
/// Refetch when there is no previous capture, when it does not parse (fail
/// open), when the hour of day has changed, or when more than `max_age` has
/// passed since it.
#[derive(Clone, Copy, Debug)]
pub struct StalenessGate {
    max_age: Duration,
}

impl Default for StalenessGate {
    fn default() -> Self {
        Self { max_age: Duration::minutes(REFETCH_MINS) }
    }
}

impl StalenessGate {
    pub fn new(max_age: Duration) -> Self {
        Self { max_age }
    }

    pub fn should_refetch(&self, last_capture: Option<&str>, now: NaiveDateTime) -> bool {
        let Some(raw) = last_capture else { return true };
        let Some(last) = parse_capture(raw) else {
            logw!("unreadable last capture {:?}; refetching", raw);
            return true;
        };
        now.hour() != last.hour() || now.signed_duration_since(last) > self.max_age
    }
}

/// `should_refetch` with the default one-hour window.
pub fn should_refetch(last_capture: Option<&str>, now: NaiveDateTime) -> bool {
    StalenessGate::default().should_refetch(last_capture, now)
}

/// Parse a `YYYY-MM-DD HH:MM` capture timestamp.
pub fn parse_capture(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s.trim(), CAPTURE_FMT).ok()
}

pub fn format_capture(t: NaiveDateTime) -> String {
    t.format(CAPTURE_FMT).to_string()
}
