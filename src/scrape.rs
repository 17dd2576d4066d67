// src/scrape.rs
//! One polling cycle: weather page → weather log, then (if due) every
//! station page → PM2.5 log.
//!
//! Failures stay as small as they can: a field that cannot be extracted is
//! an empty cell, a page that cannot be loaded empties that page's cells,
//! and the row is written regardless. Only log I/O can fail a dataset, and
//! even then the other dataset is still attempted.

use std::fmt;
use std::path::PathBuf;

use chrono::{NaiveDateTime, Utc};
use chrono_tz::Tz;

use crate::config::Settings;
use crate::error::{Error, LogError};
use crate::extract::FieldExtractor;
use crate::normalize::{normalize, Reading, Status};
use crate::page::PageClient;
use crate::retrieval::RetryPolicy;
use crate::specs::pm25::{self, Station, STATIONS, TIME_FIELD, VALUE_FIELD};
use crate::specs::weather;
use crate::staleness::{format_capture, StalenessGate};
use crate::store::LogWriter;

/// Per-status cell counts for one written row.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Tally {
    pub ok: usize,
    pub offline: usize,
    pub error: usize,
}

impl Tally {
    pub fn of(readings: &[Reading]) -> Self {
        let mut t = Tally::default();
        for r in readings {
            match r.status() {
                Status::Ok => t.ok += 1,
                Status::Offline => t.offline += 1,
                Status::Error => t.error += 1,
            }
        }
        t
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DatasetOutcome {
    Written { path: PathBuf, tally: Tally },
    /// Skipped: the newest row is recent enough.
    Fresh { last_capture: String },
    Failed { path: PathBuf, reason: String },
}

impl fmt::Display for DatasetOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetOutcome::Written { path, tally } => write!(
                f,
                "wrote {} (ok {}, offline {}, error {})",
                path.display(),
                tally.ok,
                tally.offline,
                tally.error
            ),
            DatasetOutcome::Fresh { last_capture } => write!(f, "fresh since {last_capture}, skipped"),
            DatasetOutcome::Failed { path, reason } => write!(f, "FAILED {}: {}", path.display(), reason),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CycleSummary {
    pub captured_at: String,
    pub weather: DatasetOutcome,
    pub pm25: DatasetOutcome,
}

/// Capture time on the city's wall clock, whatever the host zone is.
pub fn capture_time(tz: Tz) -> NaiveDateTime {
    Utc::now().with_timezone(&tz).naive_local()
}

/// Run one cycle against `page`, stamping rows with `now`.
pub fn run_cycle<P>(page: &mut P, settings: &Settings, now: NaiveDateTime) -> Result<CycleSummary, Error>
where
    P: PageClient + ?Sized,
{
    Pipeline::new(page, settings).run(now)
}

pub struct Pipeline<'a, P: PageClient + ?Sized> {
    page: &'a mut P,
    retry: RetryPolicy,
    extractor: FieldExtractor,
    gate: StalenessGate,
    weather_log: LogWriter,
    pm25_log: LogWriter,
}

impl<'a, P: PageClient + ?Sized> Pipeline<'a, P> {
    pub fn new(page: &'a mut P, settings: &Settings) -> Self {
        Self {
            page,
            retry: RetryPolicy::from(&settings.retry),
            extractor: FieldExtractor::new(settings.wait),
            gate: StalenessGate::new(settings.refetch_after),
            weather_log: LogWriter::new(settings.weather_log_path(), weather::schema())
                .with_bom(settings.write_bom),
            pm25_log: LogWriter::new(settings.pm25_log_path(), pm25::schema())
                .with_bom(settings.write_bom),
        }
    }

    pub fn run(&mut self, now: NaiveDateTime) -> Result<CycleSummary, Error> {
        let stamp = format_capture(now);
        let mut first_err: Option<LogError> = None;

        let weather = match self.weather_cycle(&stamp) {
            Ok(outcome) => outcome,
            Err(e) => failed(&self.weather_log, e, &mut first_err),
        };
        logf!("weather: {}", weather);

        let pm25 = match self.pm25_cycle(&stamp, now) {
            Ok(outcome) => outcome,
            Err(e) => failed(&self.pm25_log, e, &mut first_err),
        };
        logf!("pm25: {}", pm25);

        match first_err {
            Some(e) => Err(e.into()),
            None => Ok(CycleSummary { captured_at: stamp, weather, pm25 }),
        }
    }

    /* ---------------- Weather ---------------- */

    pub fn weather_readings(&mut self) -> Vec<Reading> {
        logf!("Scraping {}...", weather::URL);
        if !self.retry.load(&mut *self.page, weather::URL) {
            return weather::FIELDS.iter().map(|f| Reading::error(f.name, None)).collect();
        }
        weather::FIELDS
            .iter()
            .map(|f| {
                let raw = self.extractor.extract(&mut *self.page, f.locators, f.label);
                normalize(f.name, &raw, f.kind)
            })
            .collect()
    }

    fn weather_cycle(&mut self, stamp: &str) -> Result<DatasetOutcome, LogError> {
        let readings = self.weather_readings();
        let _lock = self.weather_log.lock()?;
        self.weather_log.append(&row_cells(stamp, &readings))?;
        Ok(DatasetOutcome::Written { path: self.weather_log.path().to_path_buf(), tally: Tally::of(&readings) })
    }

    /* ---------------- PM2.5 ---------------- */

    /// Value and time readings for one station, named by its log columns.
    pub fn station_readings(&mut self, station: &Station) -> [Reading; 2] {
        let value_col = station.value_column();
        let time_col = station.time_column();

        logf!("Scraping {} PM2.5...", station.label);
        if !self.retry.load(&mut *self.page, &station.url()) {
            return [Reading::error(&value_col, None), Reading::error(&time_col, None)];
        }

        let value_label = format!("{} {}", station.label, VALUE_FIELD.label);
        let value = self.extractor.extract(&mut *self.page, VALUE_FIELD.locators, &value_label);

        let time_label = format!("{} {}", station.label, TIME_FIELD.label);
        let time = self.extractor.extract_preferring(
            &mut *self.page,
            TIME_FIELD.locators,
            &time_label,
            pm25::prefers_local_time,
        );

        [
            normalize(&value_col, &value, VALUE_FIELD.kind),
            normalize(&time_col, &time, TIME_FIELD.kind),
        ]
    }

    fn pm25_cycle(&mut self, stamp: &str, now: NaiveDateTime) -> Result<DatasetOutcome, LogError> {
        let seen = {
            let _lock = self.pm25_log.lock()?;
            self.pm25_log.last_capture()?
        };
        if !self.gate.should_refetch(seen.as_deref(), now) {
            return Ok(DatasetOutcome::Fresh { last_capture: seen.unwrap_or_default() });
        }

        let readings: Vec<Reading> = STATIONS.iter().flat_map(|s| self.station_readings(s)).collect();

        let _lock = self.pm25_log.lock()?;
        // Another writer may have appended while the stations were scraped.
        let latest = self.pm25_log.last_capture()?;
        if latest != seen && !self.gate.should_refetch(latest.as_deref(), now) {
            logw!("pm25 log gained a row at {:?} during this cycle; discarding ours", latest);
            return Ok(DatasetOutcome::Fresh { last_capture: latest.unwrap_or_default() });
        }
        self.pm25_log.append(&row_cells(stamp, &readings))?;
        Ok(DatasetOutcome::Written { path: self.pm25_log.path().to_path_buf(), tally: Tally::of(&readings) })
    }
}

fn row_cells(stamp: &str, readings: &[Reading]) -> Vec<String> {
    let mut row = Vec::with_capacity(readings.len() + 1);
    row.push(s!(stamp));
    row.extend(readings.iter().map(Reading::cell));
    row
}

fn failed(log: &LogWriter, e: LogError, first_err: &mut Option<LogError>) -> DatasetOutcome {
    loge!("{}", e);
    let outcome = DatasetOutcome::Failed { path: log.path().to_path_buf(), reason: e.to_string() };
    first_err.get_or_insert(e);
    outcome
}
