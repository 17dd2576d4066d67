// src/config/options.rs
use std::path::PathBuf;
use std::time::Duration;

use chrono_tz::Tz;

use super::consts::*;
use crate::error::ConfigError;

/// Runtime knobs for one polling cycle.
///
/// Defaults come from `consts`; every field can be overridden through an
/// `AIRLOG_*` environment variable (see [`Settings::from_env`]).
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub out_dir: PathBuf,
    pub weather_log: String,
    pub pm25_log: String,
    pub timezone: Tz,
    pub retry: RetryOptions,
    pub wait: Duration,
    pub poll: Duration,
    pub refetch_after: chrono::Duration,
    pub user_agent: String,
    pub write_bom: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryOptions {
    pub attempts: u32,
    pub delay: Duration,
}

impl Default for RetryOptions {
    fn default() -> Self {
        Self {
            attempts: RETRIES,
            delay: Duration::from_secs(RETRY_DELAY_SECS),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            weather_log: s!(WEATHER_LOG),
            pm25_log: s!(PM25_LOG),
            timezone: chrono_tz::Asia::Ulaanbaatar,
            retry: RetryOptions::default(),
            wait: Duration::from_secs(WAIT_SECS),
            poll: Duration::from_millis(POLL_MS),
            refetch_after: chrono::Duration::minutes(REFETCH_MINS),
            user_agent: s!(USER_AGENT),
            write_bom: WRITE_BOM,
        }
    }
}

impl Settings {
    /// Load from the process environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup. Unset keys keep their default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut s = Self::default();

        if let Some(v) = lookup("AIRLOG_OUT_DIR") {
            s.out_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("AIRLOG_TZ") {
            s.timezone = v
                .trim()
                .parse::<Tz>()
                .map_err(|_| ConfigError::TimeZone(v.clone()))?;
        }
        if let Some(n) = parse_num::<u32>(&lookup, "AIRLOG_RETRIES")? {
            s.retry.attempts = n.max(1);
        }
        if let Some(n) = parse_num::<u64>(&lookup, "AIRLOG_RETRY_DELAY_SECS")? {
            s.retry.delay = Duration::from_secs(n);
        }
        if let Some(n) = parse_num::<u64>(&lookup, "AIRLOG_WAIT_SECS")? {
            s.wait = Duration::from_secs(n);
        }
        if let Some(n) = parse_num::<u64>(&lookup, "AIRLOG_POLL_MS")? {
            s.poll = Duration::from_millis(n);
        }
        if let Some(n) = parse_num::<i64>(&lookup, "AIRLOG_REFETCH_MINS")? {
            s.refetch_after = chrono::Duration::minutes(n);
        }
        if let Some(v) = lookup("AIRLOG_USER_AGENT") {
            s.user_agent = v;
        }
        if let Some(v) = lookup("AIRLOG_BOM") {
            s.write_bom = match v.trim() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                _ => return Err(ConfigError::Invalid { key: "AIRLOG_BOM", value: v }),
            };
        }
        Ok(s)
    }

    pub fn weather_log_path(&self) -> PathBuf {
        self.out_dir.join(&self.weather_log)
    }

    pub fn pm25_log_path(&self) -> PathBuf {
        self.out_dir.join(&self.pm25_log)
    }

    pub fn debug_log_path(&self) -> PathBuf {
        self.out_dir.join(STORE_DIR).join(DEBUG_LOG)
    }
}

fn parse_num<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError> {
    match lookup(key) {
        None => Ok(None),
        Some(v) => v
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { key, value: v }),
    }
}
