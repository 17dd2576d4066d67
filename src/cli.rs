// src/cli.rs
//! The scheduled entry point. No flags: everything tunable comes from
//! `AIRLOG_*` environment variables (see [`Settings::from_env`]).

use crate::config::Settings;
use crate::core::HttpPage;
use crate::error::Error;
use crate::page::Session;
use crate::scrape::{self, CycleSummary};

/// One full cycle: settings, logging, page session, pipeline.
///
/// The page session is closed before any error reaches the caller.
pub fn run() -> Result<CycleSummary, Error> {
    let settings = Settings::from_env()?;
    crate::log::init(Some(settings.debug_log_path().as_path()));
    logd!("settings: {:?}", settings);

    let now = scrape::capture_time(settings.timezone);
    let summary = {
        let mut page = Session::new(HttpPage::new(&settings)?);
        scrape::run_cycle(&mut *page, &settings, now)?
    };

    logf!("cycle {} done", summary.captured_at);
    Ok(summary)
}
