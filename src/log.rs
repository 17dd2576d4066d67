// src/log.rs
use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::{Mutex, OnceLock};

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static INIT: OnceLock<()> = OnceLock::new();

/// Install the global subscriber: stderr for operators, plus an append-only
/// debug file for unattended runs. Calling it again is a no-op.
///
/// If the debug file cannot be opened, logging continues on stderr only.
pub fn init(debug_file: Option<&Path>) {
    INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        let file_layer = debug_file.and_then(|p| {
            if let Some(parent) = p.parent() {
                fs::create_dir_all(parent).ok()?;
            }
            let file = OpenOptions::new().create(true).append(true).open(p).ok()?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(false)
                    .with_writer(Mutex::new(file))
                    .with_filter(EnvFilter::new("debug")),
            )
        });

        let _ = tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(false).with_filter(filter))
            .with(file_layer)
            .try_init();
    });
}

/// Info-level logging
#[macro_export]
macro_rules! logf {
    ($($arg:tt)*) => {
        ::tracing::info!($($arg)*)
    };
}

/// Debug-level logging
#[macro_export]
macro_rules! logd {
    ($($arg:tt)*) => {
        ::tracing::debug!($($arg)*)
    };
}

/// Warn-level logging
#[macro_export]
macro_rules! logw {
    ($($arg:tt)*) => {
        ::tracing::warn!($($arg)*)
    };
}

/// Error-level logging
#[macro_export]
macro_rules! loge {
    ($($arg:tt)*) => {
        ::tracing::error!($($arg)*)
    };
}
