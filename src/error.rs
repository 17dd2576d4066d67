// src/error.rs
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures of the page client capability.
#[derive(Debug, Error)]
pub enum PageError {
    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("timed out after {secs}s waiting for {locator}")]
    Timeout { locator: String, secs: u64 },

    #[error("no page loaded")]
    NoPage,

    #[error("bad locator {locator}: {reason}")]
    Locator { locator: String, reason: String },

    #[error("could not start page client: {0}")]
    Client(String),
}

/// Failures of the append-only logs.
#[derive(Debug, Error)]
pub enum LogError {
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{path}: header {found:?} does not match schema {expected:?}")]
    HeaderMismatch {
        path: PathBuf,
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("row has {got} values, header has {want}")]
    Arity { want: usize, got: usize },

    #[error("{path} is locked by another writer")]
    Locked { path: PathBuf },
}

impl LogError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        LogError::Io { path: path.into(), source }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },

    #[error("unknown time zone {0:?}")]
    TimeZone(String),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Page(#[from] PageError),

    #[error(transparent)]
    Log(#[from] LogError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
