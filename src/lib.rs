// src/lib.rs

#[macro_use]
pub mod macros;
#[macro_use]
pub mod log;

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod page;
pub mod specs;

pub mod csv;
pub mod extract;
pub mod file;
pub mod normalize;
pub mod retrieval;
pub mod scrape;
pub mod staleness;
pub mod store;

pub use error::{Error, Result};
