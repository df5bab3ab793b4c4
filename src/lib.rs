// src/lib.rs
//! Basketball Reference scraper: season per-game stats and player game logs
//! pulled out of HTML tables (commented-out ones included) into CSV-ready
//! record sets.

#[macro_use]
pub mod macros;

pub mod error;
pub mod config;
pub mod core;
pub mod engine;
pub mod specs;

pub mod store;
pub mod file;
pub mod progress;
pub mod scrape;

#[cfg(feature = "cli")]
pub mod cli;
#[cfg(feature = "cli")]
pub mod log;

pub use error::{Result, ScrapeError};
