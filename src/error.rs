// src/error.rs
use std::io;

use thiserror::Error;

pub type Result<T, E = ScrapeError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ScrapeError {
    /// The table id appears nowhere on the page, comments included.
    #[error("table '{table_id}' was not found on the page")]
    TableNotFound { table_id: String },

    #[error("table '{table_id}' is malformed: {reason}")]
    MalformedTable { table_id: String, reason: String },

    #[error("table '{table_id}' did not contain any rows")]
    EmptyTable { table_id: String },

    /// Cell-level and non-fatal: the row is kept with a missing value.
    #[error("column '{column}' expected {expected}, found {raw:?}")]
    UnparsableValue {
        column: String,
        expected: &'static str,
        raw: String,
    },

    /// Informational: merged inputs did not share one column set.
    #[error("column sets diverge across {sources} inputs; {added} column(s) filled by union")]
    ColumnMismatch { sources: usize, added: usize },

    #[error("network error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("could not detect season: {0}")]
    SeasonNotFound(String),

    #[error("no player ids provided")]
    NoPlayers,

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl ScrapeError {
    pub fn malformed(table_id: &str, reason: impl Into<String>) -> Self {
        ScrapeError::MalformedTable {
            table_id: s!(table_id),
            reason: reason.into(),
        }
    }

    /// Network-side failures (as opposed to page content failures).
    pub fn is_network(&self) -> bool {
        matches!(self, ScrapeError::Http(_) | ScrapeError::Status { .. })
    }
}
