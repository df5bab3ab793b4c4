// src/config/options.rs
use std::path::PathBuf;
use std::time::Duration;

use super::consts::*;
use crate::engine::select::GameSelection;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AppOptions {
    pub scrape: ScrapeOptions,
    pub export: ExportOptions,
    pub fetch: FetchConfig,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScrapeOptions {
    /// Season end year; `None` resolves to the latest season.
    pub season: Option<u16>,
    pub games: GameSelection,
    /// Drop rows from fallback seasons instead of accepting them.
    pub strict_season: bool,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            season: None,
            games: GameSelection::Last(DEFAULT_LAST),
            strict_season: false,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Csv,
    Tsv,
}

impl ExportFormat {
    pub fn ext(&self) -> &'static str {
        match self { ExportFormat::Csv => "csv", ExportFormat::Tsv => "tsv" }
    }
    pub fn delim(&self) -> u8 {
        match self { ExportFormat::Csv => b',', ExportFormat::Tsv => b'\t' }
    }
}

/// What goes in the header line of an export.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HeaderStyle {
    /// Stable machine keys (`data-stat`), e.g. `pts`.
    #[default]
    Key,
    /// Display labels as shown on the site, e.g. `PTS`.
    Label,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportOptions {
    pub format: ExportFormat,
    pub header_style: HeaderStyle,
    /// Directory for per-player files.
    pub out_dir: PathBuf,
    /// When set, all players go into this single file.
    pub combined: Option<PathBuf>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: ExportFormat::Csv,
            header_style: HeaderStyle::Key,
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            combined: None,
        }
    }
}

/// Everything the HTTP fetcher needs, handed over at construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchConfig {
    pub base_url: String,
    pub user_agent: String,
    pub timeout: Duration,
    pub pause: Duration,
    pub max_retries: u32,
    pub backoff_base: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: s!(BASE_URL),
            user_agent: s!(USER_AGENT),
            timeout: Duration::from_secs(TIMEOUT_SECS),
            pause: Duration::from_millis(REQUEST_PAUSE_MS),
            max_retries: MAX_RETRIES,
            backoff_base: Duration::from_millis(BACKOFF_BASE_MS),
        }
    }
}
