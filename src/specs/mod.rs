// src/specs/mod.rs
//! # Page specs
//!
//! One module per page kind. Each knows **which path to fetch** and **which
//! table ids hold the data**, and shapes the result into a `store::RecordSet`.
//! The table reading itself (locate, extract, normalize) is shared and lives
//! in `core::html` and `engine`.
//!
//! ## What does **not** live here
//! - Batch control, failure collection, season resolution order: `scrape`.
//! - Files and formats: `file`.
//!
//! ## Typical call chain
//! ```text
//! cli → scrape::collect_* → specs::<page>::fetch(fetcher, ..)
//!                               ↘ Fetch::fetch(path) → parse(doc, ..) → RecordSet
//! ```
//!
//! ## Conventions
//! - `parse` functions are pure over a document string so they can be tested
//!   against saved pages; `fetch` functions only add the request.
//!
//! ## Current specs
//! - `per_game` – season per-game stats for every player.
//! - `game_log` – one player's regular-season game log, with season fallback.
//! - `leagues` – latest-season detection.
//! - `search` – player id lookup by name.

use tracing::{debug, info};

use crate::core::html::locate_any;
use crate::engine::{TableSchema, extract_rows, normalize_rows};
use crate::error::{Result, ScrapeError};
use crate::store::RecordSet;

pub mod per_game;
pub mod game_log;
pub mod leagues;
pub mod search;

/// Read the first of `ids` that is present and has rows; extract and type it.
/// A present table that is empty or broken hands over to the next id.
pub(crate) fn read_table(doc: &str, ids: &[&str], schema: &TableSchema) -> Result<RecordSet> {
    let mut rest = ids;
    let mut last_err = None;
    while !rest.is_empty() {
        let (table_id, fragment) = match locate_any(doc, rest) {
            Ok(found) => found,
            Err(e @ ScrapeError::TableNotFound { .. }) => return Err(last_err.unwrap_or(e)),
            Err(e) => return Err(e),
        };
        let next = rest.iter().position(|&id| id == table_id).map_or(rest.len(), |i| i + 1);
        rest = &rest[next..];

        let extracted = match extract_rows(table_id, &fragment) {
            Ok(extracted) => extracted,
            Err(e @ (ScrapeError::EmptyTable { .. } | ScrapeError::MalformedTable { .. })) => {
                debug!(table_id, error = %e, "table unusable, trying next id");
                last_err = Some(e);
                continue;
            }
            Err(e) => return Err(e),
        };
        debug!(table_id, commented = fragment.commented, skipped = extracted.skipped, "table read");

        let normalized = normalize_rows(extracted.rows, schema);
        if !normalized.issues.is_empty() {
            info!(table_id, cells = normalized.issues.len(), "unparsable cells kept as missing");
        }
        return Ok(RecordSet::new(extracted.columns, normalized.rows));
    }
    Err(last_err.unwrap_or_else(|| ScrapeError::TableNotFound { table_id: ids.join("|") }))
}
