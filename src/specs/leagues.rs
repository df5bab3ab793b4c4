// src/specs/leagues.rs
//! Latest-season detection from `/leagues/`.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info};

use crate::config::consts::{LEAGUES_TABLE, SEASON_WALK_BACK};
use crate::core::net::Fetch;
use crate::engine::{TableSchema, Value};
use crate::error::{Result, ScrapeError};

pub const PATH: &str = "/leagues/";

static SEASON_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/leagues/NBA_(\d{4})\.html").expect("valid regex"));

/// Every column is text here; labels are parsed by hand.
const LEAGUES_SCHEMA: TableSchema = TableSchema { name: LEAGUES_TABLE, columns: &[] };

/// `"2023-24"` → 2024, `"1999-00"` → 2000, `"2024"` → 2024.
pub fn season_end_year(label: &str) -> Option<u16> {
    let label = label.trim();
    match label.split_once('-') {
        Some((left, right)) => {
            let start: u16 = left.trim().parse().ok()?;
            let suffix: u16 = right.trim().parse().ok()?;
            let mut end = start / 100 * 100 + suffix;
            if end < start {
                end += 100;
            }
            Some(end)
        }
        None => label.parse().ok(),
    }
}

/// Season candidates on the leagues index, unordered and deduplicated.
/// Season page links are preferred; the `leagues_active` table is the fallback.
pub fn season_candidates(doc: &str) -> Result<BTreeSet<u16>> {
    let linked: BTreeSet<u16> = SEASON_LINK
        .captures_iter(doc)
        .filter_map(|c| c[1].parse().ok())
        .collect();
    if !linked.is_empty() {
        debug!(count = linked.len(), "season links on leagues index");
        return Ok(linked);
    }

    let set = super::read_table(doc, &[LEAGUES_TABLE], &LEAGUES_SCHEMA)?;
    let first_label = set.rows.iter().find_map(|row| {
        row.cells.values().next().and_then(Value::as_text).and_then(season_end_year)
    });
    Ok(first_label.into_iter().collect())
}

/// Newest season whose per-game table is actually published.
///
/// Candidates are probed newest first, then up to five more years back from
/// the newest one. Network errors abort; missing tables move on.
pub fn detect_latest_season<F: Fetch>(fetcher: &mut F) -> Result<u16> {
    let doc = fetcher.fetch(PATH)?;
    let candidates = season_candidates(&doc)?;
    let Some(&newest) = candidates.last() else {
        return Err(ScrapeError::SeasonNotFound(s!("no seasons listed on the leagues index")));
    };

    let walk_back = (1..=SEASON_WALK_BACK)
        .filter_map(|d| newest.checked_sub(d))
        .filter(|y| !candidates.contains(y));
    for year in candidates.iter().rev().copied().chain(walk_back) {
        match super::per_game::fetch(&mut *fetcher, year) {
            Ok(_) => {
                info!(season = year, "latest season");
                return Ok(year);
            }
            Err(e) if e.is_network() && !matches!(e, ScrapeError::Status { status: 404, .. }) => return Err(e),
            Err(e) => debug!(season = year, error = %e, "season not usable"),
        }
    }
    Err(ScrapeError::SeasonNotFound(format!(
        "no per-game table for {newest} or the {SEASON_WALK_BACK} seasons before it"
    )))
}
