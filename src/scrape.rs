// src/scrape.rs
use std::{collections::HashSet, fs, path::Path};

use tracing::{info, warn};

use crate::{
    config::options::ScrapeOptions,
    core::net::Fetch,
    engine::SelectionPolicy,
    error::{Result, ScrapeError},
    progress::Progress,
    specs::{game_log, leagues, per_game},
    store::{self, Merged, RecordSet},
};

/// One player's selected game-log rows.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerSet {
    pub player_id: String,
    /// Season the rows came from; may predate the requested one.
    pub season: u16,
    pub set: RecordSet,
}

/// Outcome of a multi-player scrape. Successes keep input order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub sets: Vec<PlayerSet>,
    pub failures: Vec<(String, ScrapeError)>,
}

impl BatchReport {
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// All players in one record set, player blocks in input order.
    pub fn combined(&self) -> Merged {
        store::merge(self.sets.iter().map(|p| p.set.clone()))
    }
}

/// Explicit season, or the newest one with published stats.
pub fn resolve_season<F: Fetch>(fetcher: &mut F, requested: Option<u16>) -> Result<u16> {
    match requested {
        Some(season) => Ok(season),
        None => leagues::detect_latest_season(fetcher),
    }
}

pub fn collect_per_game<F: Fetch>(fetcher: &mut F, season: u16) -> Result<RecordSet> {
    let set = per_game::fetch(fetcher, season)?;
    info!(season, players = set.len(), "per-game stats collected");
    Ok(set)
}

/// Game logs for each id in order. A failing player is recorded and skipped;
/// the batch itself only fails when there is nobody to scrape.
pub fn collect_game_logs<F: Fetch>(
    fetcher: &mut F,
    ids: &[String],
    scrape: &ScrapeOptions,
    season: u16,
    mut progress: Option<&mut dyn Progress>,
) -> Result<BatchReport> {
    if ids.is_empty() {
        return Err(ScrapeError::NoPlayers);
    }

    let policy = SelectionPolicy {
        games: scrape.games,
        season: scrape.strict_season.then_some(season),
    };

    if let Some(p) = progress.as_deref_mut() {
        p.begin(ids.len());
        p.log(&format!("Fetching game logs for season {season}…"));
    }

    let mut report = BatchReport::default();
    for id in ids {
        match game_log::fetch(fetcher, id, season, !scrape.strict_season) {
            Ok(log) => {
                let mut set = log.set;
                set.rows = policy.apply(set.rows);
                info!(player_id = %id, season = log.season, games = set.len(), "game log collected");
                if let Some(p) = progress.as_deref_mut() {
                    p.item_done(id);
                }
                report.sets.push(PlayerSet { player_id: id.clone(), season: log.season, set });
            }
            Err(e) => {
                warn!(player_id = %id, error = %e, "skipping player");
                if let Some(p) = progress.as_deref_mut() {
                    p.item_failed(id, &e.to_string());
                }
                report.failures.push((id.clone(), e));
            }
        }
    }

    if let Some(p) = progress.as_deref_mut() {
        p.finish();
    }
    Ok(report)
}

/// One id per line; blank lines and `#` comments are ignored.
pub fn read_player_ids(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(String::from)
        .collect()
}

/// Positional ids, then the file's, first occurrence wins.
pub fn load_player_ids(args: &[String], input_file: Option<&Path>) -> Result<Vec<String>> {
    let from_file = match input_file {
        Some(path) => read_player_ids(&fs::read_to_string(path)?),
        None => Vec::new(),
    };
    let mut seen = HashSet::new();
    let ids: Vec<String> = args
        .iter()
        .map(|s| s.trim().to_string())
        .chain(from_file)
        .filter(|id| !id.is_empty() && seen.insert(id.clone()))
        .collect();
    if ids.is_empty() {
        return Err(ScrapeError::NoPlayers);
    }
    Ok(ids)
}
