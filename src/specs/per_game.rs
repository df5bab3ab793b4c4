// src/specs/per_game.rs
//! `/leagues/NBA_{season}_per_game.html`, table `per_game_stats`.

use crate::config::consts::PER_GAME_TABLE;
use crate::core::net::Fetch;
use crate::engine::PER_GAME_SCHEMA;
use crate::error::Result;
use crate::store::RecordSet;

pub fn path(season: u16) -> String {
    format!("/leagues/NBA_{season}_per_game.html")
}

/// Rows are tagged with `season` and a player id: the row's
/// `data-append-csv` when present, else the player's name.
pub fn parse(doc: &str, season: u16) -> Result<RecordSet> {
    let mut set = super::read_table(doc, &[PER_GAME_TABLE], &PER_GAME_SCHEMA)?;
    for row in &mut set.rows {
        row.season = Some(season);
        if row.player_id.is_none() {
            row.player_id = ["player", "name_display"]
                .iter()
                .find_map(|k| row.get(k).as_text())
                .map(str::to_string);
        }
    }
    Ok(set)
}

pub fn fetch<F: Fetch>(fetcher: &mut F, season: u16) -> Result<RecordSet> {
    let doc = fetcher.fetch(&path(season))?;
    parse(&doc, season)
}
