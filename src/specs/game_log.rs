// src/specs/game_log.rs
//! `/players/{letter}/{id}/gamelog/{season}`: one player's regular season.
//!
//! The page has used two table ids over the years (`pgl_basic`, then
//! `player_game_log_reg`); both are tried. Logs for a season that has only
//! just started are often not up yet, so `fetch` walks back a few seasons.

use tracing::{debug, info};

use crate::config::consts::{GAME_LOG_FALLBACK_SEASONS, GAME_LOG_OLDEST_FALLBACK, GAME_LOG_TABLES};
use crate::core::net::Fetch;
use crate::engine::{Column, GAME_LOG_SCHEMA, Value};
use crate::error::{Result, ScrapeError};
use crate::store::RecordSet;

pub const PLAYER_ID_KEY: &str = "player_id";
pub const PLAYER_ID_LABEL: &str = "PlayerID";

#[derive(Clone, Debug, PartialEq)]
pub struct GameLog {
    /// Season the log was actually found for.
    pub season: u16,
    pub set: RecordSet,
}

pub fn path(player_id: &str, season: u16) -> String {
    let letter = player_id.get(..1).unwrap_or_default().to_ascii_lowercase();
    format!("/players/{letter}/{player_id}/gamelog/{season}")
}

/// Every row gets `player_id` and `season`, plus a leading `player_id` column.
pub fn parse(doc: &str, player_id: &str, season: u16) -> Result<RecordSet> {
    let mut set = super::read_table(doc, GAME_LOG_TABLES, &GAME_LOG_SCHEMA)?;
    for row in &mut set.rows {
        row.player_id = Some(s!(player_id));
        row.season = Some(season);
    }
    set.prepend_constant(Column::new(PLAYER_ID_KEY, PLAYER_ID_LABEL), Value::Text(s!(player_id)));
    Ok(set)
}

/// Requested season first, then up to four earlier ones (never 2000 or before).
pub fn candidate_seasons(season: u16) -> Vec<u16> {
    std::iter::once(season)
        .chain(
            (1..=GAME_LOG_FALLBACK_SEASONS)
                .map(|d| season.saturating_sub(d))
                .filter(|&y| y > GAME_LOG_OLDEST_FALLBACK),
        )
        .collect()
}

/// Failures that mean "no log for this season" rather than "broken page".
fn season_unavailable(e: &ScrapeError) -> bool {
    matches!(
        e,
        ScrapeError::TableNotFound { .. }
            | ScrapeError::EmptyTable { .. }
            | ScrapeError::Status { status: 404, .. }
    )
}

/// Fetch the log for `season`; with `fallback`, try earlier seasons too.
pub fn fetch<F: Fetch>(fetcher: &mut F, player_id: &str, season: u16, fallback: bool) -> Result<GameLog> {
    let seasons = if fallback { candidate_seasons(season) } else { vec![season] };
    let mut last_err = None;
    for year in seasons {
        let attempt = fetcher
            .fetch(&path(player_id, year))
            .and_then(|doc| parse(&doc, player_id, year));
        match attempt {
            Ok(set) => {
                if year != season {
                    info!(player_id, requested = season, found = year, "no game log for requested season; using earlier one");
                }
                return Ok(GameLog { season: year, set });
            }
            Err(e) if season_unavailable(&e) => {
                debug!(player_id, season = year, error = %e, "no game log");
                last_err = Some(e);
            }
            Err(e) => return Err(e),
        }
    }
    Err(last_err.unwrap_or_else(|| ScrapeError::TableNotFound { table_id: GAME_LOG_TABLES.join("|") }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths() {
        assert_eq!(path("jamesle01", 2024), "/players/j/jamesle01/gamelog/2024");
        assert_eq!(path("", 2024), "/players//gamelog/2024");
    }

    #[test]
    fn fallback_stays_above_2000() {
        assert_eq!(candidate_seasons(2025), [2025, 2024, 2023, 2022, 2021]);
        assert_eq!(candidate_seasons(2003), [2003, 2002, 2001]);
        assert_eq!(candidate_seasons(1998), [1998]);
    }

    #[test]
    fn empty_first_table_hands_over_to_the_next_id() {
        let doc = r#"<table id="pgl_basic">
          <thead><tr><th data-stat="date_game">Date</th><th data-stat="pts">PTS</th></tr></thead>
          <tbody></tbody>
        </table>
        <table id="player_game_log_reg">
          <thead><tr><th data-stat="date">Date</th><th data-stat="pts">PTS</th></tr></thead>
          <tbody><tr><td>2024-10-22</td><td>16</td></tr></tbody>
        </table>"#;
        let set = parse(doc, "jamesle01", 2025).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.rows[0].get("pts").as_i64(), Some(16));

        let both_empty = doc.replace("<tr><td>2024-10-22</td><td>16</td></tr>", "");
        assert!(matches!(
            parse(&both_empty, "jamesle01", 2025),
            Err(ScrapeError::EmptyTable { table_id }) if table_id == "player_game_log_reg"
        ));
    }

    #[test]
    fn new_layout_table_id() {
        let doc = r#"<table id="player_game_log_reg">
          <thead><tr><th data-stat="date">Date</th><th data-stat="opp_name_abbr">Opp</th><th data-stat="pts">PTS</th></tr></thead>
          <tbody><tr><td>2024-10-22</td><td>MIN</td><td>16</td></tr></tbody>
        </table>"#;
        let set = parse(doc, "jamesle01", 2025).unwrap();
        let keys: Vec<&str> = set.keys().collect();
        assert_eq!(keys, ["player_id", "date", "opp_name_abbr", "pts"]);
        assert_eq!(set.rows[0].get("player_id"), &Value::Text(s!("jamesle01")));
        assert_eq!(set.rows[0].get("pts"), &Value::Int(16));
        assert_eq!(set.rows[0].season, Some(2025));
    }

    #[test]
    fn unavailable_kinds() {
        assert!(season_unavailable(&ScrapeError::TableNotFound { table_id: s!("pgl_basic") }));
        assert!(season_unavailable(&ScrapeError::Status { url: s!("u"), status: 404 }));
        assert!(!season_unavailable(&ScrapeError::Status { url: s!("u"), status: 503 }));
        assert!(!season_unavailable(&ScrapeError::malformed("pgl_basic", "x")));
    }
}
