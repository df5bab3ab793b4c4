// src/engine/schema.rs
//! Canonical column types per table kind.
//!
//! Keys are the site's `data-stat` values. The site renamed most of them in
//! its 2024 redesign, so both generations are listed; aliases cover tables
//! whose headers carry only display labels. Anything not listed is text.

use super::types::ColumnType::{self, Decimal, Int, Text};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColumnSpec {
    pub key: &'static str,
    pub aliases: &'static [&'static str],
    pub ty: ColumnType,
}

const fn col(key: &'static str, aliases: &'static [&'static str], ty: ColumnType) -> ColumnSpec {
    ColumnSpec { key, aliases, ty }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TableSchema {
    pub name: &'static str,
    pub columns: &'static [ColumnSpec],
}

impl TableSchema {
    /// Case-insensitive lookup on key, then aliases. Unknown → `Text`.
    pub fn type_of(&self, key: &str) -> ColumnType {
        self.columns
            .iter()
            .find(|c| c.key.eq_ignore_ascii_case(key))
            .or_else(|| {
                self.columns
                    .iter()
                    .find(|c| c.aliases.iter().any(|a| a.eq_ignore_ascii_case(key)))
            })
            .map_or(Text, |c| c.ty)
    }
}

pub const PER_GAME_SCHEMA: TableSchema = TableSchema {
    name: "per_game_stats",
    columns: &[
        col("ranker", &["Rk"], Int),
        col("player", &["name_display"], Text),
        col("age", &[], Int),
        col("team_id", &["team_name_abbr", "Tm", "Team"], Text),
        col("pos", &[], Text),
        col("g", &["games"], Int),
        col("gs", &["games_started"], Int),
        col("mp_per_g", &["MP"], Decimal),
        col("fg_per_g", &["FG"], Decimal),
        col("fga_per_g", &["FGA"], Decimal),
        col("fg_pct", &["FG%"], Decimal),
        col("fg3_per_g", &["3P"], Decimal),
        col("fg3a_per_g", &["3PA"], Decimal),
        col("fg3_pct", &["3P%"], Decimal),
        col("fg2_per_g", &["2P"], Decimal),
        col("fg2a_per_g", &["2PA"], Decimal),
        col("fg2_pct", &["2P%"], Decimal),
        col("efg_pct", &["eFG%"], Decimal),
        col("ft_per_g", &["FT"], Decimal),
        col("fta_per_g", &["FTA"], Decimal),
        col("ft_pct", &["FT%"], Decimal),
        col("orb_per_g", &["ORB"], Decimal),
        col("drb_per_g", &["DRB"], Decimal),
        col("trb_per_g", &["TRB"], Decimal),
        col("ast_per_g", &["AST"], Decimal),
        col("stl_per_g", &["STL"], Decimal),
        col("blk_per_g", &["BLK"], Decimal),
        col("tov_per_g", &["TOV"], Decimal),
        col("pf_per_g", &["PF"], Decimal),
        col("pts_per_g", &["PTS"], Decimal),
        col("awards", &[], Text),
    ],
};

pub const GAME_LOG_SCHEMA: TableSchema = TableSchema {
    name: "game_log",
    columns: &[
        col("ranker", &["Rk"], Int),
        col("game_season", &["G", "team_game_num_season"], Int),
        col("player_game_num_career", &["Gcar"], Int),
        col("date_game", &["date", "Date"], Text),
        // "39-004": years-days
        col("age", &[], Text),
        col("team_id", &["team_name_abbr", "Tm", "Team"], Text),
        col("game_location", &[], Text),
        col("opp_id", &["opp_name_abbr", "Opp"], Text),
        col("game_result", &["Result"], Text),
        col("gs", &["GS"], Int),
        col("is_starter", &[], Text),
        // "34:12"
        col("mp", &["MP"], Text),
        col("fg", &["FG"], Int),
        col("fga", &["FGA"], Int),
        col("fg_pct", &["FG%"], Decimal),
        col("fg3", &["3P"], Int),
        col("fg3a", &["3PA"], Int),
        col("fg3_pct", &["3P%"], Decimal),
        col("fg2", &["2P"], Int),
        col("fg2a", &["2PA"], Int),
        col("fg2_pct", &["2P%"], Decimal),
        col("efg_pct", &["eFG%"], Decimal),
        col("ft", &["FT"], Int),
        col("fta", &["FTA"], Int),
        col("ft_pct", &["FT%"], Decimal),
        col("orb", &["ORB"], Int),
        col("drb", &["DRB"], Int),
        col("trb", &["TRB"], Int),
        col("ast", &["AST"], Int),
        col("stl", &["STL"], Int),
        col("blk", &["BLK"], Int),
        col("tov", &["TOV"], Int),
        col("pf", &["PF"], Int),
        col("pts", &["PTS"], Int),
        col("game_score", &["GmSc"], Decimal),
        col("plus_minus", &["+/-"], Int),
    ],
};
