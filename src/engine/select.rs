// src/engine/select.rs
use super::types::TypedRow;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameSelection {
    /// Most recent N rows (document order is chronological).
    Last(usize),
    All,
}

impl GameSelection {
    /// File-name label: `last15` / `all`.
    pub fn label(&self) -> String {
        match self {
            GameSelection::Last(n) => format!("last{n}"),
            GameSelection::All => s!("all"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SelectionPolicy {
    pub games: GameSelection,
    /// Keep only rows from this season, before truncation.
    pub season: Option<u16>,
}

impl SelectionPolicy {
    pub fn all() -> Self {
        Self { games: GameSelection::All, season: None }
    }

    pub fn last(n: usize) -> Self {
        Self { games: GameSelection::Last(n), season: None }
    }

    pub fn in_season(mut self, season: u16) -> Self {
        self.season = Some(season);
        self
    }

    pub fn apply(&self, mut rows: Vec<TypedRow>) -> Vec<TypedRow> {
        if let Some(season) = self.season {
            rows.retain(|r| r.season == Some(season));
        }
        match self.games {
            GameSelection::All => rows,
            GameSelection::Last(n) => last_n(rows, n),
        }
    }
}

/// The final `n` items, in their original order. Short input comes back whole.
pub fn last_n<T>(mut items: Vec<T>, n: usize) -> Vec<T> {
    let start = items.len().saturating_sub(n);
    items.drain(..start);
    items
}
