// src/store.rs
//! Record sets: typed rows plus the one column list they are exported under.

use std::collections::HashSet;

use tracing::info;

use crate::config::options::HeaderStyle;
use crate::engine::types::{Column, TypedRow, Value};
use crate::error::ScrapeError;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecordSet {
    pub columns: Vec<Column>,
    pub rows: Vec<TypedRow>,
}

impl RecordSet {
    pub fn new(columns: Vec<Column>, rows: Vec<TypedRow>) -> Self {
        Self { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.key.as_str())
    }

    pub fn header(&self, style: HeaderStyle) -> Vec<&str> {
        self.columns
            .iter()
            .map(|c| match style {
                HeaderStyle::Key => c.key.as_str(),
                // unlabelled columns (e.g. home/away marker) fall back to the key
                HeaderStyle::Label if c.label.is_empty() => c.key.as_str(),
                HeaderStyle::Label => c.label.as_str(),
            })
            .collect()
    }

    /// Rows as values in column order; absent cells read as missing.
    pub fn records(&self) -> impl Iterator<Item = Vec<&Value>> {
        self.rows
            .iter()
            .map(|row| self.columns.iter().map(|c| row.get(&c.key)).collect())
    }

    /// Put a constant column first, e.g. the player id on game-log rows.
    pub fn prepend_constant(&mut self, column: Column, value: Value) {
        if self.columns.iter().any(|c| c.key == column.key) {
            return;
        }
        for row in &mut self.rows {
            row.cells.shift_insert(0, column.key.clone(), value.clone());
        }
        self.columns.insert(0, column);
    }
}

pub struct Merged {
    pub set: RecordSet,
    /// `ColumnMismatch` notice when the inputs disagreed on columns.
    pub mismatch: Option<ScrapeError>,
}

/// Combine record sets into one. Each input's rows stay contiguous and in
/// input order; columns are the union in first-seen order.
pub fn merge<I>(sets: I) -> Merged
where
    I: IntoIterator<Item = RecordSet>,
{
    let sets: Vec<RecordSet> = sets.into_iter().collect();
    let columns = union_columns(&sets);

    // every union column absent from at least one input
    let padded = columns
        .iter()
        .filter(|c| sets.iter().any(|s| !s.columns.iter().any(|sc| sc.key == c.key)))
        .count();
    let mismatch = (padded > 0).then(|| ScrapeError::ColumnMismatch {
        sources: sets.len(),
        added: padded,
    });
    if let Some(m) = &mismatch {
        info!("{m}");
    }

    let rows = sets.into_iter().flat_map(|s| s.rows).collect();
    Merged { set: RecordSet { columns, rows }, mismatch }
}

/// Ordered union by key; the first input to name a column supplies its label.
pub fn union_columns(sets: &[RecordSet]) -> Vec<Column> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut out = Vec::new();
    for col in sets.iter().flat_map(|s| s.columns.iter()) {
        if seen.insert(col.key.as_str()) {
            out.push(col.clone());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(player: &str, keys: &[&str], n: usize) -> RecordSet {
        let columns = keys.iter().map(|k| Column::new(*k, k.to_uppercase())).collect();
        let rows = (0..n)
            .map(|i| {
                let mut row = TypedRow { player_id: Some(s!(player)), ..TypedRow::default() };
                for k in keys {
                    row.cells.insert(s!(*k), Value::Int(i as i64));
                }
                row
            })
            .collect();
        RecordSet::new(columns, rows)
    }

    fn keys(s: &RecordSet) -> Vec<&str> {
        s.keys().collect()
    }

    #[test]
    fn union_follows_first_seen_order() {
        let a = set("a", &["x", "y"], 1);
        let b = set("b", &["y", "z"], 1);
        assert_eq!(keys(&merge([a.clone(), b.clone()]).set), ["x", "y", "z"]);
        assert_eq!(keys(&merge([b, a]).set), ["y", "z", "x"]);
    }

    #[test]
    fn merging_one_set_is_identity() {
        let a = set("a", &["x", "y"], 3);
        let merged = merge([a.clone()]);
        assert_eq!(merged.set, a);
        assert!(merged.mismatch.is_none());
    }

    #[test]
    fn player_rows_stay_grouped_in_input_order() {
        let merged = merge([set("b", &["x"], 2), set("a", &["x"], 3)]).set;
        let ids: Vec<&str> = merged.rows.iter().filter_map(|r| r.player_id.as_deref()).collect();
        assert_eq!(ids, ["b", "b", "a", "a", "a"]);
    }

    #[test]
    fn diverging_columns_pad_with_missing_and_report() {
        let merged = merge([set("a", &["x", "y"], 1), set("b", &["y", "z"], 1)]);
        assert!(matches!(
            merged.mismatch,
            Some(ScrapeError::ColumnMismatch { sources: 2, added: 2 })
        ));
        let recs: Vec<Vec<&Value>> = merged.set.records().collect();
        assert_eq!(recs[0], [&Value::Int(0), &Value::Int(0), &Value::Missing]);
        assert_eq!(recs[1], [&Value::Missing, &Value::Int(0), &Value::Int(0)]);
    }

    #[test]
    fn header_styles() {
        let mut s = set("a", &["pts"], 0);
        s.columns.push(Column::new("game_location", ""));
        assert_eq!(s.header(HeaderStyle::Key), ["pts", "game_location"]);
        assert_eq!(s.header(HeaderStyle::Label), ["PTS", "game_location"]);
    }

    #[test]
    fn prepend_constant_column() {
        let mut s = set("a", &["pts"], 2);
        s.prepend_constant(Column::new("player_id", "PlayerID"), Value::Text(s!("a")));
        s.prepend_constant(Column::new("player_id", "PlayerID"), Value::Text(s!("a")));
        assert_eq!(keys(&s), ["player_id", "pts"]);
        let first: Vec<&String> = s.rows[0].cells.keys().collect();
        assert_eq!(first, ["player_id", "pts"]);
    }
}
