// src/engine/normalize.rs
use tracing::warn;

use crate::error::ScrapeError;
use super::schema::TableSchema;
use super::types::{ColumnType, RawRow, TypedRow, Value};

/// Cell texts the site uses for "no value".
const PLACEHOLDERS: &[&str] = &["", "—", "–", "-", "N/A", "NA"];

#[derive(Debug, Default)]
pub struct Normalized {
    pub rows: Vec<TypedRow>,
    /// One `UnparsableValue` per bad numeric cell; the rows themselves are kept.
    pub issues: Vec<ScrapeError>,
}

/// Coerce one cell. `Err` carries the expected type name.
pub fn coerce(text: &str, ty: ColumnType) -> Result<Value, &'static str> {
    let t = text.trim();
    if ty != ColumnType::Text && PLACEHOLDERS.contains(&t) {
        return Ok(Value::Missing);
    }
    match ty {
        ColumnType::Text if t.is_empty() => Ok(Value::Missing),
        ColumnType::Text => Ok(Value::Text(s!(t))),
        ColumnType::Int => parse_int(t).map(Value::Int).ok_or(ty.name()),
        ColumnType::Decimal => parse_decimal(t).map(Value::Decimal).ok_or(ty.name()),
    }
}

fn parse_int(t: &str) -> Option<i64> {
    let t = strip_grouping(t);
    if let Ok(v) = t.parse::<i64>() {
        return Some(v);
    }
    // "30.0" in an integer column is still thirty
    let f = parse_decimal(&t)?;
    (f.fract() == 0.0 && f.abs() < i64::MAX as f64).then_some(f as i64)
}

fn parse_decimal(t: &str) -> Option<f64> {
    let t = strip_grouping(t);
    t.parse::<f64>().ok().filter(|f| f.is_finite())
}

/// "1,234" → "1234"; commas anywhere else are left to fail the parse.
fn strip_grouping(t: &str) -> std::borrow::Cow<'_, str> {
    let digits_and_commas = t.contains(',')
        && t.trim_start_matches(['+', '-'])
            .split(',')
            .enumerate()
            .all(|(i, g)| g.chars().all(|c| c.is_ascii_digit()) && (i == 0 || g.len() == 3) && !g.is_empty());
    if digits_and_commas {
        std::borrow::Cow::Owned(t.replace(',', ""))
    } else {
        std::borrow::Cow::Borrowed(t)
    }
}

/// Raw row → typed row. Bad numeric cells become `Missing` and are reported.
pub fn normalize_row(raw: RawRow, schema: &TableSchema) -> (TypedRow, Vec<ScrapeError>) {
    let mut issues = Vec::new();
    let cells = raw
        .cells
        .into_iter()
        .map(|(key, text)| {
            let ty = schema.type_of(&key);
            let value = match coerce(&text, ty) {
                Ok(v) => v,
                Err(expected) => {
                    warn!(table = schema.name, column = %key, raw = %text, "unparsable {expected}; keeping row");
                    issues.push(ScrapeError::UnparsableValue {
                        column: key.clone(),
                        expected,
                        raw: text,
                    });
                    Value::Missing
                }
            };
            (key, value)
        })
        .collect();

    let row = TypedRow { player_id: raw.player_id, season: None, cells };
    (row, issues)
}

pub fn normalize_rows(rows: Vec<RawRow>, schema: &TableSchema) -> Normalized {
    let mut out = Normalized { rows: Vec::with_capacity(rows.len()), issues: Vec::new() };
    for raw in rows {
        let (row, issues) = normalize_row(raw, schema);
        out.rows.push(row);
        out.issues.extend(issues);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::schema::GAME_LOG_SCHEMA;
    use indexmap::IndexMap;

    fn raw(pairs: &[(&str, &str)]) -> RawRow {
        RawRow {
            player_id: None,
            cells: pairs.iter().map(|(k, v)| (s!(*k), s!(*v))).collect::<IndexMap<_, _>>(),
        }
    }

    #[test]
    fn numeric_literals() {
        assert_eq!(coerce("30", ColumnType::Int), Ok(Value::Int(30)));
        assert_eq!(coerce("+5", ColumnType::Int), Ok(Value::Int(5)));
        assert_eq!(coerce("-12", ColumnType::Int), Ok(Value::Int(-12)));
        assert_eq!(coerce("1,234", ColumnType::Int), Ok(Value::Int(1234)));
        assert_eq!(coerce("30.0", ColumnType::Int), Ok(Value::Int(30)));
        assert_eq!(coerce(".512", ColumnType::Decimal), Ok(Value::Decimal(0.512)));
        assert_eq!(coerce("-.5", ColumnType::Decimal), Ok(Value::Decimal(-0.5)));
        assert_eq!(coerce("24.7", ColumnType::Decimal), Ok(Value::Decimal(24.7)));
        assert_eq!(coerce("0", ColumnType::Int).map(|v| v.as_f64()), Ok(Some(0.0)));
        assert!(!Value::Int(0).is_missing());
    }

    #[test]
    fn empty_and_placeholders_are_missing_not_zero() {
        for t in ["", "  ", "—", "–", "-", "N/A"] {
            assert_eq!(coerce(t, ColumnType::Int), Ok(Value::Missing), "{t:?}");
            assert_eq!(coerce(t, ColumnType::Decimal), Ok(Value::Missing), "{t:?}");
        }
        assert_eq!(coerce("0", ColumnType::Int), Ok(Value::Int(0)));
        assert_eq!(coerce("", ColumnType::Text), Ok(Value::Missing));
    }

    #[test]
    fn text_passes_through() {
        assert_eq!(coerce("W (+5)", ColumnType::Text), Ok(Value::Text(s!("W (+5)"))));
        assert_eq!(coerce("-", ColumnType::Text), Ok(Value::Text(s!("-"))));
    }

    #[test]
    fn garbage_in_numeric_column_is_an_error() {
        assert_eq!(coerce("abc", ColumnType::Int), Err("integer"));
        assert_eq!(coerce("1,23", ColumnType::Int), Err("integer"));
        assert_eq!(coerce("NaN", ColumnType::Decimal), Err("decimal"));
        assert_eq!(coerce("30.5", ColumnType::Int), Err("integer"));
    }

    #[test]
    fn placeholder_keeps_the_row() {
        let (row, issues) = normalize_row(
            raw(&[("date_game", "2024-01-05"), ("opp_id", "NYK"), ("pts", "—")]),
            &GAME_LOG_SCHEMA,
        );
        assert!(issues.is_empty());
        assert!(row.get("pts").is_missing());
        assert_eq!(row.get("pts").as_i64(), None);
        assert_eq!(row.get("opp_id"), &Value::Text(s!("NYK")));
    }

    #[test]
    fn bad_cell_is_reported_and_row_kept() {
        let n = normalize_rows(
            vec![
                raw(&[("pts", "30"), ("ast", "lots")]),
                raw(&[("pts", "22"), ("ast", "7")]),
            ],
            &GAME_LOG_SCHEMA,
        );
        assert_eq!(n.rows.len(), 2);
        assert_eq!(n.issues.len(), 1);
        assert!(matches!(&n.issues[0], ScrapeError::UnparsableValue { column, .. } if column == "ast"));
        assert_eq!(n.rows[0].get("ast"), &Value::Missing);
        assert_eq!(n.rows[0].get("pts"), &Value::Int(30));
        assert_eq!(n.rows[1].get("ast"), &Value::Int(7));
    }

    #[test]
    fn numeric_columns_never_hold_raw_text() {
        let inputs = ["12", "x", "", "—", "+3", "3.5", "1e3", "?"];
        for t in inputs {
            let (row, _) = normalize_row(raw(&[("pts", t), ("fg_pct", t)]), &GAME_LOG_SCHEMA);
            assert!(matches!(row.get("pts"), Value::Int(_) | Value::Missing), "{t:?}");
            assert!(matches!(row.get("fg_pct"), Value::Decimal(_) | Value::Missing), "{t:?}");
        }
    }
}
