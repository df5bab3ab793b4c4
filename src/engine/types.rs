// src/engine/types.rs
use std::fmt;

use indexmap::IndexMap;

/// One header cell: the stable key the row maps use, and what the site shows.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Column {
    pub key: String,
    pub label: String,
}

impl Column {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self { key: key.into(), label: label.into() }
    }
}

/// Unparsed body row, keyed by column key, in header order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawRow {
    /// Row-scoped player id when a cell carries one (`data-append-csv`).
    pub player_id: Option<String>,
    pub cells: IndexMap<String, String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnType {
    Int,
    Decimal,
    Text,
}

impl ColumnType {
    pub fn name(&self) -> &'static str {
        match self {
            ColumnType::Int => "integer",
            ColumnType::Decimal => "decimal",
            ColumnType::Text => "text",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Int(i64),
    Decimal(f64),
    Text(String),
    /// Absent or unparsable. Never the same thing as zero.
    Missing,
}

impl Value {
    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Decimal(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Export rendering: missing is an empty field.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Decimal(v) => write!(f, "{v}"),
            Value::Text(s) => f.write_str(s),
            Value::Missing => Ok(()),
        }
    }
}

static MISSING: Value = Value::Missing;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TypedRow {
    pub player_id: Option<String>,
    /// Season end year.
    pub season: Option<u16>,
    pub cells: IndexMap<String, Value>,
}

impl TypedRow {
    /// Cell by key; absent columns read as missing.
    pub fn get(&self, key: &str) -> &Value {
        self.cells.get(key).unwrap_or(&MISSING)
    }
}
