// src/engine/mod.rs
//! Table pipeline: raw rows → typed rows → selected rows.

pub mod types;
pub mod schema;
pub mod extract;
pub mod normalize;
pub mod select;

pub use extract::{Extracted, extract_rows};
pub use normalize::{Normalized, normalize_rows};
pub use schema::{GAME_LOG_SCHEMA, PER_GAME_SCHEMA, TableSchema};
pub use select::{GameSelection, SelectionPolicy};
pub use types::{Column, ColumnType, RawRow, TypedRow, Value};
