// src/file.rs

use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
};

use csv::{Terminator, Writer, WriterBuilder};

use crate::config::options::{ExportFormat, ExportOptions, HeaderStyle};
use crate::core::sanitize::sanitize_filename;
use crate::error::Result;
use crate::store::RecordSet;

fn builder(format: ExportFormat) -> WriterBuilder {
    let mut b = WriterBuilder::new();
    b.delimiter(format.delim())
        .has_headers(false)
        .terminator(Terminator::Any(b'\n'));
    b
}

fn write_records<W: io::Write>(w: &mut Writer<W>, set: &RecordSet, style: HeaderStyle) -> Result<()> {
    w.write_record(set.header(style))?;
    for rec in set.records() {
        w.write_record(rec.iter().map(|v| v.to_string()))?;
    }
    w.flush()?;
    Ok(())
}

/// Write one record set to `path`, creating parent directories.
/// Returns the path written to.
pub fn write_record_set(path: &Path, set: &RecordSet, export: &ExportOptions) -> Result<PathBuf> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory(parent)?;
        }
    }
    let mut w = builder(export.format).from_path(path)?;
    write_records(&mut w, set, export.header_style)?;
    Ok(path.to_path_buf())
}

/// Whole export as a string (stdout, tests).
pub fn to_export_string(set: &RecordSet, format: ExportFormat, style: HeaderStyle) -> Result<String> {
    let mut w = builder(format).from_writer(Vec::new());
    write_records(&mut w, set, style)?;
    let bytes = w.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

pub fn ensure_directory(dir: &Path) -> io::Result<()> {
    if dir.exists() && !dir.is_dir() {
        return Err(io::Error::other(format!(
            "path exists but is not a directory: {}",
            dir.display()
        )));
    }
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

/// A trailing separator or an existing directory means "put the default file in here".
pub fn resolve_out_path(user: &Path, default_filename: &str) -> PathBuf {
    if looks_like_dir_hint(user) || user.is_dir() {
        user.join(default_filename)
    } else {
        user.to_path_buf()
    }
}

pub fn looks_like_dir_hint(p: &Path) -> bool {
    let s = p.to_string_lossy();
    s.ends_with('/') || s.ends_with('\\')
}

/// Stems are deduplicated only within this run: `stem.ext`, then `stem (2).ext`, ...
pub fn resolve_filename(dir: &Path, stem: &str, seen: &mut HashMap<String, usize>, ext: &str) -> PathBuf {
    let count = seen.entry(s!(stem)).or_insert(0);
    let filename = if *count == 0 {
        format!("{stem}.{ext}")
    } else {
        format!("{stem} ({}).{ext}", *count + 1)
    };
    *count += 1;
    dir.join(filename)
}

/// `<dir>/<id>_<label>_<season>.<ext>`
pub fn per_player_path(
    dir: &Path,
    player_id: &str,
    label: &str,
    season: u16,
    ext: &str,
    seen: &mut HashMap<String, usize>,
) -> PathBuf {
    let stem = sanitize_filename(&format!("{player_id}_{label}_{season}"), "player");
    resolve_filename(dir, &stem, seen, ext)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::types::{Column, TypedRow, Value};

    fn sample() -> RecordSet {
        let mut row = TypedRow::default();
        row.cells.insert(s!("date_game"), Value::Text(s!("2024-01-05")));
        row.cells.insert(s!("opp_id"), Value::Text(s!("NYK, NY")));
        row.cells.insert(s!("pts"), Value::Missing);
        RecordSet::new(
            vec![
                Column::new("date_game", "Date"),
                Column::new("opp_id", "Opp"),
                Column::new("pts", "PTS"),
            ],
            vec![row],
        )
    }

    #[test]
    fn csv_quotes_and_leaves_missing_empty() {
        let out = to_export_string(&sample(), ExportFormat::Csv, HeaderStyle::Key).unwrap();
        assert_eq!(out, "date_game,opp_id,pts\n2024-01-05,\"NYK, NY\",\n");
    }

    #[test]
    fn tsv_with_labels() {
        let out = to_export_string(&sample(), ExportFormat::Tsv, HeaderStyle::Label).unwrap();
        assert_eq!(out, "Date\tOpp\tPTS\n2024-01-05\tNYK, NY\t\n");
    }

    #[test]
    fn write_creates_parent_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested/deeper/out.csv");
        let written = write_record_set(&path, &sample(), &ExportOptions::default()).unwrap();
        assert_eq!(written, path);
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("date_game,opp_id,pts\n"));
    }

    #[test]
    fn duplicate_stems_get_a_counter() {
        let dir = Path::new("out");
        let mut seen = HashMap::new();
        let a = per_player_path(dir, "jamesle01", "last15", 2024, "csv", &mut seen);
        let b = per_player_path(dir, "jamesle01", "last15", 2024, "csv", &mut seen);
        let c = per_player_path(dir, "jamesle01", "last15", 2024, "csv", &mut seen);
        assert_eq!(a, dir.join("jamesle01_last15_2024.csv"));
        assert_eq!(b, dir.join("jamesle01_last15_2024 (2).csv"));
        assert_eq!(c, dir.join("jamesle01_last15_2024 (3).csv"));
    }

    #[test]
    fn dir_hints() {
        assert_eq!(resolve_out_path(Path::new("logs/"), "all.csv"), Path::new("logs/").join("all.csv"));
        assert_eq!(resolve_out_path(Path::new("logs/x.csv"), "all.csv"), PathBuf::from("logs/x.csv"));
    }
}
