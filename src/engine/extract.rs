// src/engine/extract.rs
//! Header + body rows out of one located table.
//!
//! A single pass over the fragment's tokens drives a small state machine:
//! which section we are in (`thead`/`tbody`/`tfoot`), whether a row and a
//! cell are open, and how deep into nested tables we are. Comments inside
//! the fragment are ignored; the locator already un-hid the table itself.

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::core::html::{Fragment, Tag, Token, Tokens};
use crate::core::sanitize::clean_text;
use crate::error::{Result, ScrapeError};
use super::types::{Column, RawRow};

/// Row classes the site uses for repeated headers and spacing.
const SEPARATOR_CLASSES: &[&str] = &["thead", "spacer", "over_header"];
/// Inside `<thead>` the real header row may carry `thead` too; only group rows are skipped there.
const HEAD_GROUP_CLASS: &str = "over_header";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Extracted {
    pub columns: Vec<Column>,
    pub rows: Vec<RawRow>,
    /// Separator and status rows dropped from the body.
    pub skipped: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Section {
    Table,
    Head,
    Body,
    Foot,
}

#[derive(Debug, Default)]
struct CellBuf {
    text: String,
    stat: Option<String>,
    append_csv: Option<String>,
    is_th: bool,
}

impl CellBuf {
    fn open(tag: &Tag<'_>) -> Self {
        Self {
            text: s!(),
            stat: tag.attr("data-stat").map(String::from),
            append_csv: tag.attr("data-append-csv").map(String::from),
            is_th: tag.is("th"),
        }
    }
}

#[derive(Debug)]
struct RowBuf {
    section: Section,
    separator: bool,
    cells: Vec<CellBuf>,
}

#[derive(Default)]
struct Machine {
    section: Option<Section>,
    /// 0 = not yet inside the target table.
    depth: usize,
    saw_thead: bool,
    row: Option<RowBuf>,
    cell: Option<CellBuf>,
    head_rows: Vec<RowBuf>,
    body_rows: Vec<RowBuf>,
}

impl Machine {
    fn feed(&mut self, tok: Token<'_>) {
        match tok {
            Token::Open(tag) if tag.is("table") => {
                if !tag.self_closing {
                    self.depth += 1;
                }
                if self.depth == 1 {
                    self.section = Some(Section::Table);
                }
            }
            Token::Close(name) if name.eq_ignore_ascii_case("table") => {
                if self.depth == 1 {
                    self.end_row();
                    self.section = None;
                }
                self.depth = self.depth.saturating_sub(1);
            }
            // nested tables (rare, but cells sometimes hold one) contribute text only
            _ if self.depth > 1 => {
                if let (Token::Text(t), Some(cell)) = (tok, self.cell.as_mut()) {
                    cell.text.push_str(t);
                }
            }
            _ if self.depth == 0 => {}
            Token::Open(tag) => self.open(tag),
            Token::Close(name) => self.close(name),
            Token::Text(t) => {
                if let Some(cell) = self.cell.as_mut() {
                    cell.text.push_str(t);
                }
            }
            Token::Comment(_) => {}
        }
    }

    fn open(&mut self, tag: Tag<'_>) {
        if tag.is("thead") {
            self.end_row();
            self.saw_thead = true;
            self.section = Some(Section::Head);
        } else if tag.is("tbody") {
            self.end_row();
            self.section = Some(Section::Body);
        } else if tag.is("tfoot") {
            self.end_row();
            self.section = Some(Section::Foot);
        } else if tag.is("tr") {
            self.end_row();
            let separator = match self.section {
                Some(Section::Head) => tag.has_class(HEAD_GROUP_CLASS),
                _ => SEPARATOR_CLASSES.iter().any(|c| tag.has_class(c)),
            };
            self.start_row(separator);
        } else if tag.is("th") || tag.is("td") {
            self.end_cell();
            if self.row.is_none() {
                // header cells are not always wrapped in <tr>
                self.start_row(false);
            }
            self.cell = Some(CellBuf::open(&tag));
        } else if tag.is("br") {
            if let Some(cell) = self.cell.as_mut() {
                cell.text.push(' ');
            }
        }
    }

    fn close(&mut self, name: &str) {
        let is = |t: &str| name.eq_ignore_ascii_case(t);
        if is("th") || is("td") {
            self.end_cell();
        } else if is("tr") {
            self.end_row();
        } else if is("thead") || is("tbody") || is("tfoot") {
            self.end_row();
            self.section = Some(Section::Table);
        }
    }

    fn start_row(&mut self, separator: bool) {
        let section = self.section.unwrap_or(Section::Table);
        self.row = Some(RowBuf { section, separator, cells: Vec::new() });
    }

    fn end_cell(&mut self) {
        if let Some(cell) = self.cell.take() {
            if let Some(row) = self.row.as_mut() {
                row.cells.push(cell);
            }
        }
    }

    fn end_row(&mut self) {
        self.end_cell();
        let Some(row) = self.row.take() else { return };
        if row.cells.is_empty() {
            return;
        }
        match row.section {
            Section::Head => self.head_rows.push(row),
            Section::Foot => {}
            Section::Body => self.body_rows.push(row),
            // rows straight under <table>: the first all-<th> row is the header
            Section::Table => {
                let is_header = !self.saw_thead
                    && self.head_rows.is_empty()
                    && row.cells.iter().all(|c| c.is_th);
                if is_header {
                    self.head_rows.push(row);
                } else {
                    self.body_rows.push(row);
                }
            }
        }
    }
}

/// Parse a located table into columns and raw rows, in document order.
pub fn extract_rows(table_id: &str, fragment: &Fragment<'_>) -> Result<Extracted> {
    let mut m = Machine::default();
    for (_, tok) in Tokens::new(fragment.html) {
        m.feed(tok);
    }
    m.end_row();

    // last non-group row of <thead> carries the per-column headers
    let header = m
        .head_rows
        .into_iter()
        .rev()
        .find(|r| !r.separator || r.cells.iter().any(|c| c.stat.is_some()))
        .ok_or_else(|| ScrapeError::malformed(table_id, "no header row"))?;
    let columns = header_columns(header);

    let mut rows = Vec::with_capacity(m.body_rows.len());
    let mut skipped = 0usize;
    for row in m.body_rows {
        if row.separator {
            skipped += 1;
            continue;
        }
        let texts: Vec<String> = row.cells.iter().map(|c| clean_text(&c.text)).collect();
        if texts.iter().all(String::is_empty) {
            skipped += 1;
            continue;
        }
        if texts.len() < columns.len() {
            // colspan status rows: "Inactive", "Did Not Play", ...
            debug!(table_id, cells = texts.len(), first = %texts[0], "skipping status row");
            skipped += 1;
            continue;
        }
        if texts.len() > columns.len() {
            warn!(table_id, cells = texts.len(), columns = columns.len(), "row wider than header; extra cells ignored");
        }

        let player_id = row.cells.iter().find_map(|c| c.append_csv.clone());
        let cells: IndexMap<String, String> = columns
            .iter()
            .map(|c| c.key.clone())
            .zip(texts)
            .collect();
        rows.push(RawRow { player_id, cells });
    }

    if rows.is_empty() {
        return Err(ScrapeError::EmptyTable { table_id: s!(table_id) });
    }
    debug!(table_id, columns = columns.len(), rows = rows.len(), skipped, "extracted rows");
    Ok(Extracted { columns, rows, skipped })
}

fn header_columns(header: RowBuf) -> Vec<Column> {
    let mut seen: IndexMap<String, usize> = IndexMap::new();
    header
        .cells
        .into_iter()
        .enumerate()
        .map(|(i, cell)| {
            let label = clean_text(&cell.text);
            let base = match cell.stat.filter(|s| !s.is_empty()) {
                Some(stat) => stat,
                None if !label.is_empty() => label.clone(),
                None => format!("col{}", i + 1),
            };
            let n = seen.entry(base.clone()).or_insert(0);
            *n += 1;
            let key = if *n == 1 { base } else { format!("{base}_{n}") };
            Column { key, label }
        })
        .collect()
}
