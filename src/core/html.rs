// src/core/html.rs
//! Markup scanning without a DOM.
//!
//! `Tokens` walks a page byte by byte and yields open tags, close tags, text
//! runs and comments, each tagged with its starting offset. Everything borrows
//! from the page; attributes are parsed lazily on lookup.
//!
//! `locate_table` builds on it: the site ships most secondary tables inside
//! `<!-- ... -->` blocks and un-comments them client side, so the search
//! descends into comment bodies as well as the live markup.

use tracing::debug;

use crate::error::{Result, ScrapeError};
use super::sanitize::clean_text;

/* ---------------- Tokenizer ---------------- */

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tag<'a> {
    pub name: &'a str,
    attrs: &'a str,
    pub self_closing: bool,
}

impl<'a> Tag<'a> {
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// Raw (undecoded) attribute value. Bare attributes yield `""`.
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        Attrs { s: self.attrs, i: 0 }
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|c| c.split_ascii_whitespace().any(|c| c == class))
    }
}

struct Attrs<'a> {
    s: &'a str,
    i: usize,
}

impl<'a> Iterator for Attrs<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        let b = self.s.as_bytes();
        let n = b.len();
        while self.i < n && (b[self.i].is_ascii_whitespace() || b[self.i] == b'/') { self.i += 1; }
        if self.i >= n { return None; }

        let ks = self.i;
        while self.i < n && b[self.i] != b'=' && b[self.i] != b'/' && !b[self.i].is_ascii_whitespace() {
            self.i += 1;
        }
        let key = &self.s[ks..self.i];
        while self.i < n && b[self.i].is_ascii_whitespace() { self.i += 1; }
        if self.i >= n || b[self.i] != b'=' {
            return Some((key, ""));
        }
        self.i += 1; // '='
        while self.i < n && b[self.i].is_ascii_whitespace() { self.i += 1; }
        if self.i >= n { return Some((key, "")); }

        let val = match b[self.i] {
            q @ (b'"' | b'\'') => {
                let vs = self.i + 1;
                let ve = self.s[vs..].find(q as char).map_or(n, |e| vs + e);
                self.i = (ve + 1).min(n);
                &self.s[vs..ve]
            }
            _ => {
                let vs = self.i;
                while self.i < n && !b[self.i].is_ascii_whitespace() { self.i += 1; }
                &self.s[vs..self.i]
            }
        };
        Some((key, val))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Token<'a> {
    Open(Tag<'a>),
    Close(&'a str),
    Text(&'a str),
    /// Body between `<!--` and `-->`.
    Comment(&'a str),
}

/// Elements whose content is never markup.
const RAW_TEXT: &[(&str, &str)] = &[
    ("script", "</script"),
    ("style", "</style"),
    ("textarea", "</textarea"),
];

pub struct Tokens<'a> {
    s: &'a str,
    b: &'a [u8],
    i: usize,
    raw_until: Option<&'static str>,
}

impl<'a> Tokens<'a> {
    pub fn new(s: &'a str) -> Self {
        Self { s, b: s.as_bytes(), i: 0, raw_until: None }
    }

    /// Offset just past the last token returned.
    pub fn pos(&self) -> usize {
        self.i
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = (usize, Token<'a>);

    fn next(&mut self) -> Option<Self::Item> {
        let n = self.b.len();

        if let Some(close) = self.raw_until.take() {
            let start = self.i;
            let end = find_ci(self.s, close, start).unwrap_or(n);
            self.i = end;
            if end > start {
                return Some((start, Token::Text(&self.s[start..end])));
            }
        }

        while self.i < n {
            let start = self.i;
            if self.b[start] != b'<' {
                let end = self.s[start..].find('<').map_or(n, |e| start + e);
                self.i = end;
                return Some((start, Token::Text(&self.s[start..end])));
            }

            if self.s[start..].starts_with("<!--") {
                let body = start + 4;
                let (body_end, after) = match self.s[body..].find("-->") {
                    Some(e) => (body + e, body + e + 3),
                    None => (n, n),
                };
                self.i = after;
                return Some((start, Token::Comment(&self.s[body..body_end])));
            }

            match self.b.get(start + 1) {
                Some(b'/') => {
                    let ns = start + 2;
                    let ne = name_end(self.b, ns);
                    self.i = skip_tag(self.b, ne);
                    if ne > ns {
                        return Some((start, Token::Close(&self.s[ns..ne])));
                    }
                }
                Some(b'!') | Some(b'?') => {
                    // doctype / processing instruction
                    self.i = skip_tag(self.b, start + 1);
                }
                Some(c) if c.is_ascii_alphabetic() => {
                    let ne = name_end(self.b, start + 1);
                    let end = skip_tag(self.b, ne);
                    let inner_end = if self.b[end - 1] == b'>' { end - 1 } else { end };
                    let mut attrs = self.s[ne..inner_end].trim_end();
                    let self_closing = attrs.ends_with('/');
                    if self_closing {
                        attrs = attrs.trim_end_matches('/');
                    }
                    let tag = Tag { name: &self.s[start + 1..ne], attrs, self_closing };
                    self.i = end;
                    if !self_closing {
                        self.raw_until = RAW_TEXT.iter().find(|(t, _)| tag.is(t)).map(|(_, c)| *c);
                    }
                    return Some((start, Token::Open(tag)));
                }
                _ => {
                    // stray '<' in text
                    let end = self.s[start + 1..].find('<').map_or(n, |e| start + 1 + e);
                    self.i = end;
                    return Some((start, Token::Text(&self.s[start..end])));
                }
            }
        }
        None
    }
}

fn name_end(b: &[u8], mut i: usize) -> usize {
    while i < b.len() && (b[i].is_ascii_alphanumeric() || b[i] == b'-' || b[i] == b':') {
        i += 1;
    }
    i
}

/// Index just past the `>` closing a tag, honouring quoted attribute values.
fn skip_tag(b: &[u8], mut i: usize) -> usize {
    let mut in_s = false; // '
    let mut in_d = false; // "
    while i < b.len() {
        match b[i] {
            b'\'' if !in_d => in_s = !in_s,
            b'"' if !in_s => in_d = !in_d,
            b'>' if !in_s && !in_d => return i + 1,
            _ => {}
        }
        i += 1;
    }
    b.len()
}

/// ASCII case-insensitive substring search starting at `from`.
fn find_ci(hay: &str, needle: &str, from: usize) -> Option<usize> {
    let h = hay.as_bytes();
    let nb = needle.as_bytes();
    if nb.is_empty() || h.len() < nb.len() {
        return None;
    }
    (from..=h.len() - nb.len()).find(|&i| h[i..i + nb.len()].eq_ignore_ascii_case(nb))
}

/* ---------------- Table locator ---------------- */

/// One table's markup, `<table ...>` through `</table>`, borrowed from the page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fragment<'a> {
    pub html: &'a str,
    /// Found inside a comment block rather than live markup.
    pub commented: bool,
}

/// Find the first `<table id="table_id">`, live or commented out.
pub fn locate_table<'a>(doc: &'a str, table_id: &str) -> Result<Fragment<'a>> {
    let not_found = || ScrapeError::TableNotFound { table_id: s!(table_id) };
    if !doc.contains(table_id) {
        return Err(not_found());
    }
    scan_for_table(doc, table_id, false)?.ok_or_else(not_found)
}

/// Try several ids in order; the first one present wins.
pub fn locate_any<'a, 'b>(doc: &'a str, ids: &[&'b str]) -> Result<(&'b str, Fragment<'a>)> {
    for &id in ids {
        match locate_table(doc, id) {
            Ok(fragment) => return Ok((id, fragment)),
            Err(ScrapeError::TableNotFound { .. }) => continue,
            Err(e) => return Err(e),
        }
    }
    Err(ScrapeError::TableNotFound { table_id: ids.join("|") })
}

fn scan_for_table<'a>(s: &'a str, table_id: &str, commented: bool) -> Result<Option<Fragment<'a>>> {
    let mut tokens = Tokens::new(s);
    while let Some((start, tok)) = tokens.next() {
        match tok {
            Token::Open(tag) if tag.is("table") && tag.attr("id") == Some(table_id) => {
                let end = close_of_table(&mut tokens)
                    .ok_or_else(|| ScrapeError::malformed(table_id, "no closing </table>"))?;
                debug!(table_id, commented, bytes = end - start, "located table");
                return Ok(Some(Fragment { html: &s[start..end], commented }));
            }
            // comments don't nest, so one level of descent is enough
            Token::Comment(body) if !commented && body.contains(table_id) => {
                if let Some(found) = scan_for_table(body, table_id, true)? {
                    return Ok(Some(found));
                }
            }
            _ => {}
        }
    }
    Ok(None)
}

fn close_of_table(tokens: &mut Tokens<'_>) -> Option<usize> {
    let mut depth = 1usize;
    while let Some((_, tok)) = tokens.next() {
        match tok {
            Token::Open(tag) if tag.is("table") && !tag.self_closing => depth += 1,
            Token::Close(name) if name.eq_ignore_ascii_case("table") => {
                depth -= 1;
                if depth == 0 {
                    return Some(tokens.pos());
                }
            }
            _ => {}
        }
    }
    None
}

/* ---------------- Snippet helpers (search pages) ---------------- */

/// Inside of the first `open_pat ... close_pat` block, after the opener's `>`.
pub fn slice_between_ci<'a>(s: &'a str, open_pat: &str, close_pat: &str) -> Option<&'a str> {
    let o = find_ci(s, open_pat, 0)?;
    let after = s[o..].find('>')? + o + 1;
    let c = find_ci(s, close_pat, after)?;
    Some(&s[after..c])
}

/// Visible text of a markup snippet, entities decoded and whitespace collapsed.
pub fn strip_tags(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for (_, tok) in Tokens::new(s) {
        match tok {
            Token::Text(t) => out.push_str(t),
            Token::Open(tag) if tag.is("br") => out.push(' '),
            _ => {}
        }
    }
    clean_text(&out)
}
