// src/specs/search.rs
//! Player lookup via `/search/search.fcgi?search=<name>`.
//!
//! Results come as `<div class="search-item">` blocks. A query with exactly
//! one match is redirected straight to the player page, which is recognized
//! by its canonical link.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::config::consts::BASE_URL;
use crate::core::html::{Token, Tokens, slice_between_ci, strip_tags};
use crate::core::net::Fetch;
use crate::error::Result;

static PLAYER_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/players/[a-z]/([a-z0-9]{7,12})\.html$").expect("valid regex"));

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerMatch {
    pub id: String,
    /// Display name as listed, often with career years.
    pub name: String,
    pub url: String,
}

pub fn path(query: &str) -> String {
    format!("/search/search.fcgi?search={}", urlencoding::encode(query.trim()))
}

pub fn lookup<F: Fetch>(fetcher: &mut F, query: &str) -> Result<Vec<PlayerMatch>> {
    let doc = fetcher.fetch(&path(query))?;
    let found = parse_results(&doc);
    debug!(query, matches = found.len(), "player search");
    Ok(found)
}

/// Player matches on a results page, or the single player a redirect landed on.
pub fn parse_results(doc: &str) -> Vec<PlayerMatch> {
    let items = search_items(doc);
    if items.is_empty() {
        return canonical_player(doc).into_iter().collect();
    }
    items.into_iter().filter_map(parse_item).collect()
}

/// Each `search-item` runs until the next one starts.
fn search_items(doc: &str) -> Vec<&str> {
    let starts: Vec<usize> = Tokens::new(doc)
        .filter_map(|(pos, tok)| match tok {
            Token::Open(tag) if tag.is("div") && tag.has_class("search-item") => Some(pos),
            _ => None,
        })
        .collect();
    starts
        .iter()
        .enumerate()
        .map(|(i, &s)| &doc[s..starts.get(i + 1).copied().unwrap_or(doc.len())])
        .collect()
}

fn parse_item(block: &str) -> Option<PlayerMatch> {
    let name = slice_between_ci(block, r#"<div class="search-item-name""#, "</div>")
        .map(strip_tags)
        .unwrap_or_default();
    let url_path = slice_between_ci(block, r#"<div class="search-item-url""#, "</div>")
        .map(strip_tags)
        .filter(|u| !u.is_empty())
        .or_else(|| first_href(block))?;
    player_match(&url_path, name)
}

fn first_href(block: &str) -> Option<String> {
    Tokens::new(block).find_map(|(_, tok)| match tok {
        Token::Open(tag) if tag.is("a") => tag.attr("href").map(String::from),
        _ => None,
    })
}

fn player_match(url_path: &str, name: String) -> Option<PlayerMatch> {
    let id = PLAYER_PATH.captures(url_path.trim())?.get(1)?.as_str();
    Some(PlayerMatch {
        id: s!(id),
        name,
        url: join!(BASE_URL, url_path.trim()),
    })
}

fn canonical_player(doc: &str) -> Option<PlayerMatch> {
    let href = Tokens::new(doc).find_map(|(_, tok)| match tok {
        Token::Open(tag) if tag.is("link") && tag.attr("rel") == Some("canonical") => tag.attr("href"),
        _ => None,
    })?;
    let url_path = &href[href.find("/players/")?..];
    let name = slice_between_ci(doc, "<h1", "</h1>").map(strip_tags).unwrap_or_default();
    player_match(url_path, name)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESULTS: &str = r#"
    <div id="players">
      <div class="search-item">
        <div class="search-item-name"><strong><a href="/players/j/jamesle01.html">LeBron James (2004-2025)</a></strong></div>
        <div class="search-item-league">NBA</div>
        <div class="search-item-url">/players/j/jamesle01.html</div>
      </div>
      <div class="search-item">
        <div class="search-item-name"><strong><a href="/players/j/jamesbr02.html">Bronny James (2025-2025)</a></strong></div>
      </div>
      <div class="search-item">
        <div class="search-item-name"><a href="/coaches/jamesle99c.html">Someone Else</a></div>
        <div class="search-item-url">/coaches/jamesle99c.html</div>
      </div>
    </div>"#;

    #[test]
    fn parses_items_and_skips_non_players() {
        let found = parse_results(RESULTS);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].id, "jamesle01");
        assert_eq!(found[0].name, "LeBron James (2004-2025)");
        assert_eq!(found[0].url, "https://www.basketball-reference.com/players/j/jamesle01.html");
        // no url div: falls back to the anchor
        assert_eq!(found[1].id, "jamesbr02");
    }

    #[test]
    fn redirect_to_player_page() {
        let doc = r#"<html><head>
          <link rel="canonical" href="https://www.basketball-reference.com/players/d/duranke01.html" />
        </head><body><h1><span>Kevin Durant</span></h1></body></html>"#;
        let found = parse_results(doc);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "duranke01");
        assert_eq!(found[0].name, "Kevin Durant");
    }

    #[test]
    fn nothing_found() {
        assert!(parse_results("<html><p>Found 0 hits</p></html>").is_empty());
    }

    #[test]
    fn query_is_encoded() {
        assert_eq!(path(" LeBron James "), "/search/search.fcgi?search=LeBron%20James");
    }
}
