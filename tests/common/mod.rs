// tests/common/mod.rs
#![allow(dead_code)]

use std::collections::HashMap;

use bref_scrape::core::net::Fetch;
use bref_scrape::progress::Progress;
use bref_scrape::{Result, ScrapeError};

pub const PGL_2024: &str = include_str!("../fixtures/pgl_2024.html");
pub const PER_GAME_2024: &str = include_str!("../fixtures/per_game_2024.html");
pub const LEAGUES: &str = include_str!("../fixtures/leagues.html");
pub const SEARCH: &str = include_str!("../fixtures/search.html");

/// Serves canned pages by path; anything else is a 404.
#[derive(Default)]
pub struct FakeFetcher {
    pages: HashMap<String, String>,
    pub requests: Vec<String>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, path: &str, body: &str) -> Self {
        self.pages.insert(path.to_string(), body.to_string());
        self
    }
}

impl Fetch for FakeFetcher {
    fn fetch(&mut self, path: &str) -> Result<String> {
        self.requests.push(path.to_string());
        self.pages.get(path).cloned().ok_or_else(|| ScrapeError::Status {
            url: path.to_string(),
            status: 404,
        })
    }
}

/// Records progress callbacks as plain strings.
#[derive(Default)]
pub struct Recorder {
    pub events: Vec<String>,
}

impl Progress for Recorder {
    fn begin(&mut self, total: usize) {
        self.events.push(format!("begin {total}"));
    }
    fn item_done(&mut self, id: &str) {
        self.events.push(format!("done {id}"));
    }
    fn item_failed(&mut self, id: &str, _reason: &str) {
        self.events.push(format!("failed {id}"));
    }
    fn finish(&mut self) {
        self.events.push("finish".to_string());
    }
}
