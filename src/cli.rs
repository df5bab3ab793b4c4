// src/cli.rs
//! Command-line interface: argument definitions and the command runners.

use std::{
    collections::HashMap,
    io::{self, Write},
    path::PathBuf,
    time::Duration,
};

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{info, warn};

use crate::{
    config::consts::{DEFAULT_LAST, DEFAULT_OUT_DIR, LOOKUP_LIMIT},
    config::options::{AppOptions, ExportFormat, ExportOptions, FetchConfig, HeaderStyle, ScrapeOptions},
    core::net::{Fetch, HttpFetcher},
    engine::GameSelection,
    error::{Result, ScrapeError},
    file,
    progress::Progress,
    scrape::{self, BatchReport},
    specs::search,
};

/// Basketball Reference scraper: season per-game stats and player game logs as CSV.
///
/// # Examples
///
/// ```sh
/// bref_scrape players --season 2024
/// bref_scrape game-logs jamesle01 curryst01 --last 10
/// bref_scrape game-logs --input-file ids.txt --all-games --combined-output all.csv
/// bref_scrape lookup LeBron James
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Csv, global = true)]
    pub format: Format,

    /// Write display labels (PTS) instead of column keys (pts) in the header
    #[arg(long, global = true)]
    pub labels: bool,

    /// Pause between requests, in milliseconds
    #[arg(long, global = true)]
    pub pause_ms: Option<u64>,

    /// Debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Download per-game stats for all players in a season
    Players {
        /// Season end year (2024 for 2023-24). Defaults to the latest season.
        #[arg(long)]
        season: Option<u16>,

        /// Output file. Defaults to players_<season>.csv
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Download the last N game logs for one or more players
    GameLogs(GameLogsArgs),

    /// Find player ids by name
    Lookup {
        /// Player name, e.g. LeBron James
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },
}

#[derive(Args, Debug)]
pub struct GameLogsArgs {
    /// Player ids (e.g. jamesle01)
    pub player_ids: Vec<String>,

    /// File with one player id per line; `#` starts a comment
    #[arg(short, long)]
    pub input_file: Option<PathBuf>,

    /// Season end year. Defaults to the latest season.
    #[arg(long)]
    pub season: Option<u16>,

    /// How many recent games to keep; 0 keeps all
    #[arg(long, default_value_t = DEFAULT_LAST, conflicts_with = "all_games")]
    pub last: usize,

    /// Keep every game of the season
    #[arg(long)]
    pub all_games: bool,

    /// Directory for per-player files
    #[arg(long, default_value = DEFAULT_OUT_DIR)]
    pub output_dir: PathBuf,

    /// Write all players into this one file instead
    #[arg(long)]
    pub combined_output: Option<PathBuf>,

    /// Fail instead of falling back to an earlier season
    #[arg(long)]
    pub strict_season: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Csv,
    Tsv,
}

impl From<Format> for ExportFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Csv => ExportFormat::Csv,
            Format::Tsv => ExportFormat::Tsv,
        }
    }
}

impl GameLogsArgs {
    pub fn selection(&self) -> GameSelection {
        if self.all_games || self.last == 0 {
            GameSelection::All
        } else {
            GameSelection::Last(self.last)
        }
    }
}

impl Cli {
    /// Flags → library options.
    pub fn options(&self) -> AppOptions {
        let mut fetch = FetchConfig::default();
        if let Some(ms) = self.pause_ms {
            fetch.pause = Duration::from_millis(ms);
        }

        let mut opts = AppOptions {
            scrape: ScrapeOptions::default(),
            export: ExportOptions {
                format: self.format.into(),
                header_style: if self.labels { HeaderStyle::Label } else { HeaderStyle::Key },
                ..ExportOptions::default()
            },
            fetch,
        };

        match &self.command {
            Command::Players { season, .. } => opts.scrape.season = *season,
            Command::GameLogs(a) => {
                opts.scrape.season = a.season;
                opts.scrape.games = a.selection();
                opts.scrape.strict_season = a.strict_season;
                opts.export.out_dir = a.output_dir.clone();
                opts.export.combined = a.combined_output.clone();
            }
            Command::Lookup { .. } => {}
        }
        opts
    }
}

/// Prints one status line per player to stderr.
pub struct CliProgress {
    total: usize,
    done: usize,
}

impl CliProgress {
    pub fn new() -> Self {
        Self { total: 0, done: 0 }
    }
}

impl Default for CliProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl Progress for CliProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
        self.done = 0;
    }

    fn log(&mut self, msg: &str) {
        info!("{msg}");
    }

    fn item_done(&mut self, id: &str) {
        self.done += 1;
        eprintln!("[{}/{}] {id}", self.done, self.total);
    }

    fn item_failed(&mut self, id: &str, reason: &str) {
        self.done += 1;
        eprintln!("[{}/{}] {id} failed: {reason}", self.done, self.total);
    }
}

pub fn run(cli: &Cli) -> Result<()> {
    let opts = cli.options();
    let mut fetcher = HttpFetcher::new(opts.fetch.clone())?;
    let mut out = io::stdout().lock();

    match &cli.command {
        Command::Players { output, .. } => run_players(&mut fetcher, &opts, output.clone(), &mut out),
        Command::GameLogs(args) => run_game_logs(&mut fetcher, &opts, args, &mut out),
        Command::Lookup { name } => run_lookup(&mut fetcher, &name.join(" "), &mut out),
    }
}

pub fn run_players<F: Fetch, W: Write>(
    fetcher: &mut F,
    opts: &AppOptions,
    output: Option<PathBuf>,
    out: &mut W,
) -> Result<()> {
    let season = scrape::resolve_season(fetcher, opts.scrape.season)?;
    let set = scrape::collect_per_game(fetcher, season)?;
    let default_name = format!("players_{season}.{}", opts.export.format.ext());
    let path = match output {
        Some(p) => file::resolve_out_path(&p, &default_name),
        None => PathBuf::from(default_name),
    };
    let written = file::write_record_set(&path, &set, &opts.export)?;
    writeln!(out, "Saved per-game stats for season {season} to {}", written.display())?;
    Ok(())
}

pub fn run_game_logs<F: Fetch, W: Write>(
    fetcher: &mut F,
    opts: &AppOptions,
    args: &GameLogsArgs,
    out: &mut W,
) -> Result<()> {
    let ids = scrape::load_player_ids(&args.player_ids, args.input_file.as_deref())?;
    let season = scrape::resolve_season(fetcher, opts.scrape.season)?;

    let mut progress = CliProgress::new();
    let mut report = scrape::collect_game_logs(fetcher, &ids, &opts.scrape, season, Some(&mut progress))?;
    let written = write_game_logs(&mut report, opts, out)?;

    for (id, e) in &report.failures {
        eprintln!("{id}: {e}");
    }
    if written.is_empty() {
        return Err(batch_failure(report));
    }
    Ok(())
}

/// Per-player files, or the one combined file when asked for.
/// A per-player write error is added to `report.failures`; the others are still written.
pub fn write_game_logs<W: Write>(report: &mut BatchReport, opts: &AppOptions, out: &mut W) -> Result<Vec<PathBuf>> {
    if report.is_empty() {
        return Ok(Vec::new());
    }
    let export = &opts.export;
    let label = opts.scrape.games.label();

    if let Some(combined) = &export.combined {
        let merged = report.combined();
        let default_name = format!("game_logs_{label}.{}", export.format.ext());
        let path = file::resolve_out_path(combined, &default_name);
        let written = file::write_record_set(&path, &merged.set, export)?;
        writeln!(
            out,
            "Saved {label} games for {} players to {}",
            report.sets.len(),
            written.display()
        )?;
        return Ok(vec![written]);
    }

    file::ensure_directory(&export.out_dir)?;
    let mut seen = HashMap::new();
    let mut written = Vec::with_capacity(report.sets.len());
    for p in &report.sets {
        let path = file::per_player_path(&export.out_dir, &p.player_id, &label, p.season, export.format.ext(), &mut seen);
        let path = match file::write_record_set(&path, &p.set, export) {
            Ok(path) => path,
            Err(e) => {
                warn!(player_id = %p.player_id, path = %path.display(), error = %e, "write failed");
                report.failures.push((p.player_id.clone(), e));
                continue;
            }
        };
        writeln!(
            out,
            "Saved {} games for {} (season {}) to {}",
            p.set.len(),
            p.player_id,
            p.season,
            path.display()
        )?;
        written.push(path);
    }
    Ok(written)
}

/// Nothing was produced: report the last failure, network ones first.
fn batch_failure(report: BatchReport) -> ScrapeError {
    let mut failures = report.failures;
    let pos = failures
        .iter()
        .rposition(|(_, e)| e.is_network())
        .unwrap_or(failures.len().saturating_sub(1));
    if failures.is_empty() {
        return ScrapeError::NoPlayers;
    }
    failures.swap_remove(pos).1
}

pub fn run_lookup<F: Fetch, W: Write>(fetcher: &mut F, query: &str, out: &mut W) -> Result<()> {
    let found = search::lookup(fetcher, query)?;
    if found.is_empty() {
        writeln!(out, "No players found for: {query}")?;
        return Ok(());
    }
    if found.len() > LOOKUP_LIMIT {
        warn!(matches = found.len(), shown = LOOKUP_LIMIT, "more matches than shown");
    }
    for m in found.iter().take(LOOKUP_LIMIT) {
        writeln!(out, "{}: {} ({})", m.id, m.name, m.url)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn game_logs_defaults() {
        let cli = Cli::parse_from(["bref_scrape", "game-logs", "jamesle01", "curryst01"]);
        let Command::GameLogs(args) = &cli.command else { panic!("wrong subcommand") };
        assert_eq!(args.player_ids, ["jamesle01", "curryst01"]);
        assert_eq!(args.selection(), GameSelection::Last(15));
        let opts = cli.options();
        assert_eq!(opts.export.out_dir, PathBuf::from("game_logs"));
        assert_eq!(opts.export.format, ExportFormat::Csv);
        assert_eq!(opts.export.header_style, HeaderStyle::Key);
        assert!(!opts.scrape.strict_season);
    }

    #[test]
    fn last_zero_means_all() {
        let cli = Cli::parse_from(["bref_scrape", "game-logs", "x", "--last", "0"]);
        assert_eq!(cli.options().scrape.games, GameSelection::All);
        let cli = Cli::parse_from(["bref_scrape", "game-logs", "x", "--all-games"]);
        assert_eq!(cli.options().scrape.games, GameSelection::All);
    }

    #[test]
    fn last_and_all_games_conflict() {
        assert!(Cli::try_parse_from(["bref_scrape", "game-logs", "x", "--last", "3", "--all-games"]).is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "bref_scrape", "players", "--season", "2024", "--format", "tsv", "--labels", "--pause-ms", "0", "-v",
        ]);
        let opts = cli.options();
        assert_eq!(opts.scrape.season, Some(2024));
        assert_eq!(opts.export.format, ExportFormat::Tsv);
        assert_eq!(opts.export.header_style, HeaderStyle::Label);
        assert_eq!(opts.fetch.pause, Duration::ZERO);
        assert!(cli.verbose);
    }

    #[test]
    fn lookup_needs_a_name() {
        assert!(Cli::try_parse_from(["bref_scrape", "lookup"]).is_err());
        let cli = Cli::parse_from(["bref_scrape", "lookup", "LeBron", "James"]);
        assert!(matches!(&cli.command, Command::Lookup { name } if name.join(" ") == "LeBron James"));
    }

    #[test]
    fn nothing_produced_prefers_network_error() {
        let report = BatchReport {
            sets: Vec::new(),
            failures: vec![
                (s!("a"), ScrapeError::Status { url: s!("u"), status: 503 }),
                (s!("b"), ScrapeError::TableNotFound { table_id: s!("pgl_basic") }),
            ],
        };
        assert!(batch_failure(report).is_network());
    }
}
