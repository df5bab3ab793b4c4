// src/config/consts.rs

// Net config
pub const BASE_URL: &str = "https://www.basketball-reference.com";
pub const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/122.0 Safari/537.36";
pub const TIMEOUT_SECS: u64 = 30;

// Pacing: the site throttles at roughly 20 requests a minute
pub const REQUEST_PAUSE_MS: u64 = 3_100;
pub const MAX_RETRIES: u32 = 3;
pub const BACKOFF_BASE_MS: u64 = 2_000;

// Tables
pub const PER_GAME_TABLE: &str = "per_game_stats";
pub const GAME_LOG_TABLES: &[&str] = &["pgl_basic", "player_game_log_reg"];
pub const LEAGUES_TABLE: &str = "leagues_active";

// Seasons
pub const GAME_LOG_FALLBACK_SEASONS: u16 = 4;
pub const GAME_LOG_OLDEST_FALLBACK: u16 = 2000;
pub const SEASON_WALK_BACK: u16 = 5;

// Export
pub const DEFAULT_LAST: usize = 15;
pub const DEFAULT_OUT_DIR: &str = "game_logs";
pub const LOOKUP_LIMIT: usize = 20;
