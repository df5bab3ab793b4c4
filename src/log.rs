// src/log.rs
use tracing_subscriber::{EnvFilter, fmt as tfmt};

/// Stderr subscriber. `RUST_LOG` wins; otherwise `info`, or `debug` with `-v`.
/// Calling it twice is harmless (tests, embedding).
pub fn init(verbose: bool) {
    let default = if verbose { "bref_scrape=debug,info" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .with_file(false)
        .with_line_number(false)
        .try_init();
}
