// src/bin/cli.rs
use bref_scrape::{cli, log};
use clap::Parser;
use color_eyre::eyre::{Report, Result};

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = cli::Cli::parse();
    log::init(args.verbose);

    if let Err(e) = cli::run(&args) {
        // 1: network, 2: page content
        let (code, context) = if e.is_network() {
            (1, "Network error")
        } else {
            (2, "Failed to scrape data")
        };
        eprintln!("{:?}", Report::new(e).wrap_err(context));
        std::process::exit(code);
    }
    Ok(())
}
