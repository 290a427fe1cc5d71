//! catchlog CLI: diagnostic reports for topic-modeling runs.
//!
//! Loads a JSON snapshot of clustering output and renders it into a
//! report log, echoed to stdout.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
