//! yasp CLI - word and phoneme timing tool

use clap::Parser;
use eyre::Result;
use yasp_cli::cli::{Cli, run_cli};
use yasp_cli::logging;

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let _guards = logging::init(&cli.logfile);

    run_cli(cli)
}
