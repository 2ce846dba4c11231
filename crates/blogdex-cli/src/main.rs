mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

use crate::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    commands::init_logging(cli.verbose, cli.quiet);
    commands::run(cli.command)
}
