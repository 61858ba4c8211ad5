//! Playground CLI Binary
//!
//! Serves the project API and exposes project and config tooling.

use anyhow::Context;
use clap::Parser;
use playground::logging::init_logging;
use playground::tooling::cli::{Cli, CliContext};
use std::process;

fn run(cli: &Cli) -> anyhow::Result<String> {
    let context = CliContext::new(cli.workspace.clone(), cli.config.clone())
        .context("Error initializing workspace")?;
    init_logging(&cli.logging_config(&context.config().logging))
        .context("Error initializing logging")?;
    let output = context.execute(&cli.command)?;
    Ok(output)
}

fn main() {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(output) => {
            println!("{}", output);
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}
