//! `tether`: decode, normalize and inspect values from the command line.

mod cli;
mod commands;
mod config;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tether_convert::ConverterRegistry;
use tracing::{debug, info};

use crate::cli::Cli;
use crate::config::Sources;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let settings = Sources::from(cli).load()?;
    let _guard =
        tether_log::init_with(settings.log.clone()).context("failed to initialize logging")?;
    debug!(?settings, "configuration loaded");

    let registry = ConverterRegistry::with_builtins();
    for decl in &settings.enums {
        registry.declare(&decl.value_type());
    }
    if !settings.enums.is_empty() {
        info!(count = settings.enums.len(), "declared configured enums");
    }

    let mut out = std::io::stdout().lock();
    commands::execute(&registry, &cli.command, &mut out)
}
