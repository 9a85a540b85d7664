//! taxi-inspect CLI entry point.

use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;

use taxi_inspect::cli::{Cli, Command};
use taxi_inspect::commands;
use taxi_inspect::config::InspectConfig;
use taxi_inspect::error::InspectResult;
use taxi_inspect::tracing::{TracingConfig, init_tracing};

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> InspectResult<()> {
    let config = match cli.config {
        Some(ref path) => InspectConfig::load_from(path)?,
        None => InspectConfig::load()?,
    };

    let mut tracing_config = if cli.debug {
        TracingConfig::debug()
    } else {
        TracingConfig::default()
            .with_level(config.log_level()?)
            .with_format(config.logging.format)
    };
    if let Some(format) = cli.log_format {
        tracing_config = tracing_config.with_format(format);
    }
    init_tracing(tracing_config)?;

    let mut stdout = io::stdout().lock();
    match cli.command {
        Command::Decode(args) => {
            commands::decode::run(&args, &config, &mut stdout)?;
        }
        Command::EncodeMessage(args) => {
            commands::encode::run(&args, &config)?;
        }
        Command::Codes { pretty } => {
            commands::codes::run(pretty || config.output.pretty, &mut stdout)?;
        }
    }
    stdout.flush()?;
    Ok(())
}
