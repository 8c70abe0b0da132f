//! Storefront command line

use std::{
    io::{self, Write},
    process::ExitCode,
};

use tracing::error;

use crate::cli::{commands, config::CliConfig, logging};

mod cli;

/// Storefront entry point
#[tokio::main]
async fn main() -> ExitCode {
    let config = match CliConfig::load() {
        Ok(config) => config,
        Err(parse_error) => {
            // Help and version requests also land here.
            _ = parse_error.print();

            return ExitCode::from(u8::try_from(parse_error.exit_code()).unwrap_or(2));
        }
    };

    if let Err(init_error) = logging::init_subscriber(&config.logging) {
        _ = writeln!(io::stderr(), "failed to initialise logging: {init_error}");
    }

    let mut stdout = io::stdout().lock();

    match commands::run(config, &mut stdout).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(run_error) => {
            error!(error = %run_error, "command failed");

            _ = writeln!(io::stderr(), "error: {run_error}");

            ExitCode::FAILURE
        }
    }
}
