//! rooms-addon entry point.

use std::process::ExitCode;

use clap::Parser;
use rooms_core::init_tracing;

use rooms_cli::cli::{Cli, Command};
use rooms_cli::commands;
use rooms_cli::error::CliResult;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Runs the selected command. `Ok(false)` means the action returned an
/// error envelope.
async fn run(cli: Cli) -> CliResult<bool> {
    init_tracing(cli.tracing_config())?;

    match cli.command {
        Command::Actions { descriptor } => commands::actions(&descriptor).map(|()| true),
        Command::Validate { descriptor } => commands::validate(&descriptor).map(|()| true),
        Command::Invoke {
            descriptor,
            action,
            params,
        } => {
            let result = commands::invoke(&descriptor, &action, &params).await?;
            let rendered = serde_json::to_string_pretty(&result).map_err(std::io::Error::from)?;
            println!("{}", rendered);
            Ok(result.is_success())
        }
    }
}
