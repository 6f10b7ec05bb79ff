//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use rooms_core::{LogFormat, TracingConfig};
use tracing::Level;

/// rooms-addon - load a Rooms addon descriptor and invoke its actions
#[derive(Debug, Parser)]
#[command(name = "rooms-addon")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug output
    #[arg(long, short = 'v', global = true)]
    pub debug: bool,

    /// Log line format
    #[arg(long, value_enum, default_value = "compact", env = "ROOMS_LOG_FORMAT", global = true)]
    pub log_format: LogFormatArg,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Subscriber settings: terse debug output with `--debug`, warnings only
    /// otherwise.
    pub fn tracing_config(&self) -> TracingConfig {
        let config = if self.debug {
            TracingConfig::cli_debug()
        } else {
            TracingConfig::default().with_level(Level::WARN)
        };
        config.with_format(self.log_format.into())
    }
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the action definitions of an addon as JSON
    Actions {
        /// Path to the addon descriptor (.json or .toml)
        #[arg(long, short, env = "ROOMS_ADDON_DESCRIPTOR")]
        descriptor: PathBuf,
    },

    /// Load and validate a descriptor
    Validate {
        /// Path to the addon descriptor (.json or .toml)
        #[arg(long, short, env = "ROOMS_ADDON_DESCRIPTOR")]
        descriptor: PathBuf,
    },

    /// Invoke an action and print the result envelope
    Invoke {
        /// Path to the addon descriptor (.json or .toml)
        #[arg(long, short, env = "ROOMS_ADDON_DESCRIPTOR")]
        descriptor: PathBuf,

        /// Action name (e.g. list_events)
        #[arg(long, short)]
        action: String,

        /// Action parameters as a JSON object
        #[arg(long, short, default_value = "{}")]
        params: String,
    },
}

/// Log format selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}
