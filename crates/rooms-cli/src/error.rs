//! CLI error types.

use std::fmt;

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// Errors that stop the harness before or around an invocation.
#[derive(Debug)]
pub enum CliError {
    /// The descriptor could not be read, parsed or validated.
    Descriptor(String),
    /// Declared secrets could not be resolved.
    Credentials(Vec<String>),
    /// The `--params` argument is not a JSON object.
    Params(String),
    /// Logging setup failed.
    Tracing(String),
    /// IO error.
    Io(std::io::Error),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Descriptor(msg) => write!(f, "descriptor error: {}", msg),
            Self::Credentials(keys) => {
                write!(f, "missing credentials: {}", keys.join(", "))
            }
            Self::Params(msg) => write!(f, "invalid parameters: {}", msg),
            Self::Tracing(msg) => write!(f, "logging setup failed: {}", msg),
            Self::Io(err) => write!(f, "IO error: {}", err),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<rooms_gcal::ConfigError> for CliError {
    fn from(err: rooms_gcal::ConfigError) -> Self {
        Self::Descriptor(err.to_string())
    }
}

impl From<rooms_core::TracingError> for CliError {
    fn from(err: rooms_core::TracingError) -> Self {
        Self::Tracing(err.to_string())
    }
}
