//! rooms-addon harness library.
//!
//! Loads an addon descriptor, resolves its secrets from the environment and
//! invokes actions the way the Rooms workflow engine would.

pub mod cli;
pub mod commands;
pub mod descriptor;
pub mod error;
pub mod secret;

pub use descriptor::Descriptor;
pub use error::{CliError, CliResult};
