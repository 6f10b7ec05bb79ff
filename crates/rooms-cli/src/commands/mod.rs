//! Subcommand implementations.

mod invoke;

use std::path::Path;

pub use invoke::{invoke, invoke_with_cancel};

use crate::descriptor::Descriptor;
use crate::error::{CliError, CliResult};

/// Print the action definitions of the described addon.
pub fn actions(path: &Path) -> CliResult<()> {
    let addon = Descriptor::load(path)?.build_offline()?;
    let definitions = addon.action_definitions();
    let rendered = serde_json::to_string_pretty(&definitions)
        .map_err(|e| CliError::Descriptor(format!("failed to render definitions: {}", e)))?;
    println!("{}", rendered);
    Ok(())
}

/// Load and validate a descriptor, reporting unresolved secrets.
pub fn validate(path: &Path) -> CliResult<()> {
    let descriptor = Descriptor::load(path)?;
    let unresolved: Vec<String> = descriptor
        .secrets()
        .iter()
        .filter(|(_, reference)| crate::secret::resolve(reference).is_err())
        .map(|(key, _)| key.clone())
        .collect();

    let addon = descriptor.build_offline()?;
    let config = addon.addon_config();
    println!(
        "Descriptor '{}' ({}) is valid: {} action(s), {}.",
        config.id,
        config.addon_type,
        addon.action_definitions().len(),
        if config.enabled { "enabled" } else { "disabled" }
    );

    if !unresolved.is_empty() {
        return Err(CliError::Credentials(unresolved));
    }
    Ok(())
}
