//! The `invoke` command.

use std::future::Future;
use std::path::Path;

use rooms_core::{ActionResult, Parameters, invoke_until};
use serde_json::Value;
use tracing::info;

use crate::descriptor::Descriptor;
use crate::error::{CliError, CliResult};

/// Parses `--params` into an action parameter set.
pub(crate) fn parse_params(raw: &str) -> CliResult<Parameters> {
    let value: Value = serde_json::from_str(raw).map_err(|e| CliError::Params(e.to_string()))?;
    Parameters::from_value(value).map_err(|e| CliError::Params(e.message().to_string()))
}

/// Invokes an action, cancelling it on Ctrl-C.
///
/// Returns the result envelope; the caller decides the exit status.
pub async fn invoke(path: &Path, action: &str, raw_params: &str) -> CliResult<ActionResult> {
    invoke_with_cancel(path, action, raw_params, ctrl_c()).await
}

/// Invokes an action, cancelling it when `cancel` completes.
pub async fn invoke_with_cancel<F>(
    path: &Path,
    action: &str,
    raw_params: &str,
    cancel: F,
) -> CliResult<ActionResult>
where
    F: Future<Output = ()>,
{
    let params = parse_params(raw_params)?;
    let addon = Descriptor::load(path)?.build()?;
    info!(addon_id = %addon.addon_config().id, action, "invoking action");
    Ok(invoke_until(addon.as_ref(), action, params, cancel).await)
}

/// Resolves on Ctrl-C. Never resolves if the signal handler cannot be set.
async fn ctrl_c() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}
