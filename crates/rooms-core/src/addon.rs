//! Addon skeleton: base configuration and the invocation entry point.
//!
//! An addon is a base [`AddonConfig`] plus an addon-specific configuration,
//! composed side by side in an [`AddonDescriptor`]. Each addon type exposes a
//! closed [`ActionKind`] set and implements [`Addon::handle`]; the blanket
//! [`AddonInstance`] impl supplies the uniform `invoke(name, params)` entry
//! point with the enabled check and name lookup.

use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::action::{ActionDefinition, ActionKind, ActionOverride};
use crate::error::ActionError;
use crate::params::Parameters;
use crate::result::ActionResult;

/// A boxed future for object-safe async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Base configuration shared by every addon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddonConfig {
    /// Unique instance identifier within a workflow.
    pub id: String,
    /// Addon kind tag (e.g. `"google_calendars"`).
    #[serde(rename = "type")]
    pub addon_type: String,
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Disabled addons reject every invocation.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Description and retry-budget overrides, keyed by action name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub actions: BTreeMap<String, ActionOverride>,
}

fn default_enabled() -> bool {
    true
}

impl AddonConfig {
    /// Creates an enabled base configuration.
    pub fn new(
        id: impl Into<String>,
        addon_type: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            addon_type: addon_type.into(),
            name: name.into(),
            description: description.into(),
            enabled: true,
            actions: BTreeMap::new(),
        }
    }

    /// Builder: set the enabled flag.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Builder: override an action's advertised metadata.
    pub fn with_action_override(
        mut self,
        action: impl Into<String>,
        custom: ActionOverride,
    ) -> Self {
        self.actions.insert(action.into(), custom);
        self
    }

    /// Override keys that name no action of `A`.
    pub fn unknown_action_overrides<A: ActionKind>(&self) -> Vec<&str> {
        self.actions
            .keys()
            .map(String::as_str)
            .filter(|name| A::from_name(name).is_none())
            .collect()
    }
}

/// An addon descriptor as loaded by the host from workflow JSON.
///
/// `secrets` maps a logical secret key to the environment variable the host
/// reads it from; addons never read the environment themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "C: Serialize",
    deserialize = "C: Deserialize<'de> + Default"
))]
pub struct AddonDescriptor<C> {
    #[serde(flatten)]
    pub base: AddonConfig,
    #[serde(default)]
    pub config: C,
    #[serde(default)]
    pub secrets: BTreeMap<String, String>,
}

impl<C> AddonDescriptor<C> {
    /// Creates a descriptor with no declared secrets.
    pub fn new(base: AddonConfig, config: C) -> Self {
        Self {
            base,
            config,
            secrets: BTreeMap::new(),
        }
    }

    /// Builder: declare a secret and the environment variable holding it.
    pub fn with_secret(mut self, key: impl Into<String>, env_var: impl Into<String>) -> Self {
        self.secrets.insert(key.into(), env_var.into());
        self
    }
}

/// An addon type with a closed action set.
pub trait Addon: Send + Sync {
    /// The actions this addon exposes.
    type Action: ActionKind;

    /// The base configuration of this instance.
    fn config(&self) -> &AddonConfig;

    /// Runs one action. Every failure must come back as an error envelope.
    fn handle(&self, action: Self::Action, params: Parameters) -> BoxFuture<'_, ActionResult>;
}

/// Object-safe view of a loaded addon, used by the host registry.
pub trait AddonInstance: Send + Sync {
    /// The base configuration of this instance.
    fn addon_config(&self) -> &AddonConfig;

    /// Definitions of every action this instance exposes.
    fn action_definitions(&self) -> Vec<ActionDefinition>;

    /// Invokes an action by name.
    fn invoke<'a>(&'a self, action: &'a str, params: Parameters) -> BoxFuture<'a, ActionResult>;
}

impl<T: Addon> AddonInstance for T {
    fn addon_config(&self) -> &AddonConfig {
        self.config()
    }

    fn action_definitions(&self) -> Vec<ActionDefinition> {
        let overrides = &self.config().actions;
        T::Action::ALL
            .iter()
            .map(|a| match overrides.get(a.name()) {
                Some(custom) => a.definition().with_override(custom),
                None => a.definition(),
            })
            .collect()
    }

    fn invoke<'a>(&'a self, action: &'a str, params: Parameters) -> BoxFuture<'a, ActionResult> {
        Box::pin(dispatch(self, action, params))
    }
}

#[tracing::instrument(
    name = "invoke",
    skip_all,
    fields(
        addon_type = %addon.config().addon_type,
        addon_id = %addon.config().id,
        action = %action,
    )
)]
async fn dispatch<T: Addon>(addon: &T, action: &str, params: Parameters) -> ActionResult {
    let config = addon.config();
    if !config.enabled {
        warn!("invocation rejected: addon disabled");
        return ActionResult::error(ActionError::addon_disabled(&config.id));
    }

    let Some(kind) = T::Action::from_name(action) else {
        warn!("invocation rejected: unknown action");
        return ActionResult::error(ActionError::unknown_action(action));
    };

    let start = Instant::now();
    let result = addon.handle(kind, params).await;
    debug!(
        duration_ms = start.elapsed().as_millis() as u64,
        success = result.is_success(),
        "action finished"
    );
    result
}

/// Invokes an action, abandoning it if `cancel` completes first.
///
/// A cancelled invocation yields a `Cancelled` error envelope, never a
/// partial payload.
pub async fn invoke_until<I, F>(
    addon: &I,
    action: &str,
    params: Parameters,
    cancel: F,
) -> ActionResult
where
    I: AddonInstance + ?Sized,
    F: Future<Output = ()>,
{
    tokio::select! {
        biased;
        () = cancel => {
            warn!(addon_id = %addon.addon_config().id, action, "invocation cancelled");
            ActionResult::error(ActionError::cancelled())
        }
        result = addon.invoke(action, params) => result,
    }
}
