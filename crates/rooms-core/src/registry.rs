//! Host-side registry of loaded addon instances.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::action::ActionDefinition;
use crate::addon::{AddonInstance, invoke_until};
use crate::error::{ActionError, ErrorKind};
use crate::params::Parameters;
use crate::result::ActionResult;

/// Errors raised while populating the registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Two instances share an id.
    #[error("duplicate addon instance id: {0}")]
    DuplicateId(String),
}

/// Maps addon instance ids to loaded addons.
///
/// Populated once at workflow start; lookups are read-only afterwards, so a
/// shared `Arc<AddonRegistry>` can serve concurrent invocations.
#[derive(Default)]
pub struct AddonRegistry {
    addons: BTreeMap<String, Arc<dyn AddonInstance>>,
}

impl AddonRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an addon instance under its configured id.
    pub fn register(&mut self, addon: Arc<dyn AddonInstance>) -> Result<(), RegistryError> {
        let id = addon.addon_config().id.clone();
        if self.addons.contains_key(&id) {
            return Err(RegistryError::DuplicateId(id));
        }
        info!(
            addon_id = %id,
            addon_type = %addon.addon_config().addon_type,
            actions = addon.action_definitions().len(),
            "registered addon"
        );
        self.addons.insert(id, addon);
        Ok(())
    }

    /// Returns the addon registered under `id`.
    pub fn get(&self, id: &str) -> Option<Arc<dyn AddonInstance>> {
        self.addons.get(id).cloned()
    }

    /// Returns the registered instance ids, sorted.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.addons.keys().map(String::as_str)
    }

    /// Returns the action definitions of an instance.
    pub fn definitions(&self, id: &str) -> Option<Vec<ActionDefinition>> {
        self.addons.get(id).map(|a| a.action_definitions())
    }

    /// Invokes `action` on the instance registered under `instance_id`.
    pub async fn invoke(
        &self,
        instance_id: &str,
        action: &str,
        params: Parameters,
    ) -> ActionResult {
        match self.addons.get(instance_id) {
            Some(addon) => addon.invoke(action, params).await,
            None => unknown_instance(instance_id),
        }
    }

    /// Like [`invoke`](Self::invoke), abandoning the call if `cancel` fires.
    pub async fn invoke_until<F>(
        &self,
        instance_id: &str,
        action: &str,
        params: Parameters,
        cancel: F,
    ) -> ActionResult
    where
        F: Future<Output = ()>,
    {
        match self.addons.get(instance_id) {
            Some(addon) => invoke_until(addon.as_ref(), action, params, cancel).await,
            None => unknown_instance(instance_id),
        }
    }
}

fn unknown_instance(instance_id: &str) -> ActionResult {
    warn!(addon_id = %instance_id, "no addon registered under this id");
    ActionResult::error(ActionError::new(
        ErrorKind::UnknownAction,
        format!("no addon instance '{}' is registered", instance_id),
    ))
}
