//! Template addon with a single `example` action.
//!
//! Starting point for new addons and a network-free way to exercise the
//! skeleton end to end.

use serde_json::{Value, json};
use tracing::debug;

use crate::action::{ActionKind, ParamSpec, ParamType};
use crate::addon::{Addon, AddonConfig, BoxFuture};
use crate::error::Outcome;
use crate::params::Parameters;
use crate::result::ActionResult;

/// Actions of the template addon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateAction {
    Example,
}

const EXAMPLE_PARAMS: &[ParamSpec] = &[
    ParamSpec::required("param1", ParamType::String),
    ParamSpec::optional("param2", ParamType::String),
];

impl ActionKind for TemplateAction {
    const ALL: &'static [Self] = &[Self::Example];

    fn name(self) -> &'static str {
        "example"
    }

    fn description(self) -> &'static str {
        "Echo the given parameters back with a processing marker"
    }

    fn parameters(self) -> &'static [ParamSpec] {
        EXAMPLE_PARAMS
    }
}

/// The template addon.
#[derive(Debug, Clone)]
pub struct ExampleAddon {
    config: AddonConfig,
}

impl ExampleAddon {
    /// Addon type tag.
    pub const TYPE: &'static str = "template";

    pub fn new(config: AddonConfig) -> Self {
        Self { config }
    }

    fn example(&self, params: &Parameters) -> Outcome<Value> {
        let param1 = params.required_str("param1")?;
        let param2 = params.get("param2").cloned().unwrap_or(Value::Null);
        debug!(param1, "example action");
        Ok(json!({
            "processed": format!("{}- processed -", param1),
            "param2": param2,
        }))
    }
}

impl Addon for ExampleAddon {
    type Action = TemplateAction;

    fn config(&self) -> &AddonConfig {
        &self.config
    }

    fn handle(&self, action: TemplateAction, params: Parameters) -> BoxFuture<'_, ActionResult> {
        Box::pin(async move {
            match action {
                TemplateAction::Example => self.example(&params).into(),
            }
        })
    }
}
