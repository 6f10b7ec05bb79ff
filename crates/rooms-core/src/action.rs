//! Closed action sets and their host-facing definitions.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// JSON type of an action parameter, as advertised to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    Integer,
    Boolean,
    Array,
    Object,
}

/// Description of a single action parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSpec {
    /// Parameter name as it appears in the request.
    pub name: &'static str,
    /// Expected JSON type.
    pub kind: ParamType,
    /// Whether the handler rejects calls without it.
    pub required: bool,
}

impl ParamSpec {
    /// A required parameter.
    pub const fn required(name: &'static str, kind: ParamType) -> Self {
        Self {
            name,
            kind,
            required: true,
        }
    }

    /// An optional parameter.
    pub const fn optional(name: &'static str, kind: ParamType) -> Self {
        Self {
            name,
            kind,
            required: false,
        }
    }
}

/// A closed set of named actions exposed by one addon type.
///
/// Implemented by a fieldless enum; the name-to-variant mapping is static, so
/// an unknown name can never reach a handler.
pub trait ActionKind: Copy + Eq + fmt::Debug + Send + Sync + 'static {
    /// Every action of this addon type.
    const ALL: &'static [Self];

    /// The action name used by the workflow engine.
    fn name(self) -> &'static str;

    /// One-line description shown to the host.
    fn description(self) -> &'static str;

    /// Parameters accepted by the action.
    fn parameters(self) -> &'static [ParamSpec] {
        &[]
    }

    /// Retry budget the host may apply. This layer never retries itself.
    fn max_retries(self) -> u32 {
        0
    }

    /// Looks up an action by name.
    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|a| a.name() == name)
    }

    /// Builds the host-facing definition of this action.
    fn definition(self) -> ActionDefinition {
        ActionDefinition::new(
            self.name(),
            self.description(),
            self.parameters(),
            self.max_retries(),
        )
    }
}

/// Per-instance override of an action's advertised metadata.
///
/// Descriptors carry these under `actions`, keyed by action name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<u32>,
}

impl ActionOverride {
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }
}

/// Host-facing description of an action, with a JSON input schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionDefinition {
    pub name: String,
    pub description: String,
    pub max_retries: u32,
    pub input_schema: Value,
}

impl ActionDefinition {
    fn new(name: &str, description: &str, params: &[ParamSpec], max_retries: u32) -> Self {
        let mut properties = Map::new();
        let mut required = Vec::new();
        for param in params {
            properties.insert(param.name.to_string(), json!({ "type": param.kind }));
            if param.required {
                required.push(Value::from(param.name));
            }
        }

        Self {
            name: name.to_string(),
            description: description.to_string(),
            max_retries,
            input_schema: json!({
                "type": "object",
                "properties": properties,
                "required": required,
            }),
        }
    }
}

impl ActionDefinition {
    /// Applies a host override; unset fields keep the built-in value.
    pub fn with_override(mut self, custom: &ActionOverride) -> Self {
        if let Some(description) = &custom.description {
            self.description = description.clone();
        }
        if let Some(max_retries) = custom.max_retries {
            self.max_retries = max_retries;
        }
        self
    }
}
