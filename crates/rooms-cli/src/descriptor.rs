//! Descriptor loading.
//!
//! A descriptor is JSON, or TOML when the file ends in `.toml`. The `type`
//! field selects the addon implementation.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use rooms_core::{AddonDescriptor, AddonInstance, ExampleAddon};
use rooms_gcal::{CalendarDescriptor, GoogleCalendarsAddon, descriptor_from_value};
use serde_json::Value;
use tracing::debug;

use crate::error::{CliError, CliResult};
use crate::secret;

/// A parsed descriptor of a known addon type.
#[derive(Debug, Clone)]
pub enum Descriptor {
    Calendar(CalendarDescriptor),
    Template(AddonDescriptor<Value>),
}

impl Descriptor {
    /// Reads and parses a descriptor file.
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CliError::Descriptor(format!("failed to read {}: {}", path.display(), e))
        })?;
        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        let value: Value = if is_toml {
            toml::from_str(&content)
                .map_err(|e| CliError::Descriptor(format!("failed to parse TOML: {}", e)))?
        } else {
            serde_json::from_str(&content)
                .map_err(|e| CliError::Descriptor(format!("failed to parse JSON: {}", e)))?
        };
        debug!(path = %path.display(), toml = is_toml, "descriptor loaded");
        Self::from_value(value)
    }

    /// Dispatches on the `type` field.
    pub fn from_value(value: Value) -> CliResult<Self> {
        let addon_type = value
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| CliError::Descriptor("descriptor has no 'type' field".to_string()))?
            .to_string();

        match addon_type.as_str() {
            GoogleCalendarsAddon::TYPE => Ok(Self::Calendar(descriptor_from_value(value)?)),
            ExampleAddon::TYPE => Ok(Self::Template(
                serde_json::from_value(value).map_err(|e| CliError::Descriptor(e.to_string()))?,
            )),
            other => Err(CliError::Descriptor(format!(
                "unknown addon type '{}'",
                other
            ))),
        }
    }

    pub fn secrets(&self) -> &BTreeMap<String, String> {
        match self {
            Self::Calendar(d) => &d.secrets,
            Self::Template(d) => &d.secrets,
        }
    }

    /// Resolves secrets and builds the addon.
    ///
    /// Fails if any required credential is unavailable.
    pub fn build(self) -> CliResult<Arc<dyn AddonInstance>> {
        let credentials = Arc::new(secret::resolve_all(self.secrets()));
        match self {
            Self::Calendar(descriptor) => {
                let addon = GoogleCalendarsAddon::from_descriptor(descriptor, credentials)?;
                let missing = addon.missing_credentials();
                if !missing.is_empty() {
                    return Err(CliError::Credentials(missing));
                }
                Ok(Arc::new(addon))
            }
            Self::Template(descriptor) => Ok(Arc::new(ExampleAddon::new(descriptor.base))),
        }
    }

    /// Builds the addon without resolving secrets, for introspection.
    pub fn build_offline(self) -> CliResult<Arc<dyn AddonInstance>> {
        match self {
            Self::Calendar(descriptor) => {
                let credentials = Arc::new(rooms_core::StaticCredentials::new());
                Ok(Arc::new(GoogleCalendarsAddon::from_descriptor(
                    descriptor,
                    credentials,
                )?))
            }
            Self::Template(descriptor) => Ok(Arc::new(ExampleAddon::new(descriptor.base))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const GCAL_JSON: &str = r#"{
        "id": "gcal-main",
        "type": "google_calendars",
        "name": "Google Calendars",
        "description": "Team calendar",
        "config": {"default_timezone": "UTC"},
        "secrets": {"google_calendars_api_key": "_ROOMS_CLI_TEST_UNSET_TOKEN"}
    }"#;

    const TEMPLATE_TOML: &str = r#"
id = "tpl"
type = "template"
name = "Template"
description = "Example addon"
enabled = false
"#;

    fn write_file(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_json_calendar_descriptor() {
        let file = write_file(".json", GCAL_JSON);
        let descriptor = Descriptor::load(file.path()).unwrap();
        let Descriptor::Calendar(d) = &descriptor else {
            panic!("expected a calendar descriptor");
        };
        assert_eq!(d.base.id, "gcal-main");
        assert_eq!(d.config.default_timezone, "UTC");
        assert_eq!(
            descriptor.secrets()["google_calendars_api_key"],
            "_ROOMS_CLI_TEST_UNSET_TOKEN"
        );
    }

    #[test]
    fn loads_toml_template_descriptor() {
        let file = write_file(".toml", TEMPLATE_TOML);
        let descriptor = Descriptor::load(file.path()).unwrap();
        let Descriptor::Template(d) = descriptor else {
            panic!("expected a template descriptor");
        };
        assert_eq!(d.base.id, "tpl");
        assert!(!d.base.enabled);
    }

    #[test]
    fn rejects_unknown_type_and_bad_config() {
        let err = Descriptor::from_value(serde_json::json!({
            "id": "x", "type": "slack", "name": "n", "description": "d"
        }))
        .unwrap_err();
        assert!(err.to_string().contains("unknown addon type"));

        let err = Descriptor::from_value(serde_json::json!({
            "id": "x", "type": "google_calendars", "name": "n", "description": "d",
            "config": {"default_max_results": 1000}
        }))
        .unwrap_err();
        assert!(matches!(err, CliError::Descriptor(_)));
        assert!(err.to_string().contains("default_max_results"));

        let file = write_file(".json", "{not json");
        assert!(Descriptor::load(file.path()).is_err());
    }

    #[test]
    fn unresolved_secret_blocks_build() {
        let file = write_file(".json", GCAL_JSON);
        let descriptor = Descriptor::load(file.path()).unwrap();
        match descriptor.build() {
            Err(CliError::Credentials(keys)) => {
                assert_eq!(keys, vec!["google_calendars_api_key".to_string()]);
            }
            other => panic!("expected missing credentials, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn offline_build_lists_actions() {
        let file = write_file(".json", GCAL_JSON);
        let addon = Descriptor::load(file.path())
            .unwrap()
            .build_offline()
            .unwrap();
        let names: Vec<String> = addon
            .action_definitions()
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(names, vec!["list_events", "freebusy_query", "create_events"]);
    }
}
