//! The Google Calendars addon.

use std::collections::BTreeSet;
use std::sync::Arc;

use rooms_core::{
    Addon, AddonConfig, ActionResult, BoxFuture, CredentialProvider, Outcome, Parameters,
};
use serde_json::Value;
use tracing::{error, info, warn};

use crate::actions::{
    API_KEY_SECRET, ActionContext, CalendarAction, create_events, freebusy_query, list_events,
};
use crate::config::{CalendarDefaults, CalendarDescriptor, ConfigError};
use crate::google::{CalendarApi, GoogleCalendarClient};

/// An instance of the Google Calendars addon.
///
/// Holds immutable configuration plus shared handles to the transport and
/// the host's credential provider; concurrent invocations share nothing else.
pub struct GoogleCalendarsAddon {
    config: AddonConfig,
    defaults: CalendarDefaults,
    secrets: BTreeSet<String>,
    api: Arc<dyn CalendarApi>,
    credentials: Arc<dyn CredentialProvider>,
}

impl GoogleCalendarsAddon {
    /// Addon type tag.
    pub const TYPE: &'static str = "google_calendars";

    /// Builds an instance talking to the public Google Calendar API.
    pub fn from_descriptor(
        descriptor: CalendarDescriptor,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Result<Self, ConfigError> {
        let client = GoogleCalendarClient::new()?;
        Self::with_api(descriptor, Arc::new(client), credentials)
    }

    /// Builds an instance over any [`CalendarApi`] implementation.
    pub fn with_api(
        descriptor: CalendarDescriptor,
        api: Arc<dyn CalendarApi>,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Result<Self, ConfigError> {
        if descriptor.base.addon_type != Self::TYPE {
            return Err(ConfigError::Invalid(format!(
                "addon type '{}' is not '{}'",
                descriptor.base.addon_type,
                Self::TYPE
            )));
        }
        if descriptor.base.id.trim().is_empty() {
            return Err(ConfigError::Invalid("addon id must not be empty".to_string()));
        }
        descriptor.config.validate()?;
        let unknown = descriptor
            .base
            .unknown_action_overrides::<CalendarAction>();
        if !unknown.is_empty() {
            return Err(ConfigError::Invalid(format!(
                "action overrides name unknown actions: {}",
                unknown.join(", ")
            )));
        }

        info!(
            addon_id = %descriptor.base.id,
            enabled = descriptor.base.enabled,
            default_calendar_id = %descriptor.config.default_calendar_id,
            default_timezone = %descriptor.config.default_timezone,
            "google calendars addon loaded"
        );

        Ok(Self {
            config: descriptor.base,
            defaults: descriptor.config,
            secrets: descriptor.secrets.into_keys().collect(),
            api,
            credentials,
        })
    }

    /// Secret keys this instance needs that the provider cannot supply.
    ///
    /// The API key is always required, declared or not.
    pub fn missing_credentials(&self) -> Vec<String> {
        let mut required = self.secrets.clone();
        required.insert(API_KEY_SECRET.to_string());
        required
            .into_iter()
            .filter(|key| self.credentials.credential(key).is_none())
            .collect()
    }

    fn context(&self) -> ActionContext<'_> {
        ActionContext {
            defaults: &self.defaults,
            api: self.api.as_ref(),
            credentials: self.credentials.as_ref(),
        }
    }

    async fn run(&self, action: CalendarAction, params: Parameters) -> Outcome<Value> {
        let ctx = self.context();
        match action {
            CalendarAction::ListEvents => list_events::run(&ctx, &params).await,
            CalendarAction::FreebusyQuery => freebusy_query::run(&ctx, &params).await,
            CalendarAction::CreateEvents => create_events::run(&ctx, &params).await,
        }
    }
}

impl std::fmt::Debug for GoogleCalendarsAddon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleCalendarsAddon")
            .field("config", &self.config)
            .field("defaults", &self.defaults)
            .field("secrets", &self.secrets)
            .finish_non_exhaustive()
    }
}

impl Addon for GoogleCalendarsAddon {
    type Action = CalendarAction;

    fn config(&self) -> &AddonConfig {
        &self.config
    }

    fn handle(&self, action: CalendarAction, params: Parameters) -> BoxFuture<'_, ActionResult> {
        Box::pin(async move {
            let outcome = self.run(action, params).await;
            if let Err(ref err) = outcome {
                if err.kind().is_validation() {
                    warn!(kind = %err.kind(), message = err.message(), "request rejected");
                } else {
                    error!(
                        kind = %err.kind(),
                        status = err.status(),
                        category = err.category(),
                        message = err.message(),
                        "action failed"
                    );
                }
            }
            outcome.into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rooms_core::{
        ActionKind, ActionOverride, AddonInstance, AddonRegistry, ErrorKind, StaticCredentials,
        invoke_until,
    };
    use serde_json::json;

    use crate::actions::testing::{FakeApi, addon, descriptor};

    #[test]
    fn rejects_foreign_type_and_bad_config() {
        let mut foreign = descriptor(CalendarDefaults::default());
        foreign.base.addon_type = "template".to_string();
        let result = GoogleCalendarsAddon::with_api(
            foreign,
            FakeApi::ok(json!({})),
            Arc::new(StaticCredentials::new()),
        );
        assert!(matches!(result, Err(ConfigError::Invalid(_))));

        let bad = descriptor(CalendarDefaults::default().with_timezone("Atlantis"));
        let result = GoogleCalendarsAddon::with_api(
            bad,
            FakeApi::ok(json!({})),
            Arc::new(StaticCredentials::new()),
        );
        assert!(result.is_err());
    }

    #[test]
    fn action_overrides_reach_definitions() {
        let mut desc = descriptor(CalendarDefaults::default());
        desc.base = desc.base.with_action_override(
            "create_events",
            ActionOverride::default()
                .with_description("Book a meeting")
                .with_max_retries(2),
        );
        let addon = GoogleCalendarsAddon::with_api(
            desc.clone(),
            FakeApi::ok(json!({})),
            Arc::new(StaticCredentials::new()),
        )
        .unwrap();
        let create = addon
            .action_definitions()
            .into_iter()
            .find(|d| d.name == "create_events")
            .unwrap();
        assert_eq!(create.description, "Book a meeting");
        assert_eq!(create.max_retries, 2);

        desc.base = desc
            .base
            .with_action_override("delete_events", ActionOverride::default());
        let result = GoogleCalendarsAddon::with_api(
            desc,
            FakeApi::ok(json!({})),
            Arc::new(StaticCredentials::new()),
        );
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn reports_missing_credentials() {
        let descriptor = descriptor(CalendarDefaults::default()).with_secret("other_key", "OTHER");
        let addon = GoogleCalendarsAddon::with_api(
            descriptor.clone(),
            FakeApi::ok(json!({})),
            Arc::new(StaticCredentials::new().with(API_KEY_SECRET, "tok")),
        )
        .unwrap();
        assert_eq!(addon.missing_credentials(), vec!["other_key".to_string()]);

        let addon = GoogleCalendarsAddon::with_api(
            descriptor,
            FakeApi::ok(json!({})),
            Arc::new(StaticCredentials::new()),
        )
        .unwrap();
        assert_eq!(
            addon.missing_credentials(),
            vec![API_KEY_SECRET.to_string(), "other_key".to_string()]
        );
    }

    #[test]
    fn lists_three_actions() {
        let addon = addon(FakeApi::ok(json!({})));
        let names: Vec<String> = addon
            .action_definitions()
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(names, vec!["list_events", "freebusy_query", "create_events"]);
        assert_eq!(CalendarAction::ALL.len(), 3);
    }

    #[tokio::test]
    async fn disabled_instance_rejects_before_lookup() {
        let api = FakeApi::ok(json!({}));
        let mut descriptor = descriptor(CalendarDefaults::default());
        descriptor.base.enabled = false;
        let addon = GoogleCalendarsAddon::with_api(
            descriptor,
            api.clone(),
            Arc::new(StaticCredentials::new().with(API_KEY_SECRET, "tok")),
        )
        .unwrap();

        let result = addon
            .invoke("list_events", Parameters::new().with("timeMin", "2025-09-16"))
            .await;
        assert_eq!(result.error_kind(), Some(ErrorKind::AddonDisabled));
        let result = addon.invoke("no_such_action", Parameters::new()).await;
        assert_eq!(result.error_kind(), Some(ErrorKind::AddonDisabled));
        assert_eq!(api.call_count(), 0);
    }

    #[tokio::test]
    async fn unknown_action() {
        let result = addon(FakeApi::ok(json!({})))
            .invoke("delete_events", Parameters::new())
            .await;
        assert_eq!(result.error_kind(), Some(ErrorKind::UnknownAction));
    }

    #[tokio::test]
    async fn registry_routes_to_instance() {
        let mut registry = AddonRegistry::new();
        registry
            .register(Arc::new(addon(FakeApi::ok(json!({"items": []})))))
            .unwrap();

        let result = registry
            .invoke(
                "gcal",
                "list_events",
                Parameters::new().with("timeMin", "2025-09-16T00:00:00Z"),
            )
            .await;
        assert_eq!(result.as_data(), Some(&json!({"items": []})));

        let result = registry
            .invoke("other", "list_events", Parameters::new())
            .await;
        assert_eq!(result.error_kind(), Some(ErrorKind::UnknownAction));
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_wins_over_hanging_call() {
        let addon = addon(FakeApi::hanging());
        let cancel = tokio::time::sleep(std::time::Duration::from_secs(1));
        let result = invoke_until(
            &addon,
            "list_events",
            Parameters::new().with("timeMin", "2025-09-16T00:00:00Z"),
            cancel,
        )
        .await;
        assert_eq!(result.error_kind(), Some(ErrorKind::Cancelled));
    }
}
