//! Calendar action handlers.
//!
//! Each handler validates and normalizes its parameters into a typed request
//! first, then makes exactly one outbound call. Anything rejected locally
//! never reaches the transport.

pub(crate) mod create_events;
pub(crate) mod freebusy_query;
pub(crate) mod list_events;

use std::time::Duration;

use rooms_core::{
    ActionError, ActionKind, BoxFuture, CredentialProvider, Outcome, ParamSpec, ParamType,
    Parameters,
};
use serde_json::Value;
use tracing::{error, info};

use crate::config::CalendarDefaults;
use crate::error::{UpstreamError, UpstreamResult};
use crate::google::{CalendarApi, CallOptions};
use crate::resolve::Resolver;

/// Logical secret key of the Google API access token.
pub const API_KEY_SECRET: &str = "google_calendars_api_key";

/// Actions of the Google Calendars addon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CalendarAction {
    ListEvents,
    FreebusyQuery,
    CreateEvents,
}

impl ActionKind for CalendarAction {
    const ALL: &'static [Self] = &[Self::ListEvents, Self::FreebusyQuery, Self::CreateEvents];

    fn name(self) -> &'static str {
        match self {
            Self::ListEvents => "list_events",
            Self::FreebusyQuery => "freebusy_query",
            Self::CreateEvents => "create_events",
        }
    }

    fn description(self) -> &'static str {
        match self {
            Self::ListEvents => "List events of a calendar within a time window",
            Self::FreebusyQuery => "Query free/busy information for a set of calendars",
            Self::CreateEvents => {
                "Create a timed or all-day event, optionally with attendees, reminders and a Meet link"
            }
        }
    }

    fn parameters(self) -> &'static [ParamSpec] {
        match self {
            Self::ListEvents => LIST_EVENTS_PARAMS,
            Self::FreebusyQuery => FREEBUSY_QUERY_PARAMS,
            Self::CreateEvents => CREATE_EVENTS_PARAMS,
        }
    }
}

const LIST_EVENTS_PARAMS: &[ParamSpec] = &[
    ParamSpec::optional("calendarId", ParamType::String),
    ParamSpec::optional("maxResults", ParamType::Integer),
    ParamSpec::required("timeMin", ParamType::String),
    ParamSpec::optional("timeMax", ParamType::String),
    ParamSpec::optional("timeZone", ParamType::String),
    ParamSpec::optional("timeout", ParamType::Integer),
];

const FREEBUSY_QUERY_PARAMS: &[ParamSpec] = &[
    ParamSpec::required("timeMin", ParamType::String),
    ParamSpec::required("timeMax", ParamType::String),
    ParamSpec::required("items", ParamType::Array),
    ParamSpec::optional("timeZone", ParamType::String),
    ParamSpec::optional("calendarExpansionMax", ParamType::Integer),
    ParamSpec::optional("groupExpansionMax", ParamType::Integer),
    ParamSpec::optional("timeout", ParamType::Integer),
];

const CREATE_EVENTS_PARAMS: &[ParamSpec] = &[
    ParamSpec::required("calendarId", ParamType::String),
    ParamSpec::required("summary", ParamType::String),
    ParamSpec::optional("start_dt", ParamType::String),
    ParamSpec::optional("end_dt", ParamType::String),
    ParamSpec::optional("start_date", ParamType::String),
    ParamSpec::optional("end_date", ParamType::String),
    ParamSpec::optional("description", ParamType::String),
    ParamSpec::optional("location", ParamType::String),
    ParamSpec::optional("attendees", ParamType::Array),
    ParamSpec::optional("colorId", ParamType::String),
    ParamSpec::optional("sendUpdates", ParamType::String),
    ParamSpec::optional("create_conference", ParamType::Boolean),
    ParamSpec::optional("reminders_overrides", ParamType::Array),
    ParamSpec::optional("timeZone", ParamType::String),
    ParamSpec::optional("timeout", ParamType::Integer),
];

/// Everything a handler may read during one invocation.
#[derive(Clone, Copy)]
pub(crate) struct ActionContext<'a> {
    pub defaults: &'a CalendarDefaults,
    pub api: &'a dyn CalendarApi,
    pub credentials: &'a dyn CredentialProvider,
}

impl<'a> ActionContext<'a> {
    pub fn resolver(&self) -> Resolver<'a> {
        Resolver::new(self.defaults)
    }

    /// Resolves the timeout, then looks up the access token.
    ///
    /// Runs after parameter validation so a missing secret never masks a
    /// malformed request.
    pub fn call_options(&self, params: &Parameters) -> Outcome<CallOptions> {
        let timeout = self.resolver().timeout(params)?;
        let access_token = self.credentials.credential(API_KEY_SECRET).ok_or_else(|| {
            ActionError::from(UpstreamError::authentication(format!(
                "no credential available for '{}'",
                API_KEY_SECRET
            )))
        })?;
        Ok(CallOptions {
            access_token,
            timeout,
        })
    }

    /// Logs the shaped request when `enable_debug` is set.
    pub fn trace_request(&self, action: CalendarAction, request: &Value) {
        if self.defaults.enable_debug {
            info!(action = action.name(), %request, "outbound calendar request");
        }
    }
}

/// Awaits an outbound call, bounded by `timeout`.
pub(crate) async fn call_upstream(
    timeout: Duration,
    call: BoxFuture<'_, UpstreamResult<Value>>,
) -> Outcome<Value> {
    match tokio::time::timeout(timeout, call).await {
        Ok(Ok(data)) => Ok(data),
        Ok(Err(err)) => {
            error!(
                code = %err.code(),
                status = err.status(),
                retryable = err.is_retryable(),
                message = err.message(),
                "calendar API call failed"
            );
            Err(err.into())
        }
        Err(_) => {
            error!(timeout_s = timeout.as_secs(), "calendar API call timed out");
            Err(ActionError::timeout(format!(
                "calendar API did not respond within {}s",
                timeout.as_secs()
            )))
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for action in CalendarAction::ALL {
            assert_eq!(CalendarAction::from_name(action.name()), Some(*action));
        }
        assert_eq!(CalendarAction::from_name("delete_events"), None);
    }

    #[test]
    fn parameter_lists_are_static() {
        let required = |action: CalendarAction| -> Vec<&'static str> {
            action
                .parameters()
                .iter()
                .filter(|p| p.required)
                .map(|p| p.name)
                .collect()
        };
        assert_eq!(required(CalendarAction::ListEvents), vec!["timeMin"]);
        assert_eq!(
            required(CalendarAction::FreebusyQuery),
            vec!["timeMin", "timeMax", "items"]
        );
        assert_eq!(
            required(CalendarAction::CreateEvents),
            vec!["calendarId", "summary"]
        );
        assert_eq!(CalendarAction::CreateEvents.parameters().len(), 15);
    }

    #[test]
    fn definitions_declare_required_params() {
        let def = CalendarAction::FreebusyQuery.definition();
        assert_eq!(def.name, "freebusy_query");
        assert_eq!(def.max_retries, 0);
        let required = def.input_schema["required"].as_array().unwrap();
        assert!(required.iter().any(|v| v == "items"));
        assert!(required.iter().any(|v| v == "timeMin"));
    }
}
