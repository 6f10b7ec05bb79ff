//! `freebusy_query`: busy intervals for several calendars in one call.

use std::collections::BTreeSet;

use rooms_core::{ActionError, Outcome, Parameters};
use serde_json::Value;

use super::{ActionContext, CalendarAction, call_upstream};
use crate::google::FreeBusyRequest;
use crate::resolve::Resolver;
use crate::time::TimeWindow;

/// Collects calendar ids from `items`: deduplicated, sorted, never empty.
fn calendar_ids(params: &Parameters) -> Outcome<Vec<String>> {
    let items = params
        .optional_array("items")?
        .ok_or_else(|| ActionError::missing_parameter("items"))?;
    if items.is_empty() {
        return Err(ActionError::invalid_parameter(
            "items must contain at least one calendar",
        ));
    }

    let mut ids = BTreeSet::new();
    for (index, item) in items.iter().enumerate() {
        let id = match item {
            Value::String(id) => Some(id.as_str()),
            Value::Object(obj) => obj.get("id").and_then(Value::as_str),
            _ => None,
        }
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| {
            ActionError::invalid_parameter(format!(
                "items[{}] must be a calendar id or an object with a non-empty 'id'",
                index
            ))
        })?;
        ids.insert(id.to_string());
    }
    Ok(ids.into_iter().collect())
}

pub(crate) fn build_request(
    resolver: &Resolver<'_>,
    params: &Parameters,
) -> Outcome<FreeBusyRequest> {
    let window = TimeWindow::parse(
        "timeMin",
        params.required_str("timeMin")?,
        "timeMax",
        params.required_str("timeMax")?,
    )?;
    let ids = calendar_ids(params)?;
    let time_zone = resolver.time_zone(params)?;

    let mut request = FreeBusyRequest::new(&window, time_zone.name(), ids);
    request.calendar_expansion_max = params.optional_positive_int("calendarExpansionMax")?;
    request.group_expansion_max = params.optional_positive_int("groupExpansionMax")?;
    Ok(request)
}

pub(crate) async fn run(ctx: &ActionContext<'_>, params: &Parameters) -> Outcome<Value> {
    let request = build_request(&ctx.resolver(), params)?;
    let options = ctx.call_options(params)?;

    if let Ok(body) = serde_json::to_value(&request) {
        ctx.trace_request(CalendarAction::FreebusyQuery, &body);
    }

    call_upstream(options.timeout, ctx.api.query_free_busy(&request, &options)).await
}

#[cfg(test)]
mod tests {
    use rooms_core::{AddonInstance, ErrorKind, Parameters, StaticCredentials};
    use serde_json::json;
    use std::sync::Arc;

    use crate::actions::testing::{FakeApi, Recorded, addon, descriptor};
    use crate::addon::GoogleCalendarsAddon;
    use crate::config::CalendarDefaults;

    fn params(value: serde_json::Value) -> Parameters {
        Parameters::from_value(value).unwrap()
    }

    fn window(extra: serde_json::Value) -> Parameters {
        let mut base = json!({
            "timeMin": "2025-09-16T00:00:00Z",
            "timeMax": "2025-09-17T00:00:00Z"
        });
        if let (Some(base), Some(extra)) = (base.as_object_mut(), extra.as_object()) {
            base.extend(extra.clone());
        }
        params(base)
    }

    #[tokio::test]
    async fn dedupes_and_sorts_items() {
        let api = FakeApi::ok(json!({"kind": "calendar#freeBusy", "calendars": {}}));
        let result = addon(api.clone())
            .invoke(
                "freebusy_query",
                window(json!({
                    "items": ["b@example.com", {"id": " a@example.com "}, "b@example.com"],
                    "groupExpansionMax": 500
                })),
            )
            .await;
        assert_eq!(result.as_data().unwrap()["kind"], "calendar#freeBusy");

        let calls = api.calls();
        assert_eq!(calls.len(), 1);
        let (Recorded::FreeBusy(request), _) = &calls[0] else {
            panic!("expected a free/busy call");
        };
        let ids: Vec<&str> = request.items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["a@example.com", "b@example.com"]);
        assert_eq!(request.time_min, "2025-09-16T00:00:00Z");
        assert_eq!(request.time_max, "2025-09-17T00:00:00Z");
        assert_eq!(request.time_zone, "UTC");
        assert_eq!(request.group_expansion_max, Some(500));
        assert_eq!(request.calendar_expansion_max, None);
    }

    #[tokio::test]
    async fn empty_items_rejected() {
        let api = FakeApi::ok(json!({}));
        let result = addon(api.clone())
            .invoke("freebusy_query", window(json!({"items": []})))
            .await;
        assert_eq!(result.error_kind(), Some(ErrorKind::InvalidParameter));
        assert_eq!(api.call_count(), 0);
    }

    #[tokio::test]
    async fn invalid_inputs_rejected_locally() {
        let api = FakeApi::ok(json!({}));
        let addon = addon(api.clone());
        let cases = [
            (window(json!({})), ErrorKind::InvalidParameter),
            (window(json!({"items": "primary"})), ErrorKind::InvalidParameter),
            (window(json!({"items": ["  "]})), ErrorKind::InvalidParameter),
            (window(json!({"items": [{"name": "x"}]})), ErrorKind::InvalidParameter),
            (window(json!({"items": [42]})), ErrorKind::InvalidParameter),
            (
                window(json!({"items": ["primary"], "calendarExpansionMax": 0})),
                ErrorKind::InvalidParameter,
            ),
            (
                window(json!({"items": ["primary"], "timeZone": "Mars/Base"})),
                ErrorKind::InvalidTimezone,
            ),
            (
                params(json!({
                    "timeMin": "2025-09-17T00:00:00Z",
                    "timeMax": "2025-09-16T00:00:00Z",
                    "items": ["primary"]
                })),
                ErrorKind::InvalidTimeRange,
            ),
            (
                params(json!({"timeMin": "2025-09-17T00:00:00Z", "items": ["primary"]})),
                ErrorKind::InvalidParameter,
            ),
        ];
        for (input, expected) in cases {
            let result = addon.invoke("freebusy_query", input).await;
            assert_eq!(result.error_kind(), Some(expected));
        }
        assert_eq!(api.call_count(), 0);
    }

    #[tokio::test]
    async fn empty_or_inverted_window_is_invalid_range() {
        let api = FakeApi::ok(json!({}));
        let addon = addon(api.clone());
        let windows = [
            ("2025-09-17T00:00:00Z", "2025-09-16T00:00:00Z"),
            ("2025-09-16T00:00:00Z", "2025-09-16T00:00:00Z"),
            // Same instant, different offsets.
            ("2025-09-16T02:00:00+02:00", "2025-09-16T00:00:00Z"),
            ("2025-09-16T10:00:00", "2025-09-16T10:00:00Z"),
        ];
        for (time_min, time_max) in windows {
            let result = addon
                .invoke(
                    "freebusy_query",
                    params(json!({
                        "timeMin": time_min,
                        "timeMax": time_max,
                        "items": ["primary"]
                    })),
                )
                .await;
            assert_eq!(
                result.error_kind(),
                Some(ErrorKind::InvalidTimeRange),
                "{} .. {}",
                time_min,
                time_max
            );
        }
        assert_eq!(api.call_count(), 0);
    }

    #[tokio::test]
    async fn missing_credential_fails_before_call() {
        let api = FakeApi::ok(json!({}));
        let addon = GoogleCalendarsAddon::with_api(
            descriptor(CalendarDefaults::default()),
            api.clone(),
            Arc::new(StaticCredentials::new()),
        )
        .unwrap();

        let result = addon
            .invoke("freebusy_query", window(json!({"items": ["primary"]})))
            .await;
        let error = result.as_error().unwrap();
        assert_eq!(error.kind, ErrorKind::UpstreamError);
        assert_eq!(error.category.as_deref(), Some("authentication_failed"));
        assert_eq!(api.call_count(), 0);
    }

    #[tokio::test]
    async fn instance_timezone_applies() {
        let api = FakeApi::ok(json!({}));
        let addon = crate::actions::testing::addon_with(CalendarDefaults::default(), api.clone());
        addon
            .invoke("freebusy_query", window(json!({"items": ["primary"]})))
            .await;
        let calls = api.calls();
        let (Recorded::FreeBusy(request), _) = &calls[0] else {
            panic!("expected a free/busy call");
        };
        assert_eq!(request.time_zone, "Europe/Paris");
    }
}
