//! `create_events`: insert one timed or all-day event.
//!
//! Parameters are checked in a fixed order: window form, required fields,
//! window bounds, then each optional field. The first failure wins.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use rooms_core::{ActionError, Outcome, Parameters};
use serde_json::{Value, json};
use uuid::Uuid;

use super::{ActionContext, CalendarAction, call_upstream};
use crate::error::UpstreamError;
use crate::google::InsertEventRequest;
use crate::google::types::{
    Attendee, ConferenceData, EventBody, EventDateTime, ReminderMethod, ReminderOverride,
    Reminders, SendUpdates,
};
use crate::resolve::Resolver;
use crate::time::{DateWindow, EventWindow, TimeWindow, parse_date};

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("Invalid email regex"));

/// Four weeks, the longest reminder Google accepts.
pub const MAX_REMINDER_MINUTES: u64 = 40_320;

const TIMED_KEYS: [&str; 2] = ["start_dt", "end_dt"];
const ALL_DAY_KEYS: [&str; 2] = ["start_date", "end_date"];

fn event_window(params: &Parameters) -> Outcome<EventWindow> {
    let timed = TIMED_KEYS.iter().any(|k| params.contains(k));
    let all_day = ALL_DAY_KEYS.iter().any(|k| params.contains(k));

    match (timed, all_day) {
        (true, true) => {
            return Err(ActionError::ambiguous_event_window(
                "supply either start_dt/end_dt or start_date/end_date, not both",
            ));
        }
        (false, false) => {
            return Err(ActionError::ambiguous_event_window(
                "supply start_dt/end_dt for a timed event or start_date/end_date for an all-day event",
            ));
        }
        _ => {}
    }

    params.required_str("calendarId")?;
    params.required_str("summary")?;

    if timed {
        let window = TimeWindow::parse(
            "start_dt",
            params.required_str("start_dt")?,
            "end_dt",
            params.required_str("end_dt")?,
        )?;
        Ok(EventWindow::Timed(window))
    } else {
        let start = parse_date("start_date", params.required_str("start_date")?)?;
        let end = parse_date("end_date", params.required_str("end_date")?)?;
        Ok(EventWindow::AllDay(DateWindow::new(start, end)?))
    }
}

fn color_id(params: &Parameters) -> Outcome<Option<String>> {
    let Some(value) = params.get("colorId") else {
        return Ok(None);
    };
    let id = match value {
        Value::String(s) => s
            .trim()
            .parse::<u8>()
            .ok()
            .filter(|n| n.to_string() == s.trim()),
        Value::Number(n) => n.as_u64().and_then(|n| u8::try_from(n).ok()),
        _ => None,
    };
    match id {
        Some(n @ 1..=11) => Ok(Some(n.to_string())),
        _ => Err(ActionError::invalid_parameter(format!(
            "colorId must be between \"1\" and \"11\", got {}",
            value
        ))),
    }
}

fn send_updates(params: &Parameters) -> Outcome<Option<SendUpdates>> {
    match params.optional_str("sendUpdates")? {
        None => Ok(None),
        Some(raw) => SendUpdates::parse(raw.trim()).map(Some).ok_or_else(|| {
            ActionError::invalid_parameter(format!(
                "sendUpdates must be one of all, externalOnly, none; got '{}'",
                raw
            ))
        }),
    }
}

fn attendees(params: &Parameters) -> Outcome<Option<Vec<Attendee>>> {
    let Some(items) = params.optional_array("attendees")? else {
        return Ok(None);
    };
    if items.is_empty() {
        return Err(ActionError::invalid_parameter(
            "attendees must contain at least one email address",
        ));
    }

    // Keyed case-insensitively; the first spelling wins.
    let mut emails = BTreeMap::new();
    for (index, item) in items.iter().enumerate() {
        let email = item
            .as_str()
            .map(str::trim)
            .filter(|e| EMAIL_REGEX.is_match(e))
            .ok_or_else(|| {
                ActionError::invalid_parameter(format!(
                    "attendees[{}] is not a valid email address: {}",
                    index, item
                ))
            })?;
        emails
            .entry(email.to_lowercase())
            .or_insert_with(|| email.to_string());
    }
    Ok(Some(
        emails.into_values().map(|email| Attendee { email }).collect(),
    ))
}

fn reminders(params: &Parameters) -> Outcome<Option<Reminders>> {
    let Some(items) = params.optional_array("reminders_overrides")? else {
        return Ok(None);
    };

    let mut overrides = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let invalid = |detail: &str| {
            ActionError::invalid_parameter(format!("reminders_overrides[{}] {}", index, detail))
        };
        let entry = item.as_object().ok_or_else(|| invalid("must be an object"))?;
        let method = entry
            .get("method")
            .and_then(Value::as_str)
            .and_then(ReminderMethod::parse)
            .ok_or_else(|| invalid("method must be \"email\" or \"popup\""))?;
        let minutes = entry
            .get("minutes")
            .and_then(Value::as_u64)
            .filter(|m| *m <= MAX_REMINDER_MINUTES)
            .and_then(|m| u32::try_from(m).ok())
            .ok_or_else(|| invalid("minutes must be an integer between 0 and 40320"))?;
        overrides.push(ReminderOverride { method, minutes });
    }
    Ok(Some(Reminders::overrides(overrides)))
}

fn create_conference(params: &Parameters) -> Outcome<bool> {
    Ok(params.optional_bool("create_conference")?.unwrap_or(false))
}

pub(crate) fn build_request(
    resolver: &Resolver<'_>,
    params: &Parameters,
) -> Outcome<InsertEventRequest> {
    let window = event_window(params)?;
    let color_id = color_id(params)?;
    let send_updates = send_updates(params)?;
    let attendees = attendees(params)?;
    let reminders = reminders(params)?;
    let conference = create_conference(params)?;

    let (start, end) = match window {
        EventWindow::Timed(ref w) => {
            let time_zone = resolver.time_zone(params)?;
            EventDateTime::timed_pair(w, time_zone.name())
        }
        EventWindow::AllDay(ref w) => EventDateTime::all_day_pair(w),
    };

    let event = EventBody {
        summary: params.required_str("summary")?.to_string(),
        description: params.optional_non_empty_str("description")?.map(str::to_string),
        location: params.optional_non_empty_str("location")?.map(str::to_string),
        start,
        end,
        attendees,
        color_id,
        reminders,
        conference_data: conference
            .then(|| ConferenceData::hangouts_meet(Uuid::new_v4().to_string())),
    };

    Ok(InsertEventRequest {
        calendar_id: params.required_str("calendarId")?.to_string(),
        event,
        send_updates,
    })
}

/// Fails unless the created event carries a usable conference.
///
/// A `pending` creation status is accepted; Google finishes it
/// asynchronously.
fn check_conference(event: &Value) -> Result<(), UpstreamError> {
    let Some(data) = event.get("conferenceData").filter(|d| !d.is_null()) else {
        return Err(UpstreamError::conference_unavailable(
            "event was created without conference data; conferencing may be unsupported for this calendar",
        ));
    };
    let status = data
        .pointer("/createRequest/status/statusCode")
        .and_then(Value::as_str);
    if status == Some("failure") {
        return Err(UpstreamError::conference_unavailable(
            "conference creation failed",
        ));
    }
    Ok(())
}

pub(crate) async fn run(ctx: &ActionContext<'_>, params: &Parameters) -> Outcome<Value> {
    let request = build_request(&ctx.resolver(), params)?;
    let options = ctx.call_options(params)?;

    if let Ok(body) = serde_json::to_value(&request.event) {
        let query: serde_json::Map<String, Value> = request
            .query_pairs()
            .into_iter()
            .map(|(k, v)| (k.to_string(), Value::String(v)))
            .collect();
        ctx.trace_request(
            CalendarAction::CreateEvents,
            &json!({"calendarId": request.calendar_id, "query": query, "body": body}),
        );
    }

    let event = call_upstream(options.timeout, ctx.api.insert_event(&request, &options)).await?;
    if request.wants_conference() {
        check_conference(&event).map_err(|err| {
            tracing::error!(message = err.message(), "conference was not created");
            ActionError::from(err)
        })?;
    }
    Ok(event)
}
