//! `list_events`: events of one calendar, ordered by start time.

use rooms_core::{Outcome, Parameters};
use serde_json::{Value, json};

use super::{ActionContext, CalendarAction, call_upstream};
use crate::google::ListEventsRequest;
use crate::resolve::Resolver;
use crate::time::{TimeWindow, parse_instant};

pub(crate) fn build_request(
    resolver: &Resolver<'_>,
    params: &Parameters,
) -> Outcome<ListEventsRequest> {
    let time_min = parse_instant("timeMin", params.required_str("timeMin")?)?;
    let time_max = match params.optional_non_empty_str("timeMax")? {
        Some(raw) => {
            let time_max = parse_instant("timeMax", raw)?;
            TimeWindow::new(time_min, time_max)?;
            Some(time_max)
        }
        None => None,
    };

    Ok(ListEventsRequest {
        calendar_id: resolver.calendar_id(params)?,
        time_min,
        time_max,
        max_results: resolver.max_results(params)?,
        time_zone: resolver.time_zone(params)?.name().to_string(),
    })
}

pub(crate) async fn run(ctx: &ActionContext<'_>, params: &Parameters) -> Outcome<Value> {
    let request = build_request(&ctx.resolver(), params)?;
    let options = ctx.call_options(params)?;

    ctx.trace_request(
        CalendarAction::ListEvents,
        &json!({
            "calendarId": request.calendar_id,
            "query": request
                .query_pairs()
                .into_iter()
                .map(|(k, v)| (k.to_string(), Value::String(v)))
                .collect::<serde_json::Map<_, _>>(),
        }),
    );

    call_upstream(options.timeout, ctx.api.list_events(&request, &options)).await
}
