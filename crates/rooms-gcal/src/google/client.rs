//! HTTP client for the Google Calendar API.

use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{debug, warn};

use super::types::{FreeBusyRequest, InsertEventRequest, ListEventsRequest};
use super::{CalendarApi, CallOptions};
use crate::error::{UpstreamError, UpstreamErrorCode, UpstreamResult};
use rooms_core::BoxFuture;

/// Base URL for Google Calendar API v3.
pub const CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Google Calendar API client.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct GoogleCalendarClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl GoogleCalendarClient {
    /// Creates a client for the public API endpoint.
    pub fn new() -> UpstreamResult<Self> {
        Self::with_base_url(CALENDAR_API_BASE)
    }

    /// Creates a client against another endpoint (tests, proxies).
    pub fn with_base_url(base_url: impl Into<String>) -> UpstreamResult<Self> {
        let http_client = reqwest::Client::builder().build().map_err(|e| {
            UpstreamError::network(format!("failed to create HTTP client: {}", e)).with_source(e)
        })?;
        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn events_url(&self, calendar_id: &str) -> String {
        format!(
            "{}/calendars/{}/events",
            self.base_url,
            urlencoding::encode(calendar_id)
        )
    }

    async fn get_events(
        &self,
        request: &ListEventsRequest,
        options: &CallOptions,
    ) -> UpstreamResult<Value> {
        let url = self.events_url(&request.calendar_id);
        debug!(calendar_id = %request.calendar_id, "listing events");

        let builder = self
            .http_client
            .get(&url)
            .bearer_auth(options.access_token.expose())
            .timeout(options.timeout)
            .query(&request.query_pairs());

        execute(builder).await
    }

    async fn post_free_busy(
        &self,
        request: &FreeBusyRequest,
        options: &CallOptions,
    ) -> UpstreamResult<Value> {
        let url = format!("{}/freeBusy", self.base_url);
        debug!(calendars = request.items.len(), "querying free/busy");

        let builder = self
            .http_client
            .post(&url)
            .bearer_auth(options.access_token.expose())
            .timeout(options.timeout)
            .header(CONTENT_TYPE, "application/json")
            .body(encode(request)?);

        execute(builder).await
    }

    async fn post_event(
        &self,
        request: &InsertEventRequest,
        options: &CallOptions,
    ) -> UpstreamResult<Value> {
        let url = self.events_url(&request.calendar_id);
        debug!(
            calendar_id = %request.calendar_id,
            conference = request.wants_conference(),
            "inserting event"
        );

        let builder = self
            .http_client
            .post(&url)
            .bearer_auth(options.access_token.expose())
            .timeout(options.timeout)
            .query(&request.query_pairs())
            .header(CONTENT_TYPE, "application/json")
            .body(encode(&request.event)?);

        execute(builder).await
    }
}

impl CalendarApi for GoogleCalendarClient {
    fn list_events<'a>(
        &'a self,
        request: &'a ListEventsRequest,
        options: &'a CallOptions,
    ) -> BoxFuture<'a, UpstreamResult<Value>> {
        Box::pin(self.get_events(request, options))
    }

    fn query_free_busy<'a>(
        &'a self,
        request: &'a FreeBusyRequest,
        options: &'a CallOptions,
    ) -> BoxFuture<'a, UpstreamResult<Value>> {
        Box::pin(self.post_free_busy(request, options))
    }

    fn insert_event<'a>(
        &'a self,
        request: &'a InsertEventRequest,
        options: &'a CallOptions,
    ) -> BoxFuture<'a, UpstreamResult<Value>> {
        Box::pin(self.post_event(request, options))
    }
}

fn encode<T: Serialize>(body: &T) -> UpstreamResult<Vec<u8>> {
    serde_json::to_vec(body).map_err(|e| {
        UpstreamError::new(
            UpstreamErrorCode::BadRequest,
            format!("failed to encode request body: {}", e),
        )
        .with_source(e)
    })
}

fn send_error(e: reqwest::Error) -> UpstreamError {
    if e.is_timeout() {
        UpstreamError::timeout("request timed out").with_source(e)
    } else if e.is_connect() {
        UpstreamError::network(format!("connection failed: {}", e)).with_source(e)
    } else {
        UpstreamError::network(format!("request failed: {}", e)).with_source(e)
    }
}

async fn execute(builder: reqwest::RequestBuilder) -> UpstreamResult<Value> {
    let response = builder.send().await.map_err(send_error)?;
    let status = response.status();

    let retry_after = response
        .headers()
        .get("Retry-After")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<u64>().ok());

    let body = response.text().await.map_err(|e| {
        if e.is_timeout() {
            UpstreamError::timeout("timed out reading response").with_source(e)
        } else {
            UpstreamError::invalid_response(format!("failed to read response: {}", e))
                .with_source(e)
        }
    })?;

    if !status.is_success() {
        let mut message = google_error_message(&body)
            .unwrap_or_else(|| format!("API error ({})", status));
        if let Some(secs) = retry_after {
            message = format!("{}, retry after {} seconds", message, secs);
        }
        warn!(status = status.as_u16(), %message, "calendar API request failed");
        return Err(UpstreamError::from_response(status.as_u16(), message));
    }

    Ok(parse_body(&body))
}

/// Parses a response body, wrapping non-JSON text as `{"raw": text}`.
pub(crate) fn parse_body(body: &str) -> Value {
    if body.trim().is_empty() {
        return json!({});
    }
    serde_json::from_str(body).unwrap_or_else(|_| json!({ "raw": body }))
}

/// Extracts `error.message` from a Google error body.
fn google_error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("error")? {
        Value::Object(err) => err
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string),
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}
