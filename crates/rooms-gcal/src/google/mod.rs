//! Google Calendar API v3 access.
//!
//! Handlers talk to the service through the [`CalendarApi`] trait so they can
//! be tested against an in-memory double. [`GoogleCalendarClient`] is the
//! `reqwest` implementation.

mod client;
pub mod types;

use std::time::Duration;

use rooms_core::{BoxFuture, Credential};
use serde_json::Value;

use crate::error::UpstreamResult;
pub use client::{CALENDAR_API_BASE, GoogleCalendarClient};
pub use types::{FreeBusyRequest, InsertEventRequest, ListEventsRequest};

/// Per-call transport settings.
#[derive(Debug, Clone)]
pub struct CallOptions {
    /// Bearer token.
    pub access_token: Credential,
    /// Bound on the whole request, including reading the body.
    pub timeout: Duration,
}

/// Outbound operations against the calendar service.
///
/// Every method returns the response body as JSON, unmodified. Bodies that
/// are not JSON come back as `{"raw": <text>}`.
pub trait CalendarApi: Send + Sync {
    fn list_events<'a>(
        &'a self,
        request: &'a ListEventsRequest,
        options: &'a CallOptions,
    ) -> BoxFuture<'a, UpstreamResult<Value>>;

    fn query_free_busy<'a>(
        &'a self,
        request: &'a FreeBusyRequest,
        options: &'a CallOptions,
    ) -> BoxFuture<'a, UpstreamResult<Value>>;

    fn insert_event<'a>(
        &'a self,
        request: &'a InsertEventRequest,
        options: &'a CallOptions,
    ) -> BoxFuture<'a, UpstreamResult<Value>>;
}
