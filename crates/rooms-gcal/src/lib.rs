//! Google Calendars addon for the Rooms workflow engine.
//!
//! Three actions, each making at most one call to the Google Calendar API v3:
//!
//! - `list_events` - events of a calendar in a time window, ordered by start
//! - `freebusy_query` - busy intervals for a set of calendars
//! - `create_events` - a timed or all-day event, with optional attendees,
//!   reminders and a Google Meet conference
//!
//! Parameters are validated and normalized locally before any request is
//! sent. Responses are returned verbatim under `data`.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use rooms_core::{AddonInstance, Parameters, StaticCredentials};
//! use rooms_gcal::{GoogleCalendarsAddon, descriptor_from_json};
//!
//! let descriptor = descriptor_from_json(json)?;
//! let credentials = StaticCredentials::new().with("google_calendars_api_key", token);
//! let addon = GoogleCalendarsAddon::from_descriptor(descriptor, Arc::new(credentials))?;
//!
//! let result = addon
//!     .invoke("list_events", Parameters::new().with("timeMin", "2025-09-16T00:00:00Z"))
//!     .await;
//! ```

mod actions;
pub mod addon;
pub mod config;
pub mod error;
pub mod google;
pub mod resolve;
pub mod time;

pub use actions::{API_KEY_SECRET, CalendarAction};
pub use addon::GoogleCalendarsAddon;
pub use config::{
    CalendarDefaults, CalendarDescriptor, ConfigError, descriptor_from_json, descriptor_from_value,
};
pub use error::{UpstreamError, UpstreamErrorCode, UpstreamResult};
pub use google::{CalendarApi, CallOptions, GoogleCalendarClient};
pub use resolve::Resolver;
