//! Request shapes for the Google Calendar API v3.
//!
//! Responses are passed back to the workflow untouched, so only the outbound
//! side is typed.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::time::{DateWindow, TimeWindow, to_rfc3339_z};

/// `GET /calendars/{calendarId}/events`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEventsRequest {
    pub calendar_id: String,
    pub time_min: DateTime<Utc>,
    pub time_max: Option<DateTime<Utc>>,
    pub max_results: u32,
    pub time_zone: String,
}

impl ListEventsRequest {
    /// Query string parameters, in a stable order.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("singleEvents", "true".to_string()),
            ("orderBy", "startTime".to_string()),
            ("maxResults", self.max_results.to_string()),
            ("timeMin", to_rfc3339_z(&self.time_min)),
        ];
        if let Some(max) = self.time_max {
            pairs.push(("timeMax", to_rfc3339_z(&max)));
        }
        pairs.push(("timeZone", self.time_zone.clone()));
        pairs
    }
}

/// `POST /freeBusy` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FreeBusyRequest {
    pub time_min: String,
    pub time_max: String,
    pub time_zone: String,
    pub items: Vec<FreeBusyItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calendar_expansion_max: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_expansion_max: Option<u32>,
}

impl FreeBusyRequest {
    pub fn new(window: &TimeWindow, time_zone: impl Into<String>, ids: Vec<String>) -> Self {
        Self {
            time_min: to_rfc3339_z(&window.start()),
            time_max: to_rfc3339_z(&window.end()),
            time_zone: time_zone.into(),
            items: ids.into_iter().map(|id| FreeBusyItem { id }).collect(),
            calendar_expansion_max: None,
            group_expansion_max: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FreeBusyItem {
    pub id: String,
}

/// Guest notification policy for event creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SendUpdates {
    All,
    ExternalOnly,
    None,
}

impl SendUpdates {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::ExternalOnly => "externalOnly",
            Self::None => "none",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "all" => Some(Self::All),
            "externalOnly" => Some(Self::ExternalOnly),
            "none" => Some(Self::None),
            _ => None,
        }
    }
}

/// `POST /calendars/{calendarId}/events`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertEventRequest {
    pub calendar_id: String,
    pub event: EventBody,
    pub send_updates: Option<SendUpdates>,
}

impl InsertEventRequest {
    /// Whether the body asks for a conference to be created.
    pub fn wants_conference(&self) -> bool {
        self.event.conference_data.is_some()
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(policy) = self.send_updates {
            pairs.push(("sendUpdates", policy.as_str().to_string()));
        }
        if self.wants_conference() {
            pairs.push(("conferenceDataVersion", "1".to_string()));
        }
        pairs
    }
}

/// An event resource to insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventBody {
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub start: EventDateTime,
    pub end: EventDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attendees: Option<Vec<Attendee>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reminders: Option<Reminders>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conference_data: Option<ConferenceData>,
}

/// Start or end of an event: `dateTime` + `timeZone`, or `date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDateTime {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

impl EventDateTime {
    pub fn timed(instant: &DateTime<Utc>, time_zone: &str) -> Self {
        Self {
            date_time: Some(to_rfc3339_z(instant)),
            date: None,
            time_zone: Some(time_zone.to_string()),
        }
    }

    pub fn all_day(date: NaiveDate) -> Self {
        Self {
            date_time: None,
            date: Some(date.format("%Y-%m-%d").to_string()),
            time_zone: None,
        }
    }

    /// Start and end for a timed window.
    pub fn timed_pair(window: &TimeWindow, time_zone: &str) -> (Self, Self) {
        (
            Self::timed(&window.start(), time_zone),
            Self::timed(&window.end(), time_zone),
        )
    }

    /// Start and end for an all-day window.
    pub fn all_day_pair(window: &DateWindow) -> (Self, Self) {
        (Self::all_day(window.start()), Self::all_day(window.end()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attendee {
    pub email: String,
}

/// Reminder settings; present only when overrides were supplied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminders {
    pub use_default: bool,
    pub overrides: Vec<ReminderOverride>,
}

impl Reminders {
    pub fn overrides(overrides: Vec<ReminderOverride>) -> Self {
        Self {
            use_default: false,
            overrides,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderMethod {
    Email,
    Popup,
}

impl ReminderMethod {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "email" => Some(Self::Email),
            "popup" => Some(Self::Popup),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReminderOverride {
    pub method: ReminderMethod,
    pub minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConferenceData {
    pub create_request: CreateConferenceRequest,
}

impl ConferenceData {
    /// A Google Meet creation request with the given idempotency key.
    pub fn hangouts_meet(request_id: impl Into<String>) -> Self {
        Self {
            create_request: CreateConferenceRequest {
                request_id: request_id.into(),
                conference_solution_key: ConferenceSolutionKey {
                    kind: "hangoutsMeet".to_string(),
                },
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateConferenceRequest {
    pub request_id: String,
    pub conference_solution_key: ConferenceSolutionKey,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConferenceSolutionKey {
    #[serde(rename = "type")]
    pub kind: String,
}
