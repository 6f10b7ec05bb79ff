//! Effective parameter resolution.
//!
//! Every field resolves the same way: explicit action parameter, then the
//! instance default, then a fixed fallback. Resolution reads nothing but its
//! inputs.

use std::time::Duration;

use chrono_tz::Tz;
use rooms_core::{ActionError, Outcome, Parameters};

use crate::config::CalendarDefaults;

pub const FALLBACK_CALENDAR_ID: &str = "primary";
pub const FALLBACK_MAX_RESULTS: u32 = 10;
pub const FALLBACK_TIMEZONE: &str = "UTC";
pub const FALLBACK_TIMEOUT_SECS: u32 = 10;

/// Resolves action parameters against an instance's defaults.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    defaults: Option<&'a CalendarDefaults>,
}

impl<'a> Resolver<'a> {
    pub fn new(defaults: &'a CalendarDefaults) -> Self {
        Self {
            defaults: Some(defaults),
        }
    }

    /// A resolver with no instance defaults; only fallbacks apply.
    pub fn without_defaults() -> Self {
        Self { defaults: None }
    }

    /// `calendarId`: non-blank parameter, instance default, `"primary"`.
    pub fn calendar_id(&self, params: &Parameters) -> Outcome<String> {
        if let Some(id) = params.optional_non_empty_str("calendarId")? {
            return Ok(id.to_string());
        }
        let id = self
            .defaults
            .map(|d| d.default_calendar_id.trim())
            .filter(|id| !id.is_empty())
            .unwrap_or(FALLBACK_CALENDAR_ID);
        Ok(id.to_string())
    }

    /// `maxResults`: positive integer parameter, instance default, 10.
    pub fn max_results(&self, params: &Parameters) -> Outcome<u32> {
        if let Some(max) = params.optional_positive_int("maxResults")? {
            return Ok(max);
        }
        Ok(self
            .defaults
            .map(|d| d.default_max_results)
            .filter(|n| *n > 0)
            .unwrap_or(FALLBACK_MAX_RESULTS))
    }

    /// `timeZone`: parameter, instance default, `"UTC"`; must be IANA.
    pub fn time_zone(&self, params: &Parameters) -> Outcome<Tz> {
        let name = match params.optional_non_empty_str("timeZone")? {
            Some(name) => name,
            None => self
                .defaults
                .map(|d| d.default_timezone.trim())
                .filter(|tz| !tz.is_empty())
                .unwrap_or(FALLBACK_TIMEZONE),
        };
        name.parse::<Tz>()
            .map_err(|_| ActionError::invalid_timezone(name))
    }

    /// `timeout`: positive seconds parameter, `request_timeout_s`, 10.
    pub fn timeout(&self, params: &Parameters) -> Outcome<Duration> {
        let secs = match params.optional_positive_int("timeout")? {
            Some(secs) => secs,
            None => self
                .defaults
                .map(|d| d.request_timeout_s)
                .filter(|n| *n > 0)
                .unwrap_or(FALLBACK_TIMEOUT_SECS),
        };
        Ok(Duration::from_secs(u64::from(secs)))
    }
}
