//! Per-instance configuration for the Google Calendars addon.

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use rooms_core::AddonDescriptor;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::UpstreamError;

/// Default calendar when neither the action nor the instance names one.
pub const DEFAULT_CALENDAR_ID: &str = "primary";

/// Default page size for `list_events`.
pub const DEFAULT_MAX_RESULTS: u32 = 10;

/// Default look-ahead window, in days.
pub const DEFAULT_TIME_WINDOW_DAYS: u32 = 7;

/// Default instance timezone.
pub const DEFAULT_TIMEZONE: &str = "Europe/Paris";

/// Default outbound request timeout, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u32 = 10;

/// Google caps a single events page at 250 items.
pub const MAX_RESULTS_LIMIT: u32 = 250;

/// Five years.
pub const MAX_TIME_WINDOW_DAYS: u32 = 1825;

pub const MAX_TIMEOUT_SECS: u32 = 60;

/// Errors raised while loading or validating a descriptor.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse descriptor: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("failed to create calendar client: {0}")]
    Client(#[from] UpstreamError),
}

/// Calendar defaults applied when an action does not override them.
///
/// Unknown keys in the `config` object are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarDefaults {
    pub default_calendar_id: String,
    pub default_max_results: u32,
    pub default_time_window_days: u32,
    /// IANA timezone name.
    pub default_timezone: String,
    pub request_timeout_s: u32,
    /// Log each shaped outbound request at info level.
    pub enable_debug: bool,
}

impl Default for CalendarDefaults {
    fn default() -> Self {
        Self {
            default_calendar_id: DEFAULT_CALENDAR_ID.to_string(),
            default_max_results: DEFAULT_MAX_RESULTS,
            default_time_window_days: DEFAULT_TIME_WINDOW_DAYS,
            default_timezone: DEFAULT_TIMEZONE.to_string(),
            request_timeout_s: DEFAULT_TIMEOUT_SECS,
            enable_debug: false,
        }
    }
}

impl CalendarDefaults {
    /// Builder: set the default calendar.
    #[must_use]
    pub fn with_calendar_id(mut self, id: impl Into<String>) -> Self {
        self.default_calendar_id = id.into();
        self
    }

    /// Builder: set the default timezone.
    #[must_use]
    pub fn with_timezone(mut self, tz: impl Into<String>) -> Self {
        self.default_timezone = tz.into();
        self
    }

    /// Builder: set the default page size.
    #[must_use]
    pub fn with_max_results(mut self, max: u32) -> Self {
        self.default_max_results = max;
        self
    }

    /// Builder: set the request timeout in seconds.
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u32) -> Self {
        self.request_timeout_s = secs;
        self
    }

    /// Validates the configuration.
    ///
    /// This checks that:
    /// - `default_calendar_id` is non-blank
    /// - `default_max_results` is in `1..=250`
    /// - `default_time_window_days` is in `1..=1825`
    /// - `request_timeout_s` is in `1..=60`
    /// - `default_timezone` is a known IANA name
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_calendar_id.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "default_calendar_id must not be empty".to_string(),
            ));
        }
        check_range(
            "default_max_results",
            self.default_max_results,
            MAX_RESULTS_LIMIT,
        )?;
        check_range(
            "default_time_window_days",
            self.default_time_window_days,
            MAX_TIME_WINDOW_DAYS,
        )?;
        check_range("request_timeout_s", self.request_timeout_s, MAX_TIMEOUT_SECS)?;
        self.timezone()?;
        Ok(())
    }

    /// Parses the default timezone.
    pub fn timezone(&self) -> Result<Tz, ConfigError> {
        self.default_timezone.parse::<Tz>().map_err(|_| {
            ConfigError::Invalid(format!(
                "default_timezone '{}' is not a valid IANA timezone",
                self.default_timezone
            ))
        })
    }

    /// End of the default look-ahead window starting at `start`.
    ///
    /// Handlers never fill in a missing `timeMax` themselves; hosts that want
    /// a bounded listing call this and pass the result explicitly.
    pub fn default_window_end(&self, start: DateTime<Utc>) -> DateTime<Utc> {
        start + Duration::days(i64::from(self.default_time_window_days))
    }
}

fn check_range(field: &str, value: u32, max: u32) -> Result<(), ConfigError> {
    if value == 0 || value > max {
        return Err(ConfigError::Invalid(format!(
            "{} must be between 1 and {}, got {}",
            field, max, value
        )));
    }
    Ok(())
}

/// Descriptor of a Google Calendars addon instance.
pub type CalendarDescriptor = AddonDescriptor<CalendarDefaults>;

/// Parses and validates a descriptor from JSON text.
pub fn descriptor_from_json(json: &str) -> Result<CalendarDescriptor, ConfigError> {
    descriptor_from_value(serde_json::from_str(json)?)
}

/// Parses and validates an already-decoded descriptor (e.g. read from TOML).
pub fn descriptor_from_value(value: serde_json::Value) -> Result<CalendarDescriptor, ConfigError> {
    let descriptor: CalendarDescriptor = serde_json::from_value(value)?;
    descriptor.config.validate()?;
    Ok(descriptor)
}
