//! Error types for addon action invocations.
//!
//! Every failure an action can produce is described by an [`ActionError`],
//! which carries an [`ErrorKind`] and a human-readable message. Errors never
//! cross the invocation boundary as faults: they are folded into an
//! [`ActionResult`](crate::ActionResult) error envelope.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The category of an action failure.
///
/// Serialized with the variant name (e.g. `"InvalidTimeRange"`), which is the
/// value the host sees in `error.kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// The action name is not part of this addon's action set.
    UnknownAction,
    /// The addon instance is disabled.
    AddonDisabled,
    /// A parameter is missing, has the wrong type, or is malformed.
    InvalidParameter,
    /// A time or date range is empty or reversed.
    InvalidTimeRange,
    /// A timezone name is not a recognized IANA identifier.
    InvalidTimezone,
    /// An event supplies both window forms, or neither.
    AmbiguousEventWindow,
    /// The external service failed (transport, auth, rate limit, 4xx/5xx).
    UpstreamError,
    /// The outbound call exceeded the resolved timeout.
    Timeout,
    /// The host cancelled the invocation before it completed.
    Cancelled,
}

impl ErrorKind {
    /// Returns the wire name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnknownAction => "UnknownAction",
            Self::AddonDisabled => "AddonDisabled",
            Self::InvalidParameter => "InvalidParameter",
            Self::InvalidTimeRange => "InvalidTimeRange",
            Self::InvalidTimezone => "InvalidTimezone",
            Self::AmbiguousEventWindow => "AmbiguousEventWindow",
            Self::UpstreamError => "UpstreamError",
            Self::Timeout => "Timeout",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Returns true for failures detected locally, before any outbound call.
    pub fn is_validation(&self) -> bool {
        !matches!(self, Self::UpstreamError | Self::Timeout | Self::Cancelled)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An error produced while invoking an addon action.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct ActionError {
    kind: ErrorKind,
    message: String,
    /// HTTP status of the upstream response, when there was one.
    status: Option<u16>,
    /// Finer-grained category for upstream failures (e.g. `rate_limited`).
    category: Option<String>,
}

impl ActionError {
    /// Creates a new error with the given kind and message.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            category: None,
        }
    }

    /// Creates an unknown action error.
    pub fn unknown_action(action: &str) -> Self {
        Self::new(
            ErrorKind::UnknownAction,
            format!("unknown action '{}'", action),
        )
    }

    /// Creates an addon disabled error.
    pub fn addon_disabled(addon_id: &str) -> Self {
        Self::new(
            ErrorKind::AddonDisabled,
            format!("addon '{}' is disabled", addon_id),
        )
    }

    /// Creates an invalid parameter error.
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidParameter, message)
    }

    /// Creates a missing required parameter error.
    pub fn missing_parameter(name: &str) -> Self {
        Self::invalid_parameter(format!("missing required parameter: {}", name))
    }

    /// Creates an invalid time range error.
    pub fn invalid_time_range(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidTimeRange, message)
    }

    /// Creates an invalid timezone error.
    pub fn invalid_timezone(name: &str) -> Self {
        Self::new(
            ErrorKind::InvalidTimezone,
            format!("invalid IANA timezone: '{}'", name),
        )
    }

    /// Creates an ambiguous event window error.
    pub fn ambiguous_event_window(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AmbiguousEventWindow, message)
    }

    /// Creates an upstream error.
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UpstreamError, message)
    }

    /// Creates a timeout error.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Timeout, message)
    }

    /// Creates a cancellation error.
    pub fn cancelled() -> Self {
        Self::new(ErrorKind::Cancelled, "invocation cancelled by host")
    }

    /// Sets the upstream HTTP status.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the upstream failure category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Returns the error kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the upstream HTTP status, if any.
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// Returns the upstream failure category, if any.
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }
}

/// A specialized Result type for action operations.
pub type Outcome<T> = Result<T, ActionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_serializes_as_variant_name() {
        let json = serde_json::to_string(&ErrorKind::AmbiguousEventWindow).unwrap();
        assert_eq!(json, "\"AmbiguousEventWindow\"");
        assert_eq!(ErrorKind::InvalidTimeRange.as_str(), "InvalidTimeRange");
    }

    #[test]
    fn validation_kinds() {
        assert!(ErrorKind::InvalidParameter.is_validation());
        assert!(ErrorKind::UnknownAction.is_validation());
        assert!(!ErrorKind::UpstreamError.is_validation());
        assert!(!ErrorKind::Timeout.is_validation());
        assert!(!ErrorKind::Cancelled.is_validation());
    }

    #[test]
    fn error_display() {
        let err = ActionError::missing_parameter("timeMin");
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
        assert_eq!(
            err.to_string(),
            "InvalidParameter: missing required parameter: timeMin"
        );
    }

    #[test]
    fn upstream_details() {
        let err = ActionError::upstream("quota exceeded")
            .with_status(429)
            .with_category("rate_limited");
        assert_eq!(err.status(), Some(429));
        assert_eq!(err.category(), Some("rate_limited"));
        assert!(!err.kind().is_validation());
    }
}
