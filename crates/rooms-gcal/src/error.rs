//! Errors from the Google Calendar API boundary.
//!
//! [`UpstreamError`] classifies what went wrong with an outbound call so the
//! host can decide whether to retry. It folds into the addon's
//! [`ActionError`] envelope: timeouts become `Timeout`, everything else
//! becomes `UpstreamError` carrying the HTTP status and category.

use std::fmt;

use rooms_core::ActionError;
use thiserror::Error;

/// The category of an upstream failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpstreamErrorCode {
    /// Missing, expired or rejected access token (401).
    AuthenticationFailed,
    /// The token lacks access to the calendar (403).
    AuthorizationFailed,
    /// Too many requests (429).
    RateLimited,
    /// Calendar or resource not found (404).
    NotFound,
    /// The service rejected the request (other 4xx).
    BadRequest,
    /// The service failed (5xx).
    ServerError,
    /// Connection, DNS or TLS failure before a response arrived.
    NetworkError,
    /// The request did not complete within the resolved timeout.
    Timeout,
    /// The response could not be read.
    InvalidResponse,
    /// Conferencing was requested but the service did not create it.
    ConferenceUnavailable,
}

impl UpstreamErrorCode {
    /// Returns true if this error is transient and the call may be retried.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited | Self::ServerError | Self::NetworkError | Self::Timeout
        )
    }

    /// Returns the category name reported to the host.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AuthenticationFailed => "authentication_failed",
            Self::AuthorizationFailed => "authorization_failed",
            Self::RateLimited => "rate_limited",
            Self::NotFound => "not_found",
            Self::BadRequest => "bad_request",
            Self::ServerError => "server_error",
            Self::NetworkError => "network_error",
            Self::Timeout => "timeout",
            Self::InvalidResponse => "invalid_response",
            Self::ConferenceUnavailable => "conference_unavailable",
        }
    }

    /// Classifies a non-success HTTP status.
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => Self::AuthenticationFailed,
            403 => Self::AuthorizationFailed,
            404 => Self::NotFound,
            429 => Self::RateLimited,
            500..=599 => Self::ServerError,
            _ => Self::BadRequest,
        }
    }
}

impl fmt::Display for UpstreamErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An error from the Google Calendar API.
#[derive(Debug, Error)]
pub struct UpstreamError {
    code: UpstreamErrorCode,
    message: String,
    status: Option<u16>,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl UpstreamError {
    /// Creates a new upstream error.
    pub fn new(code: UpstreamErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            status: None,
            source: None,
        }
    }

    /// Creates an error from a non-success HTTP response.
    pub fn from_response(status: u16, message: impl Into<String>) -> Self {
        Self::new(UpstreamErrorCode::from_status(status), message).with_status(status)
    }

    /// Creates an authentication error.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(UpstreamErrorCode::AuthenticationFailed, message)
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(UpstreamErrorCode::NetworkError, message)
    }

    /// Creates a timeout error.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(UpstreamErrorCode::Timeout, message)
    }

    /// Creates an invalid response error.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(UpstreamErrorCode::InvalidResponse, message)
    }

    /// Creates a conference unavailable error.
    pub fn conference_unavailable(message: impl Into<String>) -> Self {
        Self::new(UpstreamErrorCode::ConferenceUnavailable, message)
    }

    /// Sets the HTTP status.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the source error.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    /// Returns the error code.
    pub fn code(&self) -> UpstreamErrorCode {
        self.code
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the HTTP status, if a response was received.
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// Returns true if this error is transient.
    pub fn is_retryable(&self) -> bool {
        self.code.is_retryable()
    }
}

impl fmt::Display for UpstreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} (HTTP {}): {}", self.code, status, self.message),
            None => write!(f, "{}: {}", self.code, self.message),
        }
    }
}

impl From<UpstreamError> for ActionError {
    fn from(err: UpstreamError) -> Self {
        let base = match err.code {
            UpstreamErrorCode::Timeout => ActionError::timeout(err.message.clone()),
            _ => ActionError::upstream(err.message.clone()),
        };
        let base = base.with_category(err.code.as_str());
        match err.status {
            Some(status) => base.with_status(status),
            None => base,
        }
    }
}

/// A specialized Result type for upstream calls.
pub type UpstreamResult<T> = Result<T, UpstreamError>;
