//! Result envelope returned to the host workflow engine.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ActionError, ErrorKind};

/// Outcome of a single action invocation.
///
/// Serializes as `{"data": <payload>}` on success and as
/// `{"error": {"kind": ..., "message": ...}}` on failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionResult {
    /// The external service's payload, forwarded unmodified.
    Data(Value),
    /// A structured failure.
    Error(ErrorBody),
}

/// Error details carried by [`ActionResult::Error`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// The error category.
    pub kind: ErrorKind,
    /// Human-readable description.
    pub message: String,
    /// Upstream HTTP status, if the failure came from a response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Upstream failure category (e.g. `rate_limited`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl ActionResult {
    /// Creates a success result.
    pub fn data(payload: Value) -> Self {
        Self::Data(payload)
    }

    /// Creates an error result.
    pub fn error(error: ActionError) -> Self {
        Self::Error(ErrorBody::from(error))
    }

    /// Returns true if this is a success result.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Data(_))
    }

    /// Returns the payload of a success result.
    pub fn as_data(&self) -> Option<&Value> {
        match self {
            Self::Data(value) => Some(value),
            Self::Error(_) => None,
        }
    }

    /// Returns the error of a failed result.
    pub fn as_error(&self) -> Option<&ErrorBody> {
        match self {
            Self::Error(error) => Some(error),
            Self::Data(_) => None,
        }
    }

    /// Returns the error kind of a failed result.
    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.as_error().map(|e| e.kind)
    }
}

impl From<Result<Value, ActionError>> for ActionResult {
    fn from(result: Result<Value, ActionError>) -> Self {
        match result {
            Ok(payload) => Self::data(payload),
            Err(error) => Self::error(error),
        }
    }
}

impl From<ActionError> for ErrorBody {
    fn from(error: ActionError) -> Self {
        Self {
            kind: error.kind(),
            message: error.message().to_string(),
            status: error.status(),
            category: error.category().map(String::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_envelope_shape() {
        let result = ActionResult::data(json!({"items": []}));
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value, json!({"data": {"items": []}}));
        assert!(result.is_success());
    }

    #[test]
    fn error_envelope_shape() {
        let result = ActionResult::error(ActionError::invalid_time_range(
            "timeMax must be strictly after timeMin",
        ));
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(
            value,
            json!({"error": {
                "kind": "InvalidTimeRange",
                "message": "timeMax must be strictly after timeMin"
            }})
        );
        assert_eq!(result.error_kind(), Some(ErrorKind::InvalidTimeRange));
    }

    #[test]
    fn upstream_error_envelope_keeps_status() {
        let err = ActionError::upstream("Not Found")
            .with_status(404)
            .with_category("not_found");
        let value = serde_json::to_value(ActionResult::error(err)).unwrap();
        assert_eq!(value["error"]["status"], 404);
        assert_eq!(value["error"]["category"], "not_found");
    }

    #[test]
    fn parses_host_side() {
        let result: ActionResult =
            serde_json::from_str(r#"{"error":{"kind":"Timeout","message":"slow"}}"#).unwrap();
        assert_eq!(result.error_kind(), Some(ErrorKind::Timeout));
        assert!(result.as_data().is_none());
    }
}
