//! Loosely-typed action parameters.
//!
//! The workflow engine hands every action a JSON object. [`Parameters`] wraps
//! it with typed accessors that turn type mismatches into
//! [`ErrorKind::InvalidParameter`](crate::ErrorKind::InvalidParameter) errors
//! naming the offending key. A JSON `null` is treated the same as an absent
//! key.

use serde_json::{Map, Value};

use crate::error::{ActionError, Outcome};

/// Parameters of a single action invocation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parameters {
    values: Map<String, Value>,
}

impl Parameters {
    /// Creates an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds parameters from a JSON value, which must be an object (or null).
    pub fn from_value(value: Value) -> Outcome<Self> {
        match value {
            Value::Object(values) => Ok(Self { values }),
            Value::Null => Ok(Self::new()),
            other => Err(ActionError::invalid_parameter(format!(
                "parameters must be a JSON object, got {}",
                type_name(&other)
            ))),
        }
    }

    /// Builder: set a parameter.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Returns the raw value for `key`, treating `null` as absent.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key).filter(|v| !v.is_null())
    }

    /// Returns true if `key` is present and not null.
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Returns the parameter names that are set.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values
            .iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(k, _)| k.as_str())
    }

    /// Returns an optional string parameter.
    pub fn optional_str(&self, key: &str) -> Outcome<Option<&str>> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(other) => Err(type_mismatch(key, "a string", other)),
        }
    }

    /// Returns an optional string parameter, treating blank strings as absent.
    pub fn optional_non_empty_str(&self, key: &str) -> Outcome<Option<&str>> {
        Ok(self
            .optional_str(key)?
            .map(str::trim)
            .filter(|s| !s.is_empty()))
    }

    /// Returns a required, non-blank string parameter.
    pub fn required_str(&self, key: &str) -> Outcome<&str> {
        self.optional_non_empty_str(key)?
            .ok_or_else(|| ActionError::missing_parameter(key))
    }

    /// Returns an optional positive integer.
    ///
    /// Accepts JSON integers and integer-valued strings (`"25"`).
    pub fn optional_positive_int(&self, key: &str) -> Outcome<Option<u32>> {
        let Some(value) = self.get(key) else {
            return Ok(None);
        };
        let parsed = match value {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse::<u64>().ok(),
            _ => None,
        };
        match parsed.and_then(|n| u32::try_from(n).ok()) {
            Some(n) if n > 0 => Ok(Some(n)),
            _ => Err(ActionError::invalid_parameter(format!(
                "{} must be a positive integer, got {}",
                key, value
            ))),
        }
    }

    /// Returns an optional boolean.
    ///
    /// Accepts JSON booleans and the strings `"true"` / `"false"`.
    pub fn optional_bool(&self, key: &str) -> Outcome<Option<bool>> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(Value::String(s)) if s.eq_ignore_ascii_case("true") => Ok(Some(true)),
            Some(Value::String(s)) if s.eq_ignore_ascii_case("false") => Ok(Some(false)),
            Some(other) => Err(type_mismatch(key, "a boolean", other)),
        }
    }

    /// Returns an optional array parameter.
    pub fn optional_array(&self, key: &str) -> Outcome<Option<&Vec<Value>>> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Array(items)) => Ok(Some(items)),
            Some(other) => Err(type_mismatch(key, "an array", other)),
        }
    }

    /// Returns the underlying JSON object.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.values
    }
}

impl From<Map<String, Value>> for Parameters {
    fn from(values: Map<String, Value>) -> Self {
        Self { values }
    }
}

fn type_mismatch(key: &str, expected: &str, got: &Value) -> ActionError {
    ActionError::invalid_parameter(format!(
        "{} must be {}, got {}",
        key,
        expected,
        type_name(got)
    ))
}

pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
