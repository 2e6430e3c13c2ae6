//! Loosely typed JSON messages exchanged with the core.
//!
//! Requests carry a `do` or `get` operation, an optional `params` array and
//! an optional `scope` array. Responses carry `success` plus operation
//! specific fields; events carry `event` and `params`. No schema is enforced
//! beyond the field checks made where a value is consumed.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ClientError;

/// An ordered JSON object sent to or received from the core.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Message(Map<String, Value>);

impl Message {
    /// Creates an empty message.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a request that asks the core to do something (`{"do": ...}`).
    #[must_use]
    pub fn action(operation: &str) -> Self {
        let mut message = Self::new();
        message.insert("do", operation);
        message
    }

    /// Starts a request that asks the core for a value (`{"get": ...}`).
    #[must_use]
    pub fn query(operation: &str) -> Self {
        let mut message = Self::new();
        message.insert("get", operation);
        message
    }

    /// Sets the ordered `params` array.
    #[must_use]
    pub fn with_params<I, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let params: Vec<Value> = params.into_iter().map(Into::into).collect();
        self.insert("params", params);
        self
    }

    /// Sets the `scope` array produced by the scope encoder.
    #[must_use]
    pub fn with_scope(mut self, scope: Vec<String>) -> Self {
        self.insert("scope", scope);
        self
    }

    /// Inserts or replaces a field.
    pub fn insert(&mut self, key: &str, value: impl Into<Value>) {
        self.0.insert(key.to_owned(), value.into());
    }

    /// Returns a field, treating JSON `null` as absent.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|value| !value.is_null())
    }

    /// Whether the message is a push event rather than a response.
    #[must_use]
    pub fn is_event(&self) -> bool {
        self.get("event").is_some()
    }

    /// Name of the operation, used in diagnostics.
    ///
    /// Falls back to the event type for events and `"response"` otherwise.
    #[must_use]
    pub fn operation(&self) -> &str {
        ["do", "get", "event"]
            .into_iter()
            .find_map(|key| self.get(key).and_then(Value::as_str))
            .unwrap_or("response")
    }

    /// Borrows the underlying JSON object.
    #[must_use]
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Reads a string field from a response.
    pub fn string(&self, field: &'static str) -> Result<String, ClientError> {
        match self.get(field) {
            Some(Value::String(value)) => Ok(value.clone()),
            Some(_) => Err(ClientError::InvalidField {
                field,
                expected: "a string",
            }),
            None => Err(self.missing(field)),
        }
    }

    /// Reads a boolean field from a response.
    pub fn boolean(&self, field: &'static str) -> Result<bool, ClientError> {
        match self.get(field) {
            Some(Value::Bool(value)) => Ok(*value),
            Some(_) => Err(ClientError::InvalidField {
                field,
                expected: "a boolean",
            }),
            None => Err(self.missing(field)),
        }
    }

    /// Reads an array-of-strings field from a response.
    pub fn strings(&self, field: &'static str) -> Result<Vec<String>, ClientError> {
        let value = self.get(field).ok_or_else(|| self.missing(field))?;
        string_array(value).ok_or(ClientError::InvalidField {
            field,
            expected: "an array of strings",
        })
    }

    fn missing(&self, field: &'static str) -> ClientError {
        ClientError::MissingField {
            operation: self.operation().to_owned(),
            field,
        }
    }
}

impl From<Map<String, Value>> for Message {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Converts a JSON array whose elements are all strings.
///
/// Returns `None` for non-arrays and for arrays holding any other value.
#[must_use]
pub fn string_array(value: &Value) -> Option<Vec<String>> {
    value
        .as_array()?
        .iter()
        .map(|item| item.as_str().map(str::to_owned))
        .collect()
}
