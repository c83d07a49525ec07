//! The evaluated value model.
//!
//! Evaluation reduces every expression to one of two shapes: a piece of text
//! or an object of evaluated values. Scalars are formatted into text on the
//! spot and tuples collapse into comma-joined text, so there is no dedicated
//! number, bool or array variant. Objects keep their structure because
//! nested settings (environment variables, tags, ...) are only useful with
//! their keys intact.

use serde::ser::SerializeMap;
use serde::Serializer;

/// Result of evaluating an expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Flattened text: literals, references, templates and rendered calls.
    Text(String),
    /// An object construction, in source order.
    Object(indexmap::IndexMap<String, Value>),
}

impl Value {
    /// Returns the text, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            Value::Object(_) => None,
        }
    }

    /// Returns the members, if this is an object value.
    pub fn as_object(&self) -> Option<&indexmap::IndexMap<String, Value>> {
        match self {
            Value::Text(_) => None,
            Value::Object(members) => Some(members),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<indexmap::IndexMap<String, Value>> for Value {
    fn from(value: indexmap::IndexMap<String, Value>) -> Self {
        Value::Object(value)
    }
}

impl serde::ser::Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Text(value) => serializer.serialize_str(value),
            Value::Object(value) => {
                let mut ser = serializer.serialize_map(Some(value.len()))?;

                for (member_key, member_value) in value {
                    ser.serialize_entry(member_key, member_value)?;
                }

                ser.end()
            }
        }
    }
}
