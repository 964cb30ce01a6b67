//! Untyped request payloads.
//!
//! Request bodies arrive as arbitrary JSON objects. A [`Payload`] holds that
//! object until a [`ResourceDefinition`](super::ResourceDefinition) turns it
//! into a typed draft. Fields a definition does not know about are ignored.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A JSON object received from a client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload(Map<String, Value>);

impl Payload {
    /// Create an empty payload.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a JSON value, returning `None` unless it is an object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    /// Look up a field.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Set a field, returning `self` for chaining.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    /// Copy every field of `other` over this payload, except `id`.
    ///
    /// `null` in `other` is treated like an absent field.
    pub fn overlay(&mut self, other: &Payload) {
        for (key, value) in &other.0 {
            if key == "id" || value.is_null() {
                continue;
            }
            self.0.insert(key.clone(), value.clone());
        }
    }
}
