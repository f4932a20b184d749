//! Override sets
//!
//! An override set is the caller-supplied mapping of top-level keys that
//! must appear, verbatim, in the final configuration document.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// A set of top-level key/value overrides.
///
/// Preserves insertion order for predictable output. Values are arbitrary
/// JSON; the set does not validate semantic correctness (e.g. that a DNS
/// entry is a well-formed IP address).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OverrideSet(Map<String, Value>);

impl OverrideSet {
    /// Create an empty override set.
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Set a key, replacing any prior value for it.
    pub fn set(mut self, key: impl Into<String>, value: Value) -> Self {
        self.0.insert(key.into(), value);
        self
    }

    /// Build an override set from a JSON object. Returns `None` for any
    /// other JSON type.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    /// Iterate over the overrides in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The overrides as a JSON object value.
    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }
}

/// The motivating override set: pin public DNS resolvers and disable IPv6
/// in the Docker daemon config.
pub fn docker_network_defaults() -> OverrideSet {
    OverrideSet::new()
        .set("dns", json!(["8.8.8.8", "8.8.4.4"]))
        .set("ipv6", json!(false))
        .set("fixed-cidr-v6", json!(""))
}
