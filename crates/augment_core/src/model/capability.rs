//! Capability set declared by augmentable objects.
//!
//! # Responsibility
//! - Hold the name -> value map an object declares about itself.
//! - Decide whether one declared value counts as affirmative.
//!
//! # Invariants
//! - Capability sets are read-only to augmentation code.
//! - A `null` value is indistinguishable from an absent capability.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Declared capabilities of one object, keyed by capability name.
///
/// Serialized as a plain JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CapabilitySet {
    values: BTreeMap<String, Value>,
}

impl CapabilitySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, convenient for collaborator constructors.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    /// Sets one capability, returning the previous value if any.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(name.into(), value.into())
    }

    /// Returns the declared value, treating `null` as absent.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name).filter(|value| !value.is_null())
    }

    /// Returns whether `name` is declared with an affirmative value.
    pub fn is_enabled(&self, name: &str) -> bool {
        self.get(name).is_some_and(is_affirmative)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns capability names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl<K, V> FromIterator<(K, V)> for CapabilitySet
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}

/// Default affirmative rule for capability values.
///
/// - booleans are affirmative only when `true`
/// - `null` is never affirmative
/// - any other value is affirmative by presence
pub fn is_affirmative(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::{is_affirmative, CapabilitySet};
    use serde_json::{json, Value};

    #[test]
    fn booleans_follow_their_value() {
        assert!(is_affirmative(&Value::Bool(true)));
        assert!(!is_affirmative(&Value::Bool(false)));
    }

    #[test]
    fn non_boolean_values_are_affirmative_by_presence() {
        assert!(is_affirmative(&json!("css selector")));
        assert!(is_affirmative(&json!(0)));
        assert!(is_affirmative(&json!({ "mode": "strict" })));
        assert!(is_affirmative(&json!([])));
        assert!(!is_affirmative(&Value::Null));
    }

    #[test]
    fn null_values_read_as_absent() {
        let caps = CapabilitySet::new()
            .with("javascriptEnabled", Value::Null)
            .with("browserName", "stub");

        assert!(caps.get("javascriptEnabled").is_none());
        assert!(!caps.is_enabled("javascriptEnabled"));
        assert!(caps.is_enabled("browserName"));
        assert_eq!(caps.len(), 2);
    }

    #[test]
    fn serializes_as_plain_object() {
        let caps: CapabilitySet = [("supportsFindingByCss", true)].into_iter().collect();
        let json = serde_json::to_value(&caps).expect("capabilities serialize");
        assert_eq!(json, json!({ "supportsFindingByCss": true }));

        let decoded: CapabilitySet = serde_json::from_value(json).expect("capabilities decode");
        assert_eq!(decoded, caps);
    }

    #[test]
    fn names_are_sorted() {
        let caps = CapabilitySet::new().with("zeta", true).with("alpha", true);
        let names: Vec<&str> = caps.names().collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }
}
