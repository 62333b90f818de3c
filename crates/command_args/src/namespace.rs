//! The resolved argument namespace of a matched branch.

use crate::value::Value;
use serde::{Deserialize, Serialize};

/// Insertion-ordered mapping from argument destination to parsed value.
///
/// A namespace returned by [`CommandArgs::parse`](crate::CommandArgs::parse)
/// is always bound to the handler of the branch that produced it, so the
/// caller knows which function to run with which values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Namespace {
    entries: Vec<(String, Value)>,
    handler: Option<String>,
}

impl Namespace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a value, replacing (in place) any previous value for `dest`.
    ///
    /// Returns the replaced value, if any.
    pub fn insert(&mut self, dest: impl Into<String>, value: Value) -> Option<Value> {
        let dest = dest.into();
        match self.entries.iter_mut().find(|(key, _)| *key == dest) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((dest, value));
                None
            }
        }
    }

    pub fn get(&self, dest: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(key, _)| key == dest)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, dest: &str) -> bool {
        self.get(dest).is_some()
    }

    /// Convenience accessor for text values.
    pub fn text(&self, dest: &str) -> Option<&str> {
        self.get(dest).and_then(Value::as_text)
    }

    /// Convenience accessor for number values.
    pub fn number(&self, dest: &str) -> Option<i64> {
        self.get(dest).and_then(Value::as_number)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(dest, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Name of the handler this namespace must be run against.
    pub fn handler(&self) -> Option<&str> {
        self.handler.as_deref()
    }

    pub(crate) fn bind(mut self, handler: &str) -> Self {
        self.handler = Some(handler.to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_keeps_order_and_replaces_in_place() {
        let mut namespace = Namespace::new();
        namespace.insert("b", Value::Number(1));
        namespace.insert("a", Value::from("x"));
        let previous = namespace.insert("b", Value::Number(2));

        assert_eq!(previous, Some(Value::Number(1)));
        let keys: Vec<&str> = namespace.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(namespace.number("b"), Some(2));
        assert_eq!(namespace.text("a"), Some("x"));
    }

    #[test]
    fn test_bind_sets_handler() {
        let namespace = Namespace::new().bind("join");
        assert_eq!(namespace.handler(), Some("join"));
        assert!(namespace.is_empty());
    }
}
