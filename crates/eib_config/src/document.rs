//! Tolerant navigation over untyped definition documents.
//!
//! Definition documents arrive as arbitrary JSON. Lookups return `None` when
//! a segment is missing or has the wrong shape instead of failing; the schema
//! is what rejects malformed documents.

use serde_json::{Map, Value};

/// Path-based lookups on a JSON tree.
pub trait DocumentExt {
    /// Follow `path` through nested objects.
    fn at_path(&self, path: &[&str]) -> Option<&Value>;

    /// Mutable variant of [`DocumentExt::at_path`].
    fn at_path_mut(&mut self, path: &[&str]) -> Option<&mut Value>;
}

impl DocumentExt for Value {
    fn at_path(&self, path: &[&str]) -> Option<&Value> {
        path.iter()
            .try_fold(self, |node, key| node.as_object()?.get(*key))
    }

    fn at_path_mut(&mut self, path: &[&str]) -> Option<&mut Value> {
        path.iter()
            .try_fold(self, |node, key| node.as_object_mut()?.get_mut(*key))
    }
}

/// String value of `key`, unless it is absent, not a string, or empty.
pub fn non_empty_str<'a>(record: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    record
        .get(key)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
}
