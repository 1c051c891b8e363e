//! Canonical serialization and fingerprinting of merged views.

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

/// Return a copy of `value` with object keys sorted at every depth.
///
/// Arrays keep their element order; only objects nested inside them are
/// rewritten.
pub fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(canonical_map(map)),
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}

fn canonical_map(map: &Map<String, Value>) -> Map<String, Value> {
    let mut entries: Vec<(&String, &Value)> = map.iter().collect();
    entries.sort_by(|(left, _), (right, _)| left.cmp(right));
    entries
        .into_iter()
        .map(|(key, value)| (key.clone(), canonicalize(value)))
        .collect()
}

/// Lowercase hex SHA-256 of the canonical compact JSON of a view.
pub fn digest_view(view: &Map<String, Value>) -> String {
    let serialized = Value::Object(canonical_map(view)).to_string();
    hex::encode(Sha256::digest(serialized.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    #[test]
    fn canonical_form_sorts_nested_keys() {
        let value = json!({ "b": { "y": 1, "x": [{ "q": 1, "p": 2 }] }, "a": true });
        assert_eq!(
            canonicalize(&value).to_string(),
            r#"{"a":true,"b":{"x":[{"p":2,"q":1}],"y":1}}"#
        );
    }

    #[test]
    fn empty_view_hashes_empty_object() {
        let expected = hex::encode(Sha256::digest(b"{}"));
        assert_eq!(digest_view(&Map::new()), expected);
        assert_eq!(expected.len(), 64);
    }

    /// Insertion order never leaks into the digest.
    #[test]
    fn digest_ignores_key_order() {
        let first = object(json!({ "a": 1, "b": { "c": 2, "d": 3 } }));
        let second = object(json!({ "b": { "d": 3, "c": 2 }, "a": 1 }));
        assert_eq!(digest_view(&first), digest_view(&second));
    }

    #[test]
    fn digest_tracks_array_order_and_values() {
        let base = object(json!({ "list": [1, 2] }));
        let swapped = object(json!({ "list": [2, 1] }));
        let changed = object(json!({ "list": [1, 3] }));
        assert_ne!(digest_view(&base), digest_view(&swapped));
        assert_ne!(digest_view(&base), digest_view(&changed));
    }
}
