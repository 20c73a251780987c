//! Control values: sequences of canonical coordinate keys

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::coord::{Coord, CoordPair};

/// The externally visible value of a spatial control.
///
/// Entries are canonical coordinate (or pair) strings in insertion order.
/// Membership is by string key; insertion order only carries meaning for
/// ordering controls.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValueSet(Vec<String>);

impl ValueSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(keys.into_iter().map(Into::into).collect())
    }

    /// Read a value pushed by the host; non-string entries are ignored
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Array(items) => Self(
                items
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect(),
            ),
            _ => Self::default(),
        }
    }

    pub fn to_json(&self) -> Value {
        Value::Array(self.0.iter().cloned().map(Value::String).collect())
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.iter().any(|k| k == key)
    }

    pub fn position(&self, key: &str) -> Option<usize> {
        self.0.iter().position(|k| k == key)
    }

    /// Remove `key` if present, append it otherwise. Returns whether it was added.
    pub fn toggle(&mut self, key: &str) -> bool {
        match self.position(key) {
            Some(i) => {
                self.0.remove(i);
                false
            }
            None => {
                self.0.push(key.to_string());
                true
            }
        }
    }

    /// Append `key` unless already present. Returns whether it was added.
    pub fn insert(&mut self, key: &str) -> bool {
        if self.contains(key) {
            return false;
        }
        self.0.push(key.to_string());
        true
    }

    /// Toggle an undirected link: an entry for `(A,B)` or `(B,A)` is removed,
    /// otherwise `pair` is appended. Returns whether it was added.
    pub fn toggle_link(&mut self, pair: CoordPair) -> bool {
        let existing = self.0.iter().position(|k| {
            k.parse::<CoordPair>()
                .map(|p| p.same_link(&pair))
                .unwrap_or(false)
        });
        match existing {
            Some(i) => {
                self.0.remove(i);
                false
            }
            None => {
                self.0.push(pair.key());
                true
            }
        }
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Entries that parse as single coordinates
    pub fn coords(&self) -> Vec<Coord> {
        self.0.iter().filter_map(|k| k.parse().ok()).collect()
    }

    /// Entries that parse as coordinate pairs
    pub fn pairs(&self) -> Vec<CoordPair> {
        self.0.iter().filter_map(|k| k.parse().ok()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_round_trip() {
        let mut value = ValueSet::from_keys(["1,1"]);
        assert!(value.toggle("2,2"));
        assert!(!value.toggle("2,2"));
        assert_eq!(value, ValueSet::from_keys(["1,1"]));
    }

    #[test]
    fn test_toggle_link_dedups_reversed_pair() {
        let a = Coord::new(1, 2);
        let b = Coord::new(3, 4);
        let mut value = ValueSet::new();
        assert!(value.toggle_link(CoordPair::new(a, b)));
        assert_eq!(value.as_slice(), ["1,2,3,4"]);
        assert!(!value.toggle_link(CoordPair::new(b, a)));
        assert!(value.is_empty());
    }

    #[test]
    fn test_insert_keeps_set_semantics() {
        let mut value = ValueSet::new();
        assert!(value.insert("5,5"));
        assert!(!value.insert("5,5"));
        assert_eq!(value.len(), 1);
    }

    #[test]
    fn test_json_round_trip_ignores_non_strings() {
        let json = serde_json::json!(["1,2", 3, "4,5"]);
        let value = ValueSet::from_json(&json);
        assert_eq!(value.as_slice(), ["1,2", "4,5"]);
        assert_eq!(value.to_json(), serde_json::json!(["1,2", "4,5"]));
    }

    #[test]
    fn test_coords_skip_malformed_entries() {
        let value = ValueSet::from_keys(["1,2", "bogus", "1,2,3,4"]);
        assert_eq!(value.coords(), vec![Coord::new(1, 2)]);
        assert_eq!(value.pairs().len(), 1);
    }
}
