//! Structural query keys
//!
//! A [`QueryKey`] is an ordered list of segments. Keys compare and hash by
//! value, and a key addresses every key it is a prefix of, which is how a
//! whole branch of the key tree is invalidated at once.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

/// Canonical JSON text of a parameter object.
///
/// Object keys are sorted recursively, so two parameter objects with the
/// same entries in a different insertion order produce the same text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalParams(String);

impl CanonicalParams {
    /// Canonicalize any serializable params; `()` and `None` become `{}`.
    #[must_use]
    pub fn new<P: Serialize + ?Sized>(params: &P) -> Self {
        match serde_json::to_value(params) {
            Ok(value) => Self::from_value(value),
            Err(err) => {
                tracing::warn!(error = %err, "query params are not serializable");
                Self(format!("<unserializable: {err}>"))
            }
        }
    }

    #[must_use]
    pub fn from_value(value: Value) -> Self {
        let value = match value {
            Value::Null => Value::Object(Map::new()),
            other => canonicalize(other),
        };
        Self(value.to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, canonicalize(v)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.into_iter().map(canonicalize).collect()),
        other => other,
    }
}

/// One element of a key path
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeySegment {
    Str(String),
    Int(i64),
    Params(CanonicalParams),
    /// Placeholder for an identifier the caller does not know yet
    Unset,
}

impl From<&str> for KeySegment {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for KeySegment {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<i64> for KeySegment {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<Option<i64>> for KeySegment {
    fn from(value: Option<i64>) -> Self {
        value.map_or(Self::Unset, Self::Int)
    }
}

impl From<CanonicalParams> for KeySegment {
    fn from(value: CanonicalParams) -> Self {
        Self::Params(value)
    }
}

impl fmt::Display for KeySegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => write!(f, "{}", Value::String(s.clone())),
            Self::Int(i) => write!(f, "{i}"),
            Self::Params(p) => f.write_str(p.as_str()),
            Self::Unset => f.write_str("null"),
        }
    }
}

/// Hierarchical cache key
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey {
    segments: Vec<KeySegment>,
}

impl QueryKey {
    /// Root key of a resource group namespace
    #[must_use]
    pub fn new(namespace: &str) -> Self {
        Self {
            segments: vec![KeySegment::from(namespace)],
        }
    }

    /// Child key with one more segment
    #[must_use]
    pub fn with(&self, segment: impl Into<KeySegment>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self { segments }
    }

    /// Child key ending in canonicalized params
    #[must_use]
    pub fn with_params<P: Serialize + ?Sized>(&self, params: &P) -> Self {
        self.with(CanonicalParams::new(params))
    }

    #[must_use]
    pub fn segments(&self) -> &[KeySegment] {
        &self.segments
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Namespace (first segment) as text
    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        match self.segments.first() {
            Some(KeySegment::Str(s)) => Some(s),
            _ => None,
        }
    }

    /// True if `self` equals `other` or is one of its ancestors.
    #[must_use]
    pub fn is_prefix_of(&self, other: &Self) -> bool {
        other.segments.starts_with(&self.segments)
    }

    /// True if the key still holds a placeholder identifier.
    #[must_use]
    pub fn has_unset(&self) -> bool {
        self.segments.contains(&KeySegment::Unset)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{segment}")?;
        }
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use serde_json::json;

    use super::*;

    fn list_key(params: &Value) -> QueryKey {
        QueryKey::new("learningResources")
            .with("list")
            .with_params(params)
    }

    #[test]
    fn test_equivalent_params_produce_equal_keys() {
        let a: Value =
            serde_json::from_str(r#"{"limit": 5, "resource_type": ["course"], "offset": 10}"#)
                .unwrap();
        let b: Value =
            serde_json::from_str(r#"{"offset": 10, "limit": 5, "resource_type": ["course"]}"#)
                .unwrap();
        assert_eq!(list_key(&a), list_key(&b));

        let mut set = HashSet::new();
        set.insert(list_key(&a));
        assert!(set.contains(&list_key(&b)));
    }

    #[test]
    fn test_nested_objects_are_canonical() {
        let a = json!({"filter": {"b": 1, "a": 2}});
        let b = json!({"filter": {"a": 2, "b": 1}});
        assert_eq!(list_key(&a), list_key(&b));
    }

    #[test]
    fn test_distinct_params_produce_distinct_keys() {
        let empty = list_key(&json!({}));
        let limited = list_key(&json!({"limit": 5}));
        assert_ne!(empty, limited);
        assert!(!empty.is_prefix_of(&limited));
        assert!(!limited.is_prefix_of(&empty));
    }

    #[test]
    fn test_missing_params_default_to_empty_object() {
        let unit = QueryKey::new("articles").with("list").with_params(&());
        let empty = QueryKey::new("articles").with("list").with_params(&json!({}));
        assert_eq!(unit, empty);
    }

    #[test]
    fn test_array_order_is_significant() {
        assert_ne!(
            list_key(&json!({"topic": ["a", "b"]})),
            list_key(&json!({"topic": ["b", "a"]}))
        );
    }

    #[test]
    fn test_prefix_relation() {
        let root = QueryKey::new("learningResources");
        let list = root.with("list");
        let page = list.with_params(&json!({"limit": 5}));
        assert!(root.is_prefix_of(&page));
        assert!(list.is_prefix_of(&page));
        assert!(page.is_prefix_of(&page));
        assert!(!page.is_prefix_of(&list));
        assert!(!QueryKey::new("channels").is_prefix_of(&page));
    }

    #[test]
    fn test_string_and_int_segments_differ() {
        let by_int = QueryKey::new("x").with(5_i64);
        let by_str = QueryKey::new("x").with("5");
        assert_ne!(by_int, by_str);
    }

    #[test]
    fn test_unset_segment() {
        let key = QueryKey::new("learningResources").with("detail").with(None::<i64>);
        assert!(key.has_unset());
        assert_eq!(key.to_string(), r#"["learningResources","detail",null]"#);
    }

    #[test]
    fn test_display() {
        let key = list_key(&json!({"offset": 0, "limit": 5}));
        assert_eq!(
            key.to_string(),
            r#"["learningResources","list",{"limit":5,"offset":0}]"#
        );
        assert_eq!(key.namespace(), Some("learningResources"));
        assert_eq!(key.len(), 3);
    }
}
