//! Dynamic navigation over decoded responses.
//!
//! The shape of a method's result is not known at compile time. A
//! [`ResultNavigator`] lets callers walk a path such as
//! `result.get("items").get(0).get("name")` without checking each step: a
//! missing key, an out-of-range index or a key of the wrong kind produces an
//! absent navigator instead of an error. Absence only surfaces at the terminal
//! accessors, which return the zero value of the requested kind.

use crate::error::CoercionError;
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde_json::{Map, Number, Value};
use std::fmt;
use std::sync::Arc;

/// Field under which the raw response body is enveloped before narrowing.
const ENVELOPE_FIELD: &str = "result";

/// A navigation step.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Name(String),
    Index(i64),
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Key::Name(name.to_string())
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Key::Name(name)
    }
}

impl From<&String> for Key {
    fn from(name: &String) -> Self {
        Key::Name(name.clone())
    }
}

impl From<i32> for Key {
    fn from(index: i32) -> Self {
        Key::Index(i64::from(index))
    }
}

impl From<i64> for Key {
    fn from(index: i64) -> Self {
        Key::Index(index)
    }
}

impl From<usize> for Key {
    fn from(index: usize) -> Self {
        Key::Index(i64::try_from(index).unwrap_or(i64::MAX))
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Name(name) => f.write_str(name),
            Key::Index(index) => write!(f, "[{}]", index),
        }
    }
}

/// Decoded response with containers behind `Arc`, so narrowing a cursor is
/// a pointer copy rather than a walk from the root.
#[derive(Debug, Clone)]
enum Tree {
    Null,
    Bool(bool),
    Number(Number),
    String(Arc<str>),
    Sequence(Arc<[Tree]>),
    Mapping(Arc<IndexMap<String, Tree>>),
}

impl From<Value> for Tree {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Tree::Null,
            Value::Bool(b) => Tree::Bool(b),
            Value::Number(n) => Tree::Number(n),
            Value::String(s) => Tree::String(s.into()),
            Value::Array(items) => Tree::Sequence(items.into_iter().map(Tree::from).collect()),
            Value::Object(map) => Tree::Mapping(Arc::new(
                map.into_iter()
                    .map(|(name, value)| (name, Tree::from(value)))
                    .collect(),
            )),
        }
    }
}

impl Tree {
    fn kind(&self) -> &'static str {
        match self {
            Tree::Null => "null",
            Tree::Bool(_) => "boolean",
            Tree::Number(_) => "number",
            Tree::String(_) => "string",
            Tree::Sequence(_) => "array",
            Tree::Mapping(_) => "map",
        }
    }

    /// Mappings answer to names, sequences to indices; anything else is absent.
    fn child(&self, key: &Key) -> Option<&Tree> {
        match (self, key) {
            (Tree::Mapping(map), Key::Name(name)) => map.get(name),
            (Tree::Sequence(items), Key::Index(index)) => {
                usize::try_from(*index).ok().and_then(|i| items.get(i))
            }
            _ => None,
        }
    }

    fn to_value(&self) -> Value {
        match self {
            Tree::Null => Value::Null,
            Tree::Bool(b) => Value::Bool(*b),
            Tree::Number(n) => Value::Number(n.clone()),
            Tree::String(s) => Value::String(s.to_string()),
            Tree::Sequence(items) => Value::Array(items.iter().map(Tree::to_value).collect()),
            Tree::Mapping(map) => Value::Object(Self::to_map(map)),
        }
    }

    fn to_map(map: &IndexMap<String, Tree>) -> Map<String, Value> {
        map.iter()
            .map(|(name, value)| (name.clone(), value.to_value()))
            .collect()
    }
}

/// One step of the path from the root, linked to its parent.
#[derive(Debug)]
struct Step {
    parent: Option<Arc<Step>>,
    key: Key,
}

/// A read-only cursor into a decoded JSON tree.
///
/// Cloning and narrowing are cheap: the tree is shared and each navigator
/// holds its resolved position plus a link to its parent's path.
#[derive(Debug, Clone)]
pub struct ResultNavigator {
    cursor: Option<Tree>,
    path: Option<Arc<Step>>,
}

impl ResultNavigator {
    /// Wrap a decoded value, with the cursor at its root.
    pub fn new(root: Value) -> Self {
        Self {
            cursor: Some(Tree::from(root)),
            path: None,
        }
    }

    /// Wrap a raw response body and position the cursor at the payload.
    ///
    /// The body is enveloped as `{"result": body}` and narrowed once, so the
    /// whole response and a `result` field inside a generic envelope share
    /// the same coercion path.
    pub fn from_response(body: Value) -> Self {
        let mut envelope = Map::new();
        envelope.insert(ENVELOPE_FIELD.to_string(), body);
        Self::new(Value::Object(envelope)).get(ENVELOPE_FIELD)
    }

    /// Narrow to the value at `key`. Never fails.
    pub fn get(&self, key: impl Into<Key>) -> ResultNavigator {
        let key = key.into();
        let cursor = self.cursor.as_ref().and_then(|tree| tree.child(&key)).cloned();
        self.child(key, cursor)
    }

    fn child(&self, key: Key, cursor: Option<Tree>) -> ResultNavigator {
        ResultNavigator {
            cursor,
            path: Some(Arc::new(Step {
                parent: self.path.clone(),
                key,
            })),
        }
    }

    /// Copy of the value under the cursor, if any.
    pub fn to_value(&self) -> Option<Value> {
        self.cursor.as_ref().map(Tree::to_value)
    }

    /// Kind of the value under the cursor: `absent`, `null`, `boolean`,
    /// `number`, `string`, `array` or `map`.
    pub fn kind(&self) -> &'static str {
        self.cursor.as_ref().map_or("absent", Tree::kind)
    }

    /// Path walked from the root, e.g. `items[0].name`.
    pub fn path(&self) -> String {
        let mut keys = Vec::new();
        let mut step = self.path.as_deref();
        while let Some(current) = step {
            keys.push(&current.key);
            step = current.parent.as_deref();
        }

        let mut rendered = String::new();
        for key in keys.into_iter().rev() {
            if let Key::Name(_) = key {
                if !rendered.is_empty() {
                    rendered.push('.');
                }
            }
            rendered.push_str(&key.to_string());
        }
        rendered
    }

    pub fn exists(&self) -> bool {
        self.cursor.is_some()
    }

    pub fn is_null(&self) -> bool {
        matches!(self.cursor, Some(Tree::Null))
    }

    /// Number of elements of a sequence or entries of a mapping; zero otherwise.
    pub fn len(&self) -> usize {
        match &self.cursor {
            Some(Tree::Sequence(items)) => items.len(),
            Some(Tree::Mapping(map)) => map.len(),
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Strings are returned as-is and numbers or booleans in their textual
    /// form. Absent and null read as an empty string.
    pub fn as_string(&self) -> Result<String, CoercionError> {
        match &self.cursor {
            None | Some(Tree::Null) => Ok(String::new()),
            Some(Tree::String(s)) => Ok(s.to_string()),
            Some(Tree::Number(n)) => Ok(n.to_string()),
            Some(Tree::Bool(b)) => Ok(b.to_string()),
            Some(_) => Err(self.mismatch("string")),
        }
    }

    pub fn as_integer(&self) -> Result<i64, CoercionError> {
        match &self.cursor {
            None | Some(Tree::Null) => Ok(0),
            Some(Tree::Number(n)) => n.as_i64().ok_or_else(|| self.mismatch("integer")),
            Some(_) => Err(self.mismatch("integer")),
        }
    }

    pub fn as_float(&self) -> Result<f64, CoercionError> {
        match &self.cursor {
            None | Some(Tree::Null) => Ok(0.0),
            Some(Tree::Number(n)) => n.as_f64().ok_or_else(|| self.mismatch("float")),
            Some(_) => Err(self.mismatch("float")),
        }
    }

    pub fn as_boolean(&self) -> Result<bool, CoercionError> {
        match &self.cursor {
            None | Some(Tree::Null) => Ok(false),
            Some(Tree::Bool(b)) => Ok(*b),
            Some(_) => Err(self.mismatch("boolean")),
        }
    }

    /// The sequence under the cursor. Absent reads as empty; use
    /// [`exists`](Self::exists) to tell the two apart.
    pub fn as_array(&self) -> Result<Vec<Value>, CoercionError> {
        match &self.cursor {
            None | Some(Tree::Null) => Ok(Vec::new()),
            Some(Tree::Sequence(items)) => Ok(items.iter().map(Tree::to_value).collect()),
            Some(_) => Err(self.mismatch("array")),
        }
    }

    /// The mapping under the cursor. Absent reads as empty.
    pub fn as_map(&self) -> Result<Map<String, Value>, CoercionError> {
        match &self.cursor {
            None | Some(Tree::Null) => Ok(Map::new()),
            Some(Tree::Mapping(map)) => Ok(Tree::to_map(map)),
            Some(_) => Err(self.mismatch("map")),
        }
    }

    /// One navigator per element of a sequence; empty for anything else.
    pub fn items(&self) -> Vec<ResultNavigator> {
        match &self.cursor {
            Some(Tree::Sequence(items)) => items
                .iter()
                .enumerate()
                .map(|(i, item)| self.child(Key::from(i), Some(item.clone())))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Names of a mapping's entries, in response order.
    pub fn keys(&self) -> Vec<String> {
        match &self.cursor {
            Some(Tree::Mapping(map)) => map.keys().cloned().collect(),
            _ => Vec::new(),
        }
    }

    /// Deserialize the value under the cursor. Absent deserializes as null,
    /// so `Option<T>` targets read as `None`.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.to_value().unwrap_or(Value::Null))
    }

    fn mismatch(&self, expected: &'static str) -> CoercionError {
        CoercionError {
            path: self.path(),
            expected,
            found: self.kind(),
        }
    }
}

impl From<Value> for ResultNavigator {
    fn from(value: Value) -> Self {
        ResultNavigator::new(value)
    }
}

/// JSON text of the value under the cursor; empty when absent.
impl fmt::Display for ResultNavigator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_value() {
            Some(value) => write!(f, "{}", value),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response() -> ResultNavigator {
        ResultNavigator::from_response(json!({
            "items": [{"name": "a", "count": 3, "ratio": 0.25, "active": true}],
            "token": "abc123",
            "nothing": null
        }))
    }

    #[test]
    fn test_from_response_narrows_once() {
        let nav = response();
        assert_eq!(nav.path(), "result");
        assert!(nav.exists());
        assert_eq!(nav.get("token").as_string().unwrap(), "abc123");
    }

    #[test]
    fn test_deep_path() {
        let nav = response();
        assert_eq!(nav.get("items").get(0).get("name").as_string().unwrap(), "a");
        assert_eq!(nav.get("items").get(0).get("count").as_integer().unwrap(), 3);
        assert_eq!(nav.get("items").get(0).get("ratio").as_float().unwrap(), 0.25);
        assert!(nav.get("items").get(0).get("active").as_boolean().unwrap());
    }

    #[test]
    fn test_missing_paths_are_absent() {
        let nav = response();
        let missing = nav.get("items").get(5).get("name");
        assert!(!missing.exists());
        assert_eq!(missing.as_string().unwrap(), "");
        assert_eq!(missing.as_integer().unwrap(), 0);
        assert_eq!(missing.as_float().unwrap(), 0.0);
        assert!(!missing.as_boolean().unwrap());
        assert!(missing.as_array().unwrap().is_empty());
        assert!(missing.as_map().unwrap().is_empty());
        assert_eq!(missing.to_string(), "");
    }

    #[test]
    fn test_key_kind_mismatch_is_absent() {
        let nav = response();
        assert!(!nav.get(0).exists());
        assert!(!nav.get("items").get("name").exists());
        assert!(!nav.get("items").get(-1).exists());
        assert!(!nav.get("token").get("x").exists());
    }

    #[test]
    fn test_absent_stays_absent() {
        let nav = response();
        let gone = nav.get("nope").get("items").get(0);
        assert!(!gone.exists());
        assert_eq!(gone.path(), "result.nope.items[0]");
    }

    #[test]
    fn test_null_exists_but_reads_as_zero() {
        let nothing = response().get("nothing");
        assert!(nothing.exists());
        assert!(nothing.is_null());
        assert_eq!(nothing.as_string().unwrap(), "");
        assert_eq!(nothing.as_integer().unwrap(), 0);
    }

    #[test]
    fn test_incompatible_kind_is_a_coercion_error() {
        let nav = response();
        let err = nav.get("token").as_integer().unwrap_err();
        assert_eq!(err.expected, "integer");
        assert_eq!(err.found, "string");
        assert_eq!(err.path, "result.token");

        assert!(nav.get("items").as_string().is_err());
        assert!(nav.get("items").get(0).get("ratio").as_integer().is_err());
        assert!(nav.get("token").as_map().is_err());
    }

    #[test]
    fn test_scalars_render_as_text() {
        let nav = response();
        assert_eq!(nav.get("items").get(0).get("count").as_string().unwrap(), "3");
        assert_eq!(nav.get("items").get(0).get("active").as_string().unwrap(), "true");
    }

    #[test]
    fn test_items_and_keys() {
        let nav = ResultNavigator::from_response(json!([{"id": 1}, {"id": 2}]));
        let ids: Vec<i64> = nav
            .items()
            .iter()
            .map(|item| item.get("id").as_integer().unwrap())
            .collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(nav.len(), 2);
        assert_eq!(nav.get(1).keys(), vec!["id".to_string()]);
    }

    #[test]
    fn test_scalar_response() {
        let nav = ResultNavigator::from_response(json!(true));
        assert!(nav.as_boolean().unwrap());
        assert!(!nav.get("anything").exists());
    }

    #[test]
    fn test_deserialize() {
        #[derive(serde::Deserialize, Debug, PartialEq)]
        struct Item {
            name: String,
            count: u32,
        }

        let nav = response();
        let item: Item = nav.get("items").get(0).deserialize().unwrap();
        assert_eq!(item, Item { name: "a".to_string(), count: 3 });

        let missing: Option<Item> = nav.get("missing").deserialize().unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn test_display_is_json() {
        let nav = response();
        assert_eq!(nav.get("items").get(0).get("name").to_string(), "\"a\"");
    }

    #[test]
    fn test_narrowing_shares_the_decoded_tree() {
        let nav = response();
        let first = nav.get("items");
        let second = nav.get("items");

        match (&first.cursor, &second.cursor) {
            (Some(Tree::Sequence(a)), Some(Tree::Sequence(b))) => assert!(Arc::ptr_eq(a, b)),
            other => panic!("expected two sequences, got {:?}", other),
        }
    }

    #[test]
    fn test_items_carry_their_position() {
        let nav = ResultNavigator::from_response(json!({"items": ["x", "y", "z"]}));
        let items = nav.get("items").items();

        assert_eq!(items.len(), 3);
        assert_eq!(items[2].path(), "result.items[2]");
        assert_eq!(items[2].as_string().unwrap(), "z");
        assert_eq!(items[1].kind(), "string");
    }

    #[test]
    fn test_deep_chain() {
        let mut value = json!("leaf");
        for _ in 0..200 {
            value = json!({ "next": value });
        }

        let mut nav = ResultNavigator::from_response(value);
        for _ in 0..200 {
            nav = nav.get("next");
        }

        assert_eq!(nav.as_string().unwrap(), "leaf");
        assert!(nav.path().ends_with("next.next"));
        assert!(!nav.get("next").exists());
        assert_eq!(nav.get("next").kind(), "absent");
    }

    #[test]
    fn test_keys_keep_response_order() {
        let nav = ResultNavigator::from_response(json!({"a": 1, "b": 2}));
        assert_eq!(nav.keys(), vec!["a".to_string(), "b".to_string()]);
        assert_eq!(nav.as_map().unwrap().get("b"), Some(&json!(2)));
        assert_eq!(nav.to_value(), Some(json!({"a": 1, "b": 2})));
    }
}
