//! Ordered tagged-union model for nested key/value data.
//!
//! `Node` is what every transform in this crate consumes and produces. JSON
//! is the exchange format at the edges (CLI, tests), so there are lossless
//! conversions to and from `serde_json::Value`; with `preserve_order` the
//! object key order survives the round trip.
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::dedupe::structurally_equal;

/// Insertion-ordered mapping; iteration order is the order keys were added.
pub type Mapping = IndexMap<String, Node>;

/// A mapping whose values are all scalars (one flat row).
pub type Record = Mapping;

/// Untagged on the wire: `null`, `true`, `1`, `1.5`, `"x"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

/// Equality is [`structurally_equal`]: key order matters, floats compare by
/// bit pattern. A bare `Mapping` still compares the `IndexMap` way, ignoring
/// order; wrap it in `Node::Mapping` when order counts.
#[derive(Debug, Clone)]
pub enum Node {
    Scalar(Scalar),
    Mapping(Mapping),
    Sequence(Vec<Node>),
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        structurally_equal(self, other)
    }
}

// ------------------------------- Scalar ----------------------------------- //

impl Scalar {
    /// Loose text coercion used when a scalar has to become character data
    /// (XML text, substring filters): `true` → `"1"`, `false`/null → `""`,
    /// whole floats lose their fractional part.
    pub fn to_text(&self) -> String {
        match self {
            Scalar::Null => String::new(),
            Scalar::Bool(true) => "1".to_string(),
            Scalar::Bool(false) => String::new(),
            Scalar::Int(i) => i.to_string(),
            Scalar::Float(f) => float_to_text(*f),
            Scalar::Str(s) => s.clone(),
        }
    }

    fn to_json(&self) -> Value {
        match self {
            Scalar::Null => Value::Null,
            Scalar::Bool(b) => Value::Bool(*b),
            Scalar::Int(i) => Value::Number((*i).into()),
            // json has no NaN/inf
            Scalar::Float(f) => Number::from_f64(*f).map(Value::Number).unwrap_or(Value::Null),
            Scalar::Str(s) => Value::String(s.clone()),
        }
    }
}

fn float_to_text(f: f64) -> String {
    if f.is_nan() {
        "NAN".to_string()
    } else if f.is_infinite() {
        if f > 0.0 { "INF".to_string() } else { "-INF".to_string() }
    } else {
        // f64's Display is already shortest round-trip and drops a `.0`
        format!("{f}")
    }
}

// -------------------------------- Node ------------------------------------ //

impl Node {
    pub fn null() -> Self {
        Node::Scalar(Scalar::Null)
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, Node::Scalar(_))
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Node::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Node::Mapping(m) => Some(m),
            _ => None,
        }
    }

    pub fn into_mapping(self) -> Option<Mapping> {
        match self {
            Node::Mapping(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Node]> {
        match self {
            Node::Sequence(xs) => Some(xs),
            _ => None,
        }
    }

    /// A flat row: a mapping with scalar values only.
    pub fn is_record(&self) -> bool {
        self.as_mapping()
            .map(|m| m.values().all(Node::is_scalar))
            .unwrap_or(false)
    }

    pub fn to_json(&self) -> Value {
        match self {
            Node::Scalar(s) => s.to_json(),
            Node::Mapping(m) => {
                let mut out = Map::with_capacity(m.len());
                for (k, v) in m {
                    out.insert(k.clone(), v.to_json());
                }
                Value::Object(out)
            }
            Node::Sequence(xs) => Value::Array(xs.iter().map(Node::to_json).collect()),
        }
    }
}

// ---------------------------- Conversions --------------------------------- //

impl From<Value> for Node {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Node::Scalar(Scalar::Null),
            Value::Bool(b) => Node::Scalar(Scalar::Bool(b)),
            Value::Number(n) => Node::Scalar(Scalar::from(&n)),
            Value::String(s) => Node::Scalar(Scalar::Str(s)),
            Value::Array(xs) => Node::Sequence(xs.into_iter().map(Node::from).collect()),
            Value::Object(obj) => Node::Mapping(
                obj.into_iter().map(|(k, v)| (k, Node::from(v))).collect(),
            ),
        }
    }
}

impl From<&Value> for Node {
    fn from(value: &Value) -> Self {
        Node::from(value.clone())
    }
}

impl From<&Number> for Scalar {
    fn from(n: &Number) -> Self {
        match n.as_i64() {
            Some(i) => Scalar::Int(i),
            // u64 above i64::MAX and real floats both land here
            None => Scalar::Float(n.as_f64().unwrap_or(f64::NAN)),
        }
    }
}

impl From<Scalar> for Node {
    fn from(s: Scalar) -> Self {
        Node::Scalar(s)
    }
}

impl From<Mapping> for Node {
    fn from(m: Mapping) -> Self {
        Node::Mapping(m)
    }
}

impl From<Vec<Node>> for Node {
    fn from(xs: Vec<Node>) -> Self {
        Node::Sequence(xs)
    }
}

impl From<i64> for Node {
    fn from(i: i64) -> Self {
        Node::Scalar(Scalar::Int(i))
    }
}

impl From<f64> for Node {
    fn from(f: f64) -> Self {
        Node::Scalar(Scalar::Float(f))
    }
}

impl From<bool> for Node {
    fn from(b: bool) -> Self {
        Node::Scalar(Scalar::Bool(b))
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Node::Scalar(Scalar::Str(s.to_string()))
    }
}

impl From<String> for Node {
    fn from(s: String) -> Self {
        Node::Scalar(Scalar::Str(s))
    }
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn node_equality_sees_key_order() {
        let ab = Node::from(json!({"a": 1, "b": {"c": 2, "d": 3}}));
        let ba = Node::from(json!({"b": {"c": 2, "d": 3}, "a": 1}));
        let inner_swapped = Node::from(json!({"a": 1, "b": {"d": 3, "c": 2}}));
        assert_eq!(ab, ab.clone());
        assert_ne!(ab, ba);
        assert_ne!(ab, inner_swapped);
        assert_ne!(Node::from(json!([1, 2])), Node::from(json!([2, 1])));
    }

    #[test]
    fn json_object_order_survives_conversion() {
        let v = json!({"z": 1, "a": 2, "m": {"y": 3, "b": 4}});
        let node = Node::from(&v);
        let map = node.as_mapping().unwrap();
        assert_eq!(map.keys().collect::<Vec<_>>(), ["z", "a", "m"]);
        let inner = map["m"].as_mapping().unwrap();
        assert_eq!(inner.keys().collect::<Vec<_>>(), ["y", "b"]);
        assert_eq!(serde_json::to_string(&node.to_json()).unwrap(), serde_json::to_string(&v).unwrap());
    }

    #[test]
    fn integers_and_floats_stay_distinct() {
        assert_eq!(Node::from(json!(1)), Node::Scalar(Scalar::Int(1)));
        assert_eq!(Node::from(json!(1.0)), Node::Scalar(Scalar::Float(1.0)));
        assert_eq!(Node::from(json!(u64::MAX)), Node::Scalar(Scalar::Float(u64::MAX as f64)));
    }

    #[test]
    fn scalar_text_coercion() {
        assert_eq!(Scalar::Int(-3).to_text(), "-3");
        assert_eq!(Scalar::Float(2.0).to_text(), "2");
        assert_eq!(Scalar::Float(2.5).to_text(), "2.5");
        assert_eq!(Scalar::Bool(true).to_text(), "1");
        assert_eq!(Scalar::Bool(false).to_text(), "");
        assert_eq!(Scalar::Null.to_text(), "");
        assert_eq!(Scalar::Float(f64::NEG_INFINITY).to_text(), "-INF");
    }

    #[test]
    fn scalar_wire_form_is_untagged() {
        let row: Vec<Scalar> = serde_json::from_str(r#"[null, true, 3, 3.5, "x"]"#).unwrap();
        assert_eq!(
            row,
            vec![Scalar::Null, Scalar::Bool(true), Scalar::Int(3), Scalar::Float(3.5), Scalar::Str("x".into())]
        );
        assert_eq!(serde_json::to_string(&row).unwrap(), r#"[null,true,3,3.5,"x"]"#);
    }

    #[test]
    fn record_detection() {
        assert!(Node::from(json!({"a": 1, "b": "x"})).is_record());
        assert!(!Node::from(json!({"a": {"b": 1}})).is_record());
        assert!(!Node::from(json!([1, 2])).is_record());
    }
}
