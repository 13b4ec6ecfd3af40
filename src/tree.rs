//! Hierarchical document model
//!
//! [`Node`] mirrors JSON with one extra scalar, [`Scalar::Placeholder`], which
//! the transcoder injects to force structure and strips before returning.

use indexmap::IndexMap;
use serde_json::{Map, Number, Value};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    /// Reserved sentinel, never part of a returned document
    Placeholder,
}

impl Scalar {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Scalar::Placeholder)
    }

    /// Text form used when matching join keys
    pub fn as_key(&self) -> Option<String> {
        match self {
            Scalar::Text(s) => Some(s.clone()),
            Scalar::Number(n) => Some(format_number(*n)),
            Scalar::Bool(b) => Some(b.to_string()),
            Scalar::Null | Scalar::Placeholder => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => write!(f, "null"),
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Number(n) => write!(f, "{}", format_number(*n)),
            Scalar::Text(s) => write!(f, "{}", s),
            Scalar::Placeholder => write!(f, "<placeholder>"),
        }
    }
}

/// Integral values print without a fractional part
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// A document node. Object keys keep insertion order; equality ignores it.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Scalar(Scalar),
    Object(IndexMap<String, Node>),
    Array(Vec<Node>),
}

impl Node {
    pub fn object() -> Self {
        Node::Object(IndexMap::new())
    }

    pub fn text(value: impl Into<String>) -> Self {
        Node::Scalar(Scalar::Text(value.into()))
    }

    pub fn number(value: f64) -> Self {
        Node::Scalar(Scalar::Number(value))
    }

    pub fn placeholder() -> Self {
        Node::Scalar(Scalar::Placeholder)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Node::Scalar(_) => "scalar",
            Node::Object(_) => "object",
            Node::Array(_) => "array",
        }
    }

    pub fn as_object(&self) -> Option<&IndexMap<String, Node>> {
        match self {
            Node::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut IndexMap<String, Node>> {
        match self {
            Node::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<Node>> {
        match self {
            Node::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Node::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }

    /// Look up a field on an object node
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.as_object().and_then(|map| map.get(key))
    }

    /// True if a placeholder occurs anywhere below this node
    pub fn contains_placeholder(&self) -> bool {
        match self {
            Node::Scalar(scalar) => scalar.is_placeholder(),
            Node::Object(map) => map.values().any(Node::contains_placeholder),
            Node::Array(items) => items.iter().any(Node::contains_placeholder),
        }
    }
}

impl From<&Value> for Node {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => Node::Scalar(Scalar::Null),
            Value::Bool(b) => Node::Scalar(Scalar::Bool(*b)),
            Value::Number(n) => Node::Scalar(Scalar::Number(n.as_f64().unwrap_or_default())),
            Value::String(s) => Node::Scalar(Scalar::Text(s.clone())),
            Value::Array(items) => Node::Array(items.iter().map(Node::from).collect()),
            Value::Object(map) => Node::Object(
                map.iter()
                    .map(|(key, value)| (key.clone(), Node::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<Value> for Node {
    fn from(value: Value) -> Self {
        Node::from(&value)
    }
}

impl From<&Node> for Value {
    fn from(node: &Node) -> Self {
        match node {
            Node::Scalar(Scalar::Null) | Node::Scalar(Scalar::Placeholder) => Value::Null,
            Node::Scalar(Scalar::Bool(b)) => Value::Bool(*b),
            Node::Scalar(Scalar::Number(n)) => number_to_json(*n),
            Node::Scalar(Scalar::Text(s)) => Value::String(s.clone()),
            Node::Array(items) => Value::Array(items.iter().map(Value::from).collect()),
            Node::Object(map) => Value::Object(
                map.iter()
                    .map(|(key, value)| (key.clone(), Value::from(value)))
                    .collect::<Map<String, Value>>(),
            ),
        }
    }
}

impl From<Node> for Value {
    fn from(node: Node) -> Self {
        Value::from(&node)
    }
}

/// Integral values become JSON integers so `1` survives a spreadsheet trip
fn number_to_json(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < 9.007_199_254_740_992e15 {
        Value::Number(Number::from(n as i64))
    } else {
        Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_conversion_keeps_order_and_integers() {
        let value = json!({"id": "A", "qty": 2, "price": 1.5, "ok": true, "tags": ["x"]});
        let node = Node::from(&value);
        let keys: Vec<&String> = node.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["id", "qty", "price", "ok", "tags"]);
        assert_eq!(Value::from(&node), value);
    }

    #[test]
    fn test_equality_ignores_key_order() {
        let a = Node::from(json!({"a": 1, "b": {"c": 2}}));
        let b = Node::from(json!({"b": {"c": 2}, "a": 1}));
        assert_eq!(a, b);
    }

    #[test]
    fn test_equality_respects_array_order() {
        let a = Node::from(json!({"xs": [1, 2]}));
        let b = Node::from(json!({"xs": [2, 1]}));
        assert_ne!(a, b);
    }

    #[test]
    fn test_scalar_key() {
        assert_eq!(Scalar::Number(7.0).as_key(), Some("7".to_string()));
        assert_eq!(Scalar::Text("A".into()).as_key(), Some("A".to_string()));
        assert_eq!(Scalar::Placeholder.as_key(), None);
    }

    #[test]
    fn test_contains_placeholder() {
        let mut node = Node::from(json!({"a": {"b": [1]}}));
        assert!(!node.contains_placeholder());
        node.as_object_mut()
            .unwrap()
            .insert("c".into(), Node::placeholder());
        assert!(node.contains_placeholder());
    }
}
