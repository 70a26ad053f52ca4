//! Generic document tree.
//!
//! Both TOML and YAML deserialize into [`Node`] through a single serde
//! visitor, so every later stage sees one shape regardless of the surface
//! syntax. Map keys keep their authoring order.

use std::collections::HashSet;
use std::fmt;

use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};

/// Private key the `toml` crate uses to smuggle datetimes through serde.
const TOML_DATETIME_KEY: &str = "$__toml_private_datetime";

/// A parsed document value.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Sequence(Vec<Node>),
    Map(Vec<(String, Node)>),
}

impl Node {
    /// Name of the value's type as shown in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Node::Null => "null",
            Node::Bool(_) => "boolean",
            Node::Integer(_) => "integer",
            Node::Float(_) => "number",
            Node::String(_) => "text",
            Node::Sequence(_) => "sequence",
            Node::Map(_) => "mapping",
        }
    }

    /// Look up a key in a mapping node.
    pub fn get(&self, key: &str) -> Option<&Node> {
        match self {
            Node::Map(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Node::Null)
    }

    /// Short rendering of the value for the "actual" half of an error.
    pub fn describe(&self) -> String {
        match self {
            Node::Null => "null".to_string(),
            Node::Bool(b) => format!("boolean {}", b),
            Node::Integer(i) => format!("integer {}", i),
            Node::Float(x) => format!("number {}", x),
            Node::String(s) => format!("text {:?}", s),
            Node::Sequence(items) => format!("a sequence of {} item(s)", items.len()),
            Node::Map(entries) => format!("a mapping with {} key(s)", entries.len()),
        }
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(NodeVisitor)
    }
}

struct NodeVisitor;

impl<'de> Visitor<'de> for NodeVisitor {
    type Value = Node;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a mapping, sequence or scalar")
    }

    fn visit_bool<E>(self, v: bool) -> Result<Node, E> {
        Ok(Node::Bool(v))
    }

    fn visit_i64<E>(self, v: i64) -> Result<Node, E> {
        Ok(Node::Integer(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Node, E> {
        i64::try_from(v)
            .map(Node::Integer)
            .map_err(|_| E::custom(format!("integer {} is out of range", v)))
    }

    fn visit_f64<E>(self, v: f64) -> Result<Node, E> {
        Ok(Node::Float(v))
    }

    fn visit_str<E>(self, v: &str) -> Result<Node, E> {
        Ok(Node::String(v.to_string()))
    }

    fn visit_string<E>(self, v: String) -> Result<Node, E> {
        Ok(Node::String(v))
    }

    fn visit_unit<E>(self) -> Result<Node, E> {
        Ok(Node::Null)
    }

    fn visit_none<E>(self) -> Result<Node, E> {
        Ok(Node::Null)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Node, D::Error>
    where
        D: Deserializer<'de>,
    {
        Node::deserialize(deserializer)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Node, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element::<Node>()? {
            items.push(item);
        }
        Ok(Node::Sequence(items))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Node, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut entries: Vec<(String, Node)> = Vec::new();
        let mut seen = HashSet::new();

        while let Some(MapKey(key)) = map.next_key::<MapKey>()? {
            if key == TOML_DATETIME_KEY && entries.is_empty() {
                let stamp: String = map.next_value()?;
                return Ok(Node::String(stamp));
            }
            if !seen.insert(key.clone()) {
                return Err(de::Error::custom(format!("duplicate key `{}`", key)));
            }
            let value = map.next_value::<Node>()?;
            entries.push((key, value));
        }

        Ok(Node::Map(entries))
    }
}

/// Mapping key. YAML allows scalar keys of any type; they are keyed by their
/// text form.
struct MapKey(String);

impl<'de> Deserialize<'de> for MapKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(MapKeyVisitor)
    }
}

struct MapKeyVisitor;

impl<'de> Visitor<'de> for MapKeyVisitor {
    type Value = MapKey;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a scalar mapping key")
    }

    fn visit_bool<E>(self, v: bool) -> Result<MapKey, E> {
        Ok(MapKey(v.to_string()))
    }

    fn visit_i64<E>(self, v: i64) -> Result<MapKey, E> {
        Ok(MapKey(v.to_string()))
    }

    fn visit_u64<E>(self, v: u64) -> Result<MapKey, E> {
        Ok(MapKey(v.to_string()))
    }

    fn visit_f64<E>(self, v: f64) -> Result<MapKey, E> {
        Ok(MapKey(v.to_string()))
    }

    fn visit_str<E>(self, v: &str) -> Result<MapKey, E> {
        Ok(MapKey(v.to_string()))
    }

    fn visit_string<E>(self, v: String) -> Result<MapKey, E> {
        Ok(MapKey(v))
    }
}
