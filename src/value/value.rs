//! Core value types and operations.

use crate::error::{Error, Result};
use crate::fieldpath::{Path, PathElement};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Value represents a JSON/YAML value that can be any of the supported types.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<Value>),
    Map(Map),
}

/// Map represents a key-value map where keys are strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Map {
    pub fields: BTreeMap<String, Value>,
}

impl Value {
    pub fn is_map(&self) -> bool {
        matches!(self, Value::Map(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&Vec<Value>> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Returns the field `key` if this value is a map containing it.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map().and_then(|m| m.get(key))
    }

    /// Walks `path` from this value.
    ///
    /// Returns `None` as soon as an element is missing or the value at that
    /// level has the wrong shape for the element (field name on a list,
    /// index on a map, anything on a scalar).
    pub fn lookup(&self, path: &Path) -> Option<&Value> {
        let mut current = self;
        for element in path {
            current = match (element, current) {
                (PathElement::FieldName(name), Value::Map(m)) => m.get(name)?,
                (PathElement::Index(i), Value::List(l)) => l.get(*i)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Returns true if `path` resolves to a value, including an explicit null.
    pub fn has(&self, path: &Path) -> bool {
        self.lookup(path).is_some()
    }

    /// Normalizes a node port to a plain integer.
    ///
    /// Integers pass through, floats are truncated toward zero and numeric
    /// strings are parsed. Values of any other shape count as unset (0).
    /// A string that is not a decimal integer is an error.
    pub fn as_node_port(&self) -> Result<i64> {
        match self {
            Value::Int(i) => Ok(*i),
            Value::Float(f) => Ok(f.trunc() as i64),
            Value::String(s) => s.trim().parse::<i64>().map_err(|e| {
                Error::invalid_input(format!("node port {:?} is not an integer: {}", s, e))
            }),
            Value::Null | Value::Bool(_) | Value::List(_) | Value::Map(_) => Ok(0),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl Map {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn delete(&mut self, key: &str) -> Option<Value> {
        self.fields.remove(key)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }
}

/// Parse a value from JSON.
pub fn from_json(json: &str) -> Result<Value, serde_json::Error> {
    serde_json::from_str(json)
}

/// Parse a value from JSON bytes.
pub fn from_json_slice(json: &[u8]) -> Result<Value, serde_json::Error> {
    serde_json::from_slice(json)
}

/// Serialize a value to JSON.
pub fn to_json(value: &Value) -> Result<String, serde_json::Error> {
    serde_json::to_string(value)
}

/// Parse a value from YAML.
pub fn from_yaml(yaml: &str) -> Result<Value, serde_yaml::Error> {
    serde_yaml::from_str(yaml)
}

/// Serialize a value to YAML.
pub fn to_yaml(value: &Value) -> Result<String, serde_yaml::Error> {
    serde_yaml::to_string(value)
}
