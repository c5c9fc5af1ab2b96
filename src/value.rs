//! Property descriptors and their resolution against a data model.
//!
//! A descriptor is either a literal (`{"literalString": "hi"}`), a binding
//! into the data model (`{"path": "user/name"}`), or a raw value that is
//! already in its final form. Detection is by key, in a fixed order:
//!
//! 1. `literalString`
//! 2. `literalNumber`
//! 3. `literalArray`
//! 4. `literalObject`
//! 5. `path` (string-valued only)
//! 6. `literalBoolean`
//!
//! Anything else is [`PropertyValue::Raw`]. A literal key whose payload has
//! the wrong type still wins; its payload is kept as [`PropertyValue::Raw`]
//! and coerced when resolved, so `{"literalNumber": "10"}` resolves to 10.

use crate::data_model::{DataModel, DataNode};
use crate::path;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

#[derive(Clone, Debug, PartialEq)]
pub enum PropertyValue {
    LiteralString(String),
    LiteralNumber(f64),
    LiteralBoolean(bool),
    /// Elements are kept as sent; they are never resolved themselves.
    LiteralArray(Vec<Value>),
    LiteralObject(Value),
    Path(String),
    Raw(Value),
}

impl PropertyValue {
    pub fn literal(s: impl Into<String>) -> Self {
        PropertyValue::LiteralString(s.into())
    }

    pub fn path(p: impl Into<String>) -> Self {
        PropertyValue::Path(p.into())
    }

    /// Classifies a JSON value into a descriptor. Never fails.
    pub fn from_json(value: Value) -> Self {
        match value.as_object().and_then(classify_object) {
            Some(descriptor) => descriptor,
            None => PropertyValue::Raw(value),
        }
    }
}

fn classify_object(map: &Map<String, Value>) -> Option<PropertyValue> {
    if let Some(v) = map.get("literalString") {
        return Some(match v {
            Value::String(s) => PropertyValue::LiteralString(s.clone()),
            other => PropertyValue::Raw(other.clone()),
        });
    }
    if let Some(v) = map.get("literalNumber") {
        return Some(match v.as_f64() {
            Some(n) => PropertyValue::LiteralNumber(n),
            None => PropertyValue::Raw(v.clone()),
        });
    }
    if let Some(v) = map.get("literalArray") {
        return Some(match v {
            Value::Array(items) => PropertyValue::LiteralArray(items.clone()),
            other => PropertyValue::Raw(other.clone()),
        });
    }
    if let Some(v) = map.get("literalObject") {
        return Some(PropertyValue::LiteralObject(v.clone()));
    }
    if let Some(Value::String(p)) = map.get("path") {
        return Some(PropertyValue::Path(p.clone()));
    }
    map.get("literalBoolean").map(|v| match v {
        Value::Bool(b) => PropertyValue::LiteralBoolean(*b),
        other => PropertyValue::Raw(other.clone()),
    })
}

impl Serialize for PropertyValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let (key, value) = match self {
            PropertyValue::Raw(v) => return v.serialize(serializer),
            PropertyValue::LiteralString(s) => ("literalString", Value::String(s.clone())),
            PropertyValue::LiteralNumber(n) => ("literalNumber", Value::from(*n)),
            PropertyValue::LiteralBoolean(b) => ("literalBoolean", Value::Bool(*b)),
            PropertyValue::LiteralArray(items) => ("literalArray", Value::Array(items.clone())),
            PropertyValue::LiteralObject(v) => ("literalObject", v.clone()),
            PropertyValue::Path(p) => ("path", Value::String(p.clone())),
        };
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(key, &value)?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for PropertyValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(PropertyValue::from_json(Value::deserialize(deserializer)?))
    }
}

/// Resolves a descriptor to a concrete value.
///
/// Absent descriptors and raw `null` resolve to `None`. Literals unwrap to
/// their payload; path bindings are normalized against `context_path` and
/// read from `model`. Pure: the model is never modified.
pub fn resolve(
    descriptor: Option<&PropertyValue>,
    model: &DataModel,
    context_path: &str,
) -> Option<DataNode> {
    match descriptor? {
        PropertyValue::LiteralString(s) => Some(DataNode::from(s.as_str())),
        PropertyValue::LiteralNumber(n) => Some(DataNode::from(*n)),
        PropertyValue::LiteralBoolean(b) => Some(DataNode::from(*b)),
        PropertyValue::LiteralArray(items) => Some(DataNode::Sequence(
            items.iter().map(DataNode::from_json).collect(),
        )),
        PropertyValue::LiteralObject(v) | PropertyValue::Raw(v) => DataNode::from_json(v),
        PropertyValue::Path(p) => model.get(&path::normalize(p, context_path)).cloned(),
    }
}

/// Resolves a descriptor and coerces it to text.
pub fn resolve_text(
    descriptor: Option<&PropertyValue>,
    model: &DataModel,
    context_path: &str,
) -> Option<String> {
    resolve(descriptor, model, context_path).map(|node| node.to_text())
}

/// Resolves a descriptor and coerces it to a number.
pub fn resolve_number(
    descriptor: Option<&PropertyValue>,
    model: &DataModel,
    context_path: &str,
) -> Option<f64> {
    resolve(descriptor, model, context_path).and_then(|node| node.to_number())
}
