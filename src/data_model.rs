//! Per-surface hierarchical data store.
//!
//! A data model is a keyed mapping at the root whose values are
//! [`DataNode`]s: scalars, sequences or nested mappings. Reads never fail;
//! a miss at any step is "not found". Writes auto-create missing
//! intermediate containers, choosing a sequence when the following segment
//! is an index and a mapping otherwise.

use crate::enums::ConflictPolicy;
use crate::error::DataModelError;
use crate::path;
use indexmap::IndexMap;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// Mapping node storage. Keeps insertion order for export.
pub type DataMap = IndexMap<String, DataNode>;

/// A leaf value.
#[derive(Clone, Debug, PartialEq)]
pub enum Scalar {
    String(String),
    Number(f64),
    Bool(bool),
}

/// One node of a data model.
///
/// Sequence slots are `Option`al: writing past the end of a sequence leaves
/// `None` holes, which read back as not found.
#[derive(Clone, Debug, PartialEq)]
pub enum DataNode {
    Scalar(Scalar),
    Sequence(Vec<Option<DataNode>>),
    Mapping(DataMap),
}

impl DataNode {
    /// An empty container of the kind a write needs before `next_segment`.
    pub fn container_for(next_segment: &str) -> Self {
        if path::is_index_segment(next_segment) {
            DataNode::Sequence(Vec::new())
        } else {
            DataNode::Mapping(DataMap::new())
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            DataNode::Scalar(_) => "scalar",
            DataNode::Sequence(_) => "sequence",
            DataNode::Mapping(_) => "mapping",
        }
    }

    /// Steps one segment down. Mappings look the segment up as a key;
    /// sequences accept index segments only; scalars have no children.
    pub fn child(&self, segment: &str) -> Option<&DataNode> {
        match self {
            DataNode::Mapping(map) => map.get(segment),
            DataNode::Sequence(items) => {
                let index = path::parse_index(segment)?;
                items.get(index)?.as_ref()
            }
            DataNode::Scalar(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            DataNode::Scalar(Scalar::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Option<DataNode>]> {
        match self {
            DataNode::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&DataMap> {
        match self {
            DataNode::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Numeric coercion for presentation: numbers pass through, numeric
    /// strings are parsed, booleans become 0/1. Containers and
    /// non-numeric strings (`"NaN"` included) have no number.
    pub fn to_number(&self) -> Option<f64> {
        match self {
            DataNode::Scalar(Scalar::Number(n)) => Some(*n),
            DataNode::Scalar(Scalar::String(s)) => {
                s.trim().parse::<f64>().ok().filter(|n| !n.is_nan())
            }
            DataNode::Scalar(Scalar::Bool(b)) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    /// Text coercion for presentation. Containers are rendered as compact
    /// JSON.
    pub fn to_text(&self) -> String {
        match self {
            DataNode::Scalar(Scalar::String(s)) => s.clone(),
            DataNode::Scalar(Scalar::Number(n)) => format_number(*n),
            DataNode::Scalar(Scalar::Bool(b)) => b.to_string(),
            other => other.to_json().to_string(),
        }
    }

    /// False for empty strings, zero, NaN and `false`; containers are truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            DataNode::Scalar(Scalar::String(s)) => !s.is_empty(),
            DataNode::Scalar(Scalar::Number(n)) => *n != 0.0 && !n.is_nan(),
            DataNode::Scalar(Scalar::Bool(b)) => *b,
            _ => true,
        }
    }

    /// Converts a JSON value. `null` has no data-model representation and
    /// converts to `None`; `null` array elements become holes and `null`
    /// object members are dropped.
    pub fn from_json(value: &Value) -> Option<DataNode> {
        match value {
            Value::Null => None,
            Value::Bool(b) => Some(DataNode::Scalar(Scalar::Bool(*b))),
            Value::Number(n) => n.as_f64().map(|f| DataNode::Scalar(Scalar::Number(f))),
            Value::String(s) => Some(DataNode::Scalar(Scalar::String(s.clone()))),
            Value::Array(items) => Some(DataNode::Sequence(
                items.iter().map(DataNode::from_json).collect(),
            )),
            Value::Object(map) => Some(DataNode::Mapping(
                map.iter()
                    .filter_map(|(k, v)| DataNode::from_json(v).map(|node| (k.clone(), node)))
                    .collect(),
            )),
        }
    }

    /// Converts to JSON. Holes become `null`; integral numbers are emitted as
    /// integers.
    pub fn to_json(&self) -> Value {
        match self {
            DataNode::Scalar(Scalar::String(s)) => Value::String(s.clone()),
            DataNode::Scalar(Scalar::Number(n)) => number_to_json(*n),
            DataNode::Scalar(Scalar::Bool(b)) => Value::Bool(*b),
            DataNode::Sequence(items) => Value::Array(
                items
                    .iter()
                    .map(|slot| slot.as_ref().map_or(Value::Null, DataNode::to_json))
                    .collect(),
            ),
            DataNode::Mapping(map) => Value::Object(map_to_json(map)),
        }
    }
}

impl From<&str> for DataNode {
    fn from(s: &str) -> Self {
        DataNode::Scalar(Scalar::String(s.to_string()))
    }
}

impl From<String> for DataNode {
    fn from(s: String) -> Self {
        DataNode::Scalar(Scalar::String(s))
    }
}

impl From<f64> for DataNode {
    fn from(n: f64) -> Self {
        DataNode::Scalar(Scalar::Number(n))
    }
}

impl From<bool> for DataNode {
    fn from(b: bool) -> Self {
        DataNode::Scalar(Scalar::Bool(b))
    }
}

impl Serialize for DataNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DataNode::Scalar(Scalar::String(s)) => serializer.serialize_str(s),
            DataNode::Scalar(Scalar::Number(n)) => number_to_json(*n).serialize(serializer),
            DataNode::Scalar(Scalar::Bool(b)) => serializer.serialize_bool(*b),
            DataNode::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            DataNode::Mapping(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map {
                    out.serialize_entry(k, v)?;
                }
                out.end()
            }
        }
    }
}

fn number_to_json(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n).map_or(Value::Null, Value::Number)
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        (n as i64).to_string()
    } else {
        n.to_string()
    }
}

fn map_to_json(map: &DataMap) -> serde_json::Map<String, Value> {
    map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect()
}

/// Limits applied to data-model writes.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WritePolicy {
    pub on_conflict: ConflictPolicy,
    /// Largest sequence index a write may create or address.
    pub max_index: usize,
}

impl Default for WritePolicy {
    fn default() -> Self {
        Self {
            on_conflict: ConflictPolicy::Reject,
            max_index: 65_535,
        }
    }
}

impl WritePolicy {
    fn index(&self, segment: &str, at: &str) -> Result<usize, DataModelError> {
        if !path::is_index_segment(segment) {
            return Err(DataModelError::NotAnIndex {
                path: at.to_string(),
                segment: segment.to_string(),
            });
        }
        match segment.parse::<usize>() {
            Ok(index) if index <= self.max_index => Ok(index),
            Ok(index) => Err(DataModelError::IndexTooLarge {
                path: at.to_string(),
                index,
                limit: self.max_index,
            }),
            Err(_) => Err(DataModelError::IndexTooLarge {
                path: at.to_string(),
                index: usize::MAX,
                limit: self.max_index,
            }),
        }
    }
}

/// A surface's data model.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DataModel {
    root: DataMap,
}

impl DataModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&self) -> &DataMap {
        &self.root
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Reads the node at `path`. Returns `None` when any step misses,
    /// including when the path has no segments.
    pub fn get(&self, path: &str) -> Option<&DataNode> {
        self.get_segments(&path::parse_segments(path))
    }

    pub fn get_segments(&self, segments: &[String]) -> Option<&DataNode> {
        let (first, rest) = segments.split_first()?;
        let mut current = self.root.get(first.as_str())?;
        for segment in rest {
            current = current.child(segment)?;
        }
        Some(current)
    }

    /// Writes `value` at `path` with the default [`WritePolicy`].
    pub fn set(&mut self, path: &str, value: DataNode) -> Result<(), DataModelError> {
        self.set_with(path, value, &WritePolicy::default())
    }

    /// Writes `value` at `path`, creating intermediate containers as needed.
    ///
    /// On error the model is unchanged: conflicts can only be met while
    /// walking nodes that already existed, and indices that would land in
    /// newly created sequences are checked before the walk.
    pub fn set_with(
        &mut self,
        path: &str,
        value: DataNode,
        policy: &WritePolicy,
    ) -> Result<(), DataModelError> {
        let segments = path::parse_segments(path);
        let Some((last, parents)) = segments.split_last() else {
            return Err(DataModelError::EmptyPath);
        };
        self.check_fresh_indices(&segments, policy)?;

        let mut cursor = Cursor::Mapping(&mut self.root);
        for (i, segment) in parents.iter().enumerate() {
            let at = path::to_path(&segments[..=i]);
            cursor = cursor.descend(segment, &segments[i + 1], policy, &at)?;
        }
        cursor.assign(last, value, policy, &path::to_path(&segments))
    }

    /// Validates the index segments that fall below the deepest existing
    /// node, i.e. those the write would place into containers it creates.
    fn check_fresh_indices(
        &self,
        segments: &[String],
        policy: &WritePolicy,
    ) -> Result<(), DataModelError> {
        let mut parent: Option<&DataNode> = None;
        for (depth, segment) in segments.iter().enumerate() {
            let child = match parent {
                None => self.root.get(segment.as_str()),
                Some(node) => node.child(segment),
            };
            if let Some(node) = child {
                parent = Some(node);
                continue;
            }
            let parent_is_mapping = parent.is_none_or(|node| node.as_mapping().is_some());
            for (i, fresh) in segments.iter().enumerate().skip(depth) {
                if i == depth && parent_is_mapping {
                    continue;
                }
                if path::is_index_segment(fresh) {
                    policy.index(fresh, &path::to_path(&segments[..=i]))?;
                }
            }
            break;
        }
        Ok(())
    }

    /// The whole model as a JSON object.
    pub fn to_json(&self) -> Value {
        Value::Object(map_to_json(&self.root))
    }

    /// Builds a model from a JSON object. Non-object input yields an empty
    /// model.
    pub fn from_json(value: &Value) -> Self {
        match DataNode::from_json(value) {
            Some(DataNode::Mapping(root)) => Self { root },
            _ => Self::default(),
        }
    }
}

impl Serialize for DataModel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut out = serializer.serialize_map(Some(self.root.len()))?;
        for (k, v) in &self.root {
            out.serialize_entry(k, v)?;
        }
        out.end()
    }
}

/// Mutable position inside the model during a write.
enum Cursor<'a> {
    Mapping(&'a mut DataMap),
    Sequence(&'a mut Vec<Option<DataNode>>),
}

impl<'a> Cursor<'a> {
    fn descend(
        self,
        segment: &str,
        next_segment: &str,
        policy: &WritePolicy,
        at: &str,
    ) -> Result<Cursor<'a>, DataModelError> {
        let slot: &'a mut DataNode = match self {
            Cursor::Mapping(map) => map
                .entry(segment.to_string())
                .or_insert_with(|| DataNode::container_for(next_segment)),
            Cursor::Sequence(items) => {
                let index = policy.index(segment, at)?;
                if items.len() <= index {
                    items.resize(index + 1, None);
                }
                items[index].get_or_insert_with(|| DataNode::container_for(next_segment))
            }
        };

        if policy.on_conflict == ConflictPolicy::Replace && matches!(*slot, DataNode::Scalar(_)) {
            *slot = DataNode::container_for(next_segment);
        }

        match slot {
            DataNode::Mapping(map) => Ok(Cursor::Mapping(map)),
            DataNode::Sequence(items) => Ok(Cursor::Sequence(items)),
            DataNode::Scalar(_) => Err(DataModelError::TypeMismatch {
                path: at.to_string(),
                expected: DataNode::container_for(next_segment).kind_name(),
                found: "scalar",
            }),
        }
    }

    fn assign(
        self,
        segment: &str,
        value: DataNode,
        policy: &WritePolicy,
        at: &str,
    ) -> Result<(), DataModelError> {
        match self {
            Cursor::Mapping(map) => {
                map.insert(segment.to_string(), value);
            }
            Cursor::Sequence(items) => {
                let index = policy.index(segment, at)?;
                if items.len() <= index {
                    items.resize(index + 1, None);
                }
                items[index] = Some(value);
            }
        }
        Ok(())
    }
}
