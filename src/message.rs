//! Server-to-client protocol messages and their decoding.
//!
//! A message is an object that may carry any of five independent update
//! fields. All present fields are applied, in the order begin-rendering,
//! surface-update, data-model-update, end-rendering, delete-surface.
//!
//! ```text
//! {"beginRendering":  {"surfaceId": "s1", "root": "c1", "styles": {...}}}
//! {"surfaceUpdate":   {"surfaceId": "s1", "components": [...]}}
//! {"dataModelUpdate": {"surfaceId": "s1", "path": "/", "contents": [...]}}
//! {"endRendering":    {"surfaceId": "s1"}}
//! {"deleteSurface":   {"surfaceId": "s1"}}
//! ```
//!
//! Decoding is lenient below the JSON syntax level. A field of the wrong
//! type reads as absent, so a `surfaceId` that is not a string leaves that
//! part without a surface and the processor drops it with a diagnostic.
//! Component entries and data entries are decoded one by one; an entry that
//! does not decode is dropped and reported, and its siblings are kept.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::{Diagnostic, ParseError};
use crate::types::ComponentEntry;

/// The message keys that identify an A2UI payload.
pub const MESSAGE_KEYS: &[&str] = &[
    "beginRendering",
    "surfaceUpdate",
    "dataModelUpdate",
    "endRendering",
    "deleteSurface",
];

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct A2uiMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub begin_rendering: Option<BeginRendering>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surface_update: Option<SurfaceUpdate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_model_update: Option<DataModelUpdate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_rendering: Option<SurfaceRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete_surface: Option<SurfaceRef>,
}

impl A2uiMessage {
    /// True when none of the five update fields is present.
    pub fn is_empty(&self) -> bool {
        self.begin_rendering.is_none()
            && self.surface_update.is_none()
            && self.data_model_update.is_none()
            && self.end_rendering.is_none()
            && self.delete_surface.is_none()
    }

    pub fn begin_rendering(surface_id: &str, root: &str) -> Self {
        Self {
            begin_rendering: Some(BeginRendering {
                surface_id: Some(surface_id.to_string()),
                root: Some(root.to_string()),
                styles: None,
            }),
            ..Self::default()
        }
    }

    pub fn surface_update(surface_id: &str, components: Vec<ComponentEntry>) -> Self {
        Self {
            surface_update: Some(SurfaceUpdate {
                surface_id: Some(surface_id.to_string()),
                components,
            }),
            ..Self::default()
        }
    }

    pub fn data_model_update(surface_id: &str, contents: Vec<DataEntry>) -> Self {
        Self {
            data_model_update: Some(DataModelUpdate {
                surface_id: Some(surface_id.to_string()),
                path: None,
                contents,
            }),
            ..Self::default()
        }
    }

    pub fn end_rendering(surface_id: &str) -> Self {
        Self {
            end_rendering: Some(SurfaceRef::new(surface_id)),
            ..Self::default()
        }
    }

    pub fn delete_surface(surface_id: &str) -> Self {
        Self {
            delete_surface: Some(SurfaceRef::new(surface_id)),
            ..Self::default()
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeginRendering {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surface_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styles: Option<Map<String, Value>>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurfaceUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surface_id: Option<String>,
    #[serde(default)]
    pub components: Vec<ComponentEntry>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataModelUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surface_id: Option<String>,
    /// Base path for the entry keys. Absent means the root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default)]
    pub contents: Vec<DataEntry>,
}

/// One `{key, value*}` entry of a data-model update. `key` may itself be a
/// multi-segment path.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataEntry {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_string: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_number: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_map: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_boolean: Option<bool>,
}

impl DataEntry {
    pub fn string(key: &str, value: &str) -> Self {
        Self {
            key: key.to_string(),
            value_string: Some(value.to_string()),
            ..Self::default()
        }
    }

    pub fn number(key: &str, value: f64) -> Self {
        Self {
            key: key.to_string(),
            value_number: Some(value),
            ..Self::default()
        }
    }

    pub fn map(key: &str, value: Vec<Value>) -> Self {
        Self {
            key: key.to_string(),
            value_map: Some(value),
            ..Self::default()
        }
    }

    /// Number of value fields present.
    pub fn value_count(&self) -> usize {
        usize::from(self.value_string.is_some())
            + usize::from(self.value_number.is_some())
            + usize::from(self.value_map.is_some())
            + usize::from(self.value_boolean.is_some())
    }
}

/// A message body that only names a surface.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurfaceRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surface_id: Option<String>,
}

impl SurfaceRef {
    pub fn new(surface_id: &str) -> Self {
        Self {
            surface_id: Some(surface_id.to_string()),
        }
    }
}

// ─── Decoding ───────────────────────────────────────────────────────────────

impl<'de> Deserialize<'de> for A2uiMessage {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(decode_message(&value).message)
    }
}

/// A message decoded from JSON, with a diagnostic for every entry that had
/// to be dropped to decode it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DecodedMessage {
    pub message: A2uiMessage,
    pub diagnostics: Vec<Diagnostic>,
}

/// Decodes one message from a JSON value. Never fails.
///
/// Anything other than an object decodes to an empty message. Entries of
/// `components` that do not decode are reported as `M-004`, entries of
/// `contents` as `D-004`.
pub fn decode_message(value: &Value) -> DecodedMessage {
    let mut diagnostics = Vec::new();
    let Some(obj) = value.as_object() else {
        return DecodedMessage::default();
    };

    let message = A2uiMessage {
        begin_rendering: obj.get("beginRendering").map(|part| BeginRendering {
            surface_id: string_field(part, "surfaceId"),
            root: string_field(part, "root"),
            styles: part.get("styles").and_then(Value::as_object).cloned(),
        }),
        surface_update: obj.get("surfaceUpdate").map(|part| {
            let surface_id = string_field(part, "surfaceId");
            SurfaceUpdate {
                components: decode_entries(
                    part,
                    "components",
                    "M-004",
                    surface_id.as_deref(),
                    &mut diagnostics,
                ),
                surface_id,
            }
        }),
        data_model_update: obj.get("dataModelUpdate").map(|part| {
            let surface_id = string_field(part, "surfaceId");
            DataModelUpdate {
                path: string_field(part, "path"),
                contents: decode_entries(
                    part,
                    "contents",
                    "D-004",
                    surface_id.as_deref(),
                    &mut diagnostics,
                ),
                surface_id,
            }
        }),
        end_rendering: obj.get("endRendering").map(surface_ref),
        delete_surface: obj.get("deleteSurface").map(surface_ref),
    };
    DecodedMessage {
        message,
        diagnostics,
    }
}

fn string_field(part: &Value, name: &str) -> Option<String> {
    part.get(name).and_then(Value::as_str).map(str::to_string)
}

fn surface_ref(part: &Value) -> SurfaceRef {
    SurfaceRef {
        surface_id: string_field(part, "surfaceId"),
    }
}

/// Decodes each element of the array `part[field]` on its own, dropping the
/// ones that fail.
fn decode_entries<T: DeserializeOwned>(
    part: &Value,
    field: &str,
    code: &str,
    surface_id: Option<&str>,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<T> {
    let report = |diagnostics: &mut Vec<Diagnostic>, message: String| {
        tracing::warn!(surface_id, field, %message, "dropping undecodable entry");
        let diagnostic = Diagnostic::error(code, message);
        diagnostics.push(match surface_id {
            Some(id) => diagnostic.on_surface(id),
            None => diagnostic,
        });
    };

    let items = match part.get(field) {
        None | Some(Value::Null) => return Vec::new(),
        Some(Value::Array(items)) => items,
        Some(other) => {
            report(diagnostics, format!("{} must be an array, got {}", field, other));
            return Vec::new();
        }
    };
    items
        .iter()
        .enumerate()
        .filter_map(|(i, item)| match T::deserialize(item) {
            Ok(entry) => Some(entry),
            Err(e) => {
                report(diagnostics, format!("{}[{}] dropped: {}", field, i, e));
                None
            }
        })
        .collect()
}

/// True when `value` is an object carrying at least one message key.
pub fn is_a2ui_message(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|obj| MESSAGE_KEYS.iter().any(|k| obj.contains_key(*k)))
}

/// Parses JSON text, rejecting blank input.
pub fn parse_json(input: &str) -> Result<Value, ParseError> {
    if input.trim().is_empty() {
        return Err(ParseError::Empty);
    }
    Ok(serde_json::from_str(input)?)
}

/// Decodes a single JSON message. Only text that is not JSON fails.
pub fn parse_message(input: &str) -> Result<A2uiMessage, ParseError> {
    Ok(decode_message(&parse_json(input)?).message)
}

/// Splits a message log into JSON items: the elements of a top-level JSON
/// array, or one item per non-blank line.
///
/// Errors in JSON Lines input carry the 1-based line number.
pub fn split_stream(input: &str) -> Result<Vec<Value>, ParseError> {
    let trimmed = input.trim_start();
    if trimmed.is_empty() {
        return Err(ParseError::Empty);
    }
    if trimmed.starts_with('[') {
        return Ok(serde_json::from_str(trimmed)?);
    }

    let mut items = Vec::new();
    for (i, line) in input.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let item = serde_json::from_str(line).map_err(|source| ParseError::Line {
            line: i + 1,
            source,
        })?;
        items.push(item);
    }
    Ok(items)
}

/// Decodes a message log: either a JSON array of messages or JSON Lines.
///
/// Blank lines are skipped. Items that are not messages decode to empty
/// messages rather than failing the log.
pub fn parse_stream(input: &str) -> Result<Vec<A2uiMessage>, ParseError> {
    Ok(split_stream(input)?
        .iter()
        .map(|item| decode_message(item).message)
        .collect())
}

/// The `data` payloads of A2A parts with `kind == "data"` that carry an
/// A2UI message.
pub fn data_parts(parts: &[Value]) -> impl Iterator<Item = &Value> {
    parts
        .iter()
        .filter(|part| part.get("kind").and_then(Value::as_str) == Some("data"))
        .filter_map(|part| part.get("data"))
        .filter(|data| is_a2ui_message(data))
}

/// Picks A2UI messages out of A2A message parts.
pub fn extract_messages(parts: &[Value]) -> Vec<A2uiMessage> {
    data_parts(parts)
        .map(|data| decode_message(data).message)
        .collect()
}
