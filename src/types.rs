use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::value::PropertyValue;

// ─── ComponentEntry ─────────────────────────────────────────────────────────

/// One node definition in a surface's component registry.
///
/// Entries are never merged: a later update for the same id replaces the
/// whole entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComponentEntry {
    pub id: String,
    pub component: Component,
    /// Layout hint, opaque to the processor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<Value>,
}

// ─── Component ──────────────────────────────────────────────────────────────

/// A component definition, encoded on the wire as a single-key object whose
/// key is the type tag: `{"Text": {"text": {"literalString": "hi"}}}`.
///
/// Tags outside the catalog are kept as [`Component::Unknown`] so they can be
/// rendered as a placeholder.
#[derive(Clone, Debug, PartialEq)]
pub enum Component {
    Text(TextProps),
    Image(ImageProps),
    Divider,
    Column(StackProps),
    Row(StackProps),
    Canvas(StackProps),
    Card(CardProps),
    List(ListProps),
    Chart(ChartProps),
    GoogleMap(MapProps),
    Unknown { type_name: String, properties: Value },
}

impl Component {
    pub fn type_name(&self) -> &str {
        match self {
            Component::Text(_) => "Text",
            Component::Image(_) => "Image",
            Component::Divider => "Divider",
            Component::Column(_) => "Column",
            Component::Row(_) => "Row",
            Component::Canvas(_) => "Canvas",
            Component::Card(_) => "Card",
            Component::List(_) => "List",
            Component::Chart(_) => "Chart",
            Component::GoogleMap(_) => "GoogleMap",
            Component::Unknown { type_name, .. } => type_name,
        }
    }

    /// Builds a component from its type tag and property bag.
    ///
    /// A `null` bag is read as an empty one.
    pub fn from_parts(type_name: &str, properties: Value) -> Result<Self, serde_json::Error> {
        let properties = match properties {
            Value::Null => Value::Object(Map::new()),
            other => other,
        };
        Ok(match type_name {
            "Text" => Component::Text(serde_json::from_value(properties)?),
            "Image" => Component::Image(serde_json::from_value(properties)?),
            "Divider" => Component::Divider,
            "Column" => Component::Column(serde_json::from_value(properties)?),
            "Row" => Component::Row(serde_json::from_value(properties)?),
            "Canvas" => Component::Canvas(serde_json::from_value(properties)?),
            "Card" => Component::Card(serde_json::from_value(properties)?),
            "List" => Component::List(serde_json::from_value(properties)?),
            "Chart" => Component::Chart(serde_json::from_value(properties)?),
            "GoogleMap" => Component::GoogleMap(serde_json::from_value(properties)?),
            other => Component::Unknown {
                type_name: other.to_string(),
                properties,
            },
        })
    }
}

impl Serialize for Component {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            Component::Text(p) => map.serialize_entry("Text", p)?,
            Component::Image(p) => map.serialize_entry("Image", p)?,
            Component::Divider => map.serialize_entry("Divider", &Map::new())?,
            Component::Column(p) => map.serialize_entry("Column", p)?,
            Component::Row(p) => map.serialize_entry("Row", p)?,
            Component::Canvas(p) => map.serialize_entry("Canvas", p)?,
            Component::Card(p) => map.serialize_entry("Card", p)?,
            Component::List(p) => map.serialize_entry("List", p)?,
            Component::Chart(p) => map.serialize_entry("Chart", p)?,
            Component::GoogleMap(p) => map.serialize_entry("GoogleMap", p)?,
            Component::Unknown {
                type_name,
                properties,
            } => map.serialize_entry(type_name, properties)?,
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Component {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map: Map<String, Value> = Map::deserialize(deserializer)?;
        if map.len() != 1 {
            return Err(serde::de::Error::custom(format!(
                "component must have exactly one type key, found {}",
                map.len()
            )));
        }
        let Some((type_name, properties)) = map.into_iter().next() else {
            return Err(serde::de::Error::custom("component must have a type key"));
        };
        Component::from_parts(&type_name, properties)
            .map_err(|e| serde::de::Error::custom(format!("{}: {}", type_name, e)))
    }
}

// ─── Children ───────────────────────────────────────────────────────────────

/// Child references of a container: either a fixed id list or a template
/// expanded once per element of a data-bound sequence.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Children {
    ExplicitList(Vec<String>),
    Template(Template),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub component_id: String,
    pub data_binding: String,
}

// ─── Property bags ──────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextProps {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<PropertyValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_hint: Option<PropertyValue>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImageProps {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src: Option<PropertyValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<PropertyValue>,
}

/// Properties shared by `Column`, `Row` and `Canvas`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StackProps {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Children>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distribution: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alignment: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CardProps {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub child: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListProps {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Children>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChartProps {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub chart_type: Option<PropertyValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<PropertyValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart_data: Option<PropertyValue>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MapProps {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<PropertyValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zoom: Option<PropertyValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub center: Option<PropertyValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pins: Option<PropertyValue>,
}
