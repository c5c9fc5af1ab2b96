//! Map pin and center extraction.
//!
//! Pins follow the chart pattern: a literal array whose object elements are
//! coerced field by field, or a bound sequence probed index by index until
//! the first entry missing `lat` or `lng`. A coordinate with no numeric
//! reading is `None` and serializes as `null`.

use serde::{Deserialize, Serialize};

use crate::data_model::{DataModel, DataNode};
use crate::path;
use crate::value::PropertyValue;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapPin {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub glyph_color: Option<String>,
}

/// Resolves a `pins` descriptor.
///
/// Literal pins keep every object element; absent fields stay `None`.
/// Bound pins carry `name` and `description` only when the stored value is
/// truthy.
pub fn resolve_map_pins(
    descriptor: Option<&PropertyValue>,
    model: &DataModel,
    context_path: &str,
    max_items: usize,
) -> Vec<MapPin> {
    match descriptor {
        Some(PropertyValue::LiteralArray(items)) => items
            .iter()
            .filter_map(DataNode::from_json)
            .filter_map(|node| literal_pin(&node))
            .collect(),
        Some(PropertyValue::Path(binding)) => {
            let base = path::normalize(binding, context_path);
            (0..max_items)
                .map_while(|i| {
                    let pin_path = path::join(&base, i);
                    let field = |name: &str| model.get(&path::join(&pin_path, name));
                    let lat = field("lat")?;
                    let lng = field("lng")?;
                    let label = |name: &str| {
                        field(name)
                            .filter(|node| node.is_truthy())
                            .map(DataNode::to_text)
                    };
                    Some(MapPin {
                        lat: lat.to_number(),
                        lng: lng.to_number(),
                        name: label("name"),
                        description: label("description"),
                        background: None,
                        border_color: None,
                        glyph_color: None,
                    })
                })
                .collect()
        }
        _ => Vec::new(),
    }
}

/// Resolves a `center` descriptor: a literal object or a binding to a
/// `{lat, lng}` pair. Either coordinate missing means no center.
pub fn resolve_map_center(
    descriptor: Option<&PropertyValue>,
    model: &DataModel,
    context_path: &str,
) -> Option<LatLng> {
    match descriptor? {
        PropertyValue::LiteralObject(obj) => {
            let field = |name: &str| obj.get(name).and_then(DataNode::from_json);
            Some(LatLng {
                lat: field("lat")?.to_number(),
                lng: field("lng")?.to_number(),
            })
        }
        PropertyValue::Path(binding) => {
            let base = path::normalize(binding, context_path);
            Some(LatLng {
                lat: model.get(&path::join(&base, "lat"))?.to_number(),
                lng: model.get(&path::join(&base, "lng"))?.to_number(),
            })
        }
        _ => None,
    }
}

fn literal_pin(node: &DataNode) -> Option<MapPin> {
    let fields = node.as_mapping()?;
    let number = |name: &str| fields.get(name).and_then(DataNode::to_number);
    let text = |name: &str| fields.get(name).map(DataNode::to_text);
    Some(MapPin {
        lat: number("lat"),
        lng: number("lng"),
        name: text("name"),
        description: text("description"),
        background: text("background"),
        border_color: text("borderColor"),
        glyph_color: text("glyphColor"),
    })
}
