use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::data_model::DataModel;
use crate::types::ComponentEntry;

/// One independently addressable renderable region.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Surface {
    pub surface_id: String,
    pub root_component_id: Option<String>,
    pub components: BTreeMap<String, ComponentEntry>,
    pub data_model: DataModel,
    pub styles: Map<String, Value>,
    /// Set by end-rendering, cleared by the next begin-rendering.
    pub rendering_complete: bool,
}

impl Surface {
    pub fn new(surface_id: &str) -> Self {
        Self {
            surface_id: surface_id.to_string(),
            ..Self::default()
        }
    }

    pub fn component(&self, id: &str) -> Option<&ComponentEntry> {
        self.components.get(id)
    }
}

/// An immutable view of the registry at one version.
///
/// Holding a snapshot never blocks the processor, and later messages never
/// show through: the processor copies a surface before its first write after
/// a snapshot was taken.
#[derive(Clone, Debug, Default)]
pub struct SurfaceSnapshot {
    version: u64,
    surfaces: BTreeMap<String, Arc<Surface>>,
}

impl SurfaceSnapshot {
    pub(crate) fn new(version: u64, surfaces: BTreeMap<String, Arc<Surface>>) -> Self {
        Self { version, surfaces }
    }

    /// Registry version the snapshot was taken at.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn get(&self, surface_id: &str) -> Option<&Arc<Surface>> {
        self.surfaces.get(surface_id)
    }

    pub fn contains(&self, surface_id: &str) -> bool {
        self.surfaces.contains_key(surface_id)
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    /// Surface ids in ascending order.
    pub fn surface_ids(&self) -> impl Iterator<Item = &str> {
        self.surfaces.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Surface)> {
        self.surfaces.iter().map(|(id, s)| (id.as_str(), s.as_ref()))
    }
}

impl Serialize for SurfaceSnapshot {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.surfaces.len()))?;
        for (id, surface) in &self.surfaces {
            map.serialize_entry(id, surface.as_ref())?;
        }
        map.end()
    }
}
